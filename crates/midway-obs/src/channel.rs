//! Grid channel layout.

use std::fmt;

use midway_core::{Color, RideKind, ShopKind};

macro_rules! channels {
    ($( $variant:ident => $text:literal ),+ $(,)?) => {
        /// One named scalar slot per grid cell.
        ///
        /// The discriminant is the channel's position on the grid's last
        /// axis.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[allow(missing_docs)]
        pub enum Channel {
            $( $variant, )+
        }

        impl Channel {
            /// Every channel in layout order.
            pub const ALL: &'static [Channel] = &[$(Channel::$variant),+];

            /// Stable channel name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Channel::$variant => $text,)+
                }
            }
        }
    };
}

channels! {
    IsEntrance => "is_entrance",
    IsExit => "is_exit",
    IsPath => "is_path",
    IsWater => "is_water",
    IsRollerCoaster => "is_roller_coaster",
    IsFerrisWheel => "is_ferris_wheel",
    IsCarousel => "is_carousel",
    IsDrink => "is_drink",
    IsFood => "is_food",
    IsSpecialty => "is_specialty",
    IsYellow => "is_yellow",
    IsBlue => "is_blue",
    IsGreen => "is_green",
    IsRed => "is_red",
    OutOfService => "out_of_service",
    Price => "price",
    OperatingCost => "operating_cost",
    RevenueGenerated => "revenue_generated",
    GuestsServed => "guests_served",
    Cleanliness => "cleanliness",
    Excitement => "excitement",
    Intensity => "intensity",
    Capacity => "capacity",
    TimesOperated => "times_operated",
    Uptime => "uptime",
    AvgWaitTime => "avg_wait_time",
    AvgGuestsPerOperation => "avg_guests_per_operation",
    CostPerOperation => "cost_per_operation",
    BreakdownRate => "breakdown_rate",
    ItemCost => "item_cost",
    NumberOfRestocks => "number_of_restocks",
    OrderQuantity => "order_quantity",
    Inventory => "inventory",
    ShopUptime => "shop_uptime",
}

impl Channel {
    /// Number of channels.
    pub const COUNT: usize = Self::ALL.len();

    /// Category flags, in decode priority order.
    pub const CATEGORIES: &'static [Channel] = &[
        Self::IsEntrance,
        Self::IsExit,
        Self::IsPath,
        Self::IsWater,
        Self::IsRollerCoaster,
        Self::IsFerrisWheel,
        Self::IsCarousel,
        Self::IsDrink,
        Self::IsFood,
        Self::IsSpecialty,
    ];

    /// Position on the grid's channel axis.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a channel by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Whether this channel is a category presence flag.
    pub fn is_category(self) -> bool {
        self <= Self::IsSpecialty
    }

    /// Presence flag for a ride kind.
    pub fn ride(kind: RideKind) -> Self {
        match kind {
            RideKind::Carousel => Self::IsCarousel,
            RideKind::FerrisWheel => Self::IsFerrisWheel,
            RideKind::RollerCoaster => Self::IsRollerCoaster,
        }
    }

    /// Presence flag for a shop kind.
    pub fn shop(kind: ShopKind) -> Self {
        match kind {
            ShopKind::Drink => Self::IsDrink,
            ShopKind::Food => Self::IsFood,
            ShopKind::Specialty => Self::IsSpecialty,
        }
    }

    /// Color flag.
    pub fn color(color: Color) -> Self {
        match color {
            Color::Yellow => Self::IsYellow,
            Color::Blue => Self::IsBlue,
            Color::Green => Self::IsGreen,
            Color::Red => Self::IsRed,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_stable() {
        assert_eq!(Channel::COUNT, 34);
        assert_eq!(Channel::IsEntrance.index(), 0);
        assert_eq!(Channel::IsCarousel.index(), 6);
        assert_eq!(Channel::Price.index(), 15);
        assert_eq!(Channel::ShopUptime.index(), 33);
        for (i, c) in Channel::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Channel::from_name(c.name()), Some(*c));
        }
    }

    #[test]
    fn categories_are_the_leading_flags() {
        assert_eq!(Channel::CATEGORIES.len(), 10);
        assert!(Channel::CATEGORIES.iter().all(|c| c.is_category()));
        assert!(!Channel::IsYellow.is_category());
    }
}
