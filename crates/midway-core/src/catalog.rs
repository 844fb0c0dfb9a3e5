//! The park's entity vocabulary.
//!
//! Attraction and staff categories, colors, research speeds and staff
//! success metrics. Every enum has a fixed declaration order that the
//! tensor layout and the action vectors index into, so reordering
//! variants is a format change.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name of this variant.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Look up a variant by wire name.
            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Position in declaration order.
            pub fn index(self) -> usize {
                self as usize
            }

            /// Variant at a declaration-order position.
            pub fn from_index(i: usize) -> Option<Self> {
                Self::ALL.get(i).copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

vocabulary! {
    /// Top-level entity category, the `type` of an action.
    EntityKind {
        /// A ride.
        Ride => "ride",
        /// A shop.
        Shop => "shop",
        /// A staff member.
        Staff => "staff",
    }
}

vocabulary! {
    /// Ride subtypes.
    RideKind {
        /// Carousel.
        Carousel => "carousel",
        /// Ferris wheel.
        FerrisWheel => "ferris_wheel",
        /// Roller coaster.
        RollerCoaster => "roller_coaster",
    }
}

vocabulary! {
    /// Shop subtypes.
    ShopKind {
        /// Drink stand.
        Drink => "drink",
        /// Food stand.
        Food => "food",
        /// Specialty shop.
        Specialty => "specialty",
    }
}

vocabulary! {
    /// Staff archetypes.
    StaffRole {
        /// Cleans paths and attractions.
        Janitor => "janitor",
        /// Repairs attractions.
        Mechanic => "mechanic",
        /// Color-dependent specialist.
        Specialist => "specialist",
    }
}

vocabulary! {
    /// Every entity subtype across rides, shops and staff.
    ///
    /// Also the vocabulary of research topics.
    Subtype {
        /// Carousel ride.
        Carousel => "carousel",
        /// Ferris wheel ride.
        FerrisWheel => "ferris_wheel",
        /// Roller coaster ride.
        RollerCoaster => "roller_coaster",
        /// Drink shop.
        Drink => "drink",
        /// Food shop.
        Food => "food",
        /// Specialty shop.
        Specialty => "specialty",
        /// Janitor staff.
        Janitor => "janitor",
        /// Mechanic staff.
        Mechanic => "mechanic",
        /// Specialist staff.
        Specialist => "specialist",
    }
}

vocabulary! {
    /// Entity color (the `subclass` of an action).
    Color {
        /// Yellow.
        Yellow => "yellow",
        /// Blue.
        Blue => "blue",
        /// Green.
        Green => "green",
        /// Red.
        Red => "red",
    }
}

vocabulary! {
    /// Research investment level.
    ResearchSpeed {
        /// No research.
        None => "none",
        /// Slow research.
        Slow => "slow",
        /// Medium research.
        Medium => "medium",
        /// Fast research.
        Fast => "fast",
    }
}

vocabulary! {
    /// What a staff member's success counter measures.
    SuccessMetric {
        /// Janitor: dirt removed.
        AmountCleaned => "amount_cleaned",
        /// Mechanic: repair work.
        RepairStepsPerformed => "repair_steps_performed",
        /// Specialist: guests entertained.
        GuestsEntertained => "guests_entertained",
        /// Specialist: shop restocks.
        ItemsRestocked => "items_restocked",
        /// Specialist: guests given information.
        GuestsInformed => "guests_informed",
        /// Specialist: guests served.
        GuestsServed => "guests_served",
    }
}

impl Subtype {
    /// The category this subtype belongs to.
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Carousel | Self::FerrisWheel | Self::RollerCoaster => EntityKind::Ride,
            Self::Drink | Self::Food | Self::Specialty => EntityKind::Shop,
            Self::Janitor | Self::Mechanic | Self::Specialist => EntityKind::Staff,
        }
    }

    /// Narrow to a ride kind.
    pub fn ride(self) -> Option<RideKind> {
        match self {
            Self::Carousel => Some(RideKind::Carousel),
            Self::FerrisWheel => Some(RideKind::FerrisWheel),
            Self::RollerCoaster => Some(RideKind::RollerCoaster),
            _ => None,
        }
    }

    /// Narrow to a shop kind.
    pub fn shop(self) -> Option<ShopKind> {
        match self {
            Self::Drink => Some(ShopKind::Drink),
            Self::Food => Some(ShopKind::Food),
            Self::Specialty => Some(ShopKind::Specialty),
            _ => None,
        }
    }

    /// Narrow to a staff role.
    pub fn role(self) -> Option<StaffRole> {
        match self {
            Self::Janitor => Some(StaffRole::Janitor),
            Self::Mechanic => Some(StaffRole::Mechanic),
            Self::Specialist => Some(StaffRole::Specialist),
            _ => None,
        }
    }
}

impl From<RideKind> for Subtype {
    fn from(k: RideKind) -> Self {
        match k {
            RideKind::Carousel => Self::Carousel,
            RideKind::FerrisWheel => Self::FerrisWheel,
            RideKind::RollerCoaster => Self::RollerCoaster,
        }
    }
}

impl From<ShopKind> for Subtype {
    fn from(k: ShopKind) -> Self {
        match k {
            ShopKind::Drink => Self::Drink,
            ShopKind::Food => Self::Food,
            ShopKind::Specialty => Self::Specialty,
        }
    }
}

impl From<StaffRole> for Subtype {
    fn from(r: StaffRole) -> Self {
        match r {
            StaffRole::Janitor => Self::Janitor,
            StaffRole::Mechanic => Self::Mechanic,
            StaffRole::Specialist => Self::Specialist,
        }
    }
}

impl EntityKind {
    /// Subtypes belonging to this category, in declaration order.
    pub fn subtypes(self) -> &'static [Subtype] {
        match self {
            Self::Ride => &Subtype::ALL[0..3],
            Self::Shop => &Subtype::ALL[3..6],
            Self::Staff => &Subtype::ALL[6..9],
        }
    }
}

impl ResearchSpeed {
    /// Numeric level: none 0, slow 1, medium 2, fast 4.
    pub fn level(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Slow => 1,
            Self::Medium => 2,
            Self::Fast => 4,
        }
    }

    /// Inverse of [`level`](Self::level).
    pub fn from_level(level: u32) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 => Some(Self::Slow),
            2 => Some(Self::Medium),
            4 => Some(Self::Fast),
            _ => None,
        }
    }

    /// Parse a speed, reading unknown names as [`ResearchSpeed::None`].
    pub fn from_name_lossy(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("unknown research speed '{s}', treating as none");
            Self::None
        })
    }
}

impl Default for ResearchSpeed {
    fn default() -> Self {
        Self::None
    }
}

// ── TopicSet ───────────────────────────────────────────────────────

/// A set of research topics, iterated in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TopicSet(u16);

impl TopicSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every topic.
    pub fn all() -> Self {
        Subtype::ALL.iter().copied().collect()
    }

    /// Add a topic.
    pub fn insert(&mut self, topic: Subtype) {
        self.0 |= 1 << topic.index();
    }

    /// Membership test.
    pub fn contains(&self, topic: Subtype) -> bool {
        self.0 & (1 << topic.index()) != 0
    }

    /// Number of topics in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no topic is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Topics in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Subtype> + '_ {
        Subtype::ALL.iter().copied().filter(move |t| self.contains(*t))
    }

    /// Parse topic names, dropping unknown ones with a warning.
    pub fn from_names_lossy<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = Self::EMPTY;
        for name in names {
            match Subtype::from_name(name.as_ref()) {
                Some(t) => set.insert(t),
                None => log::warn!("ignoring unknown research topic '{}'", name.as_ref()),
            }
        }
        set
    }
}

impl FromIterator<Subtype> for TopicSet {
    fn from_iter<I: IntoIterator<Item = Subtype>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for t in iter {
            set.insert(t);
        }
        set
    }
}

// ── AvailableEntities ──────────────────────────────────────────────

/// Which (subtype, color) combinations can currently be built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AvailableEntities(u64);

impl AvailableEntities {
    fn bit(subtype: Subtype, color: Color) -> u64 {
        1 << (subtype.index() * Color::ALL.len() + color.index())
    }

    /// Mark a combination available.
    pub fn insert(&mut self, subtype: Subtype, color: Color) {
        self.0 |= Self::bit(subtype, color);
    }

    /// Whether a combination is available.
    pub fn contains(&self, subtype: Subtype, color: Color) -> bool {
        self.0 & Self::bit(subtype, color) != 0
    }

    /// Every (subtype, color) pair in subtype-major order.
    pub fn slots() -> impl Iterator<Item = (Subtype, Color)> {
        Subtype::ALL
            .iter()
            .flat_map(|s| Color::ALL.iter().map(move |c| (*s, *c)))
    }

    /// Build from a `{subtype: [color, ...]}` listing, ignoring unknown
    /// names with a warning.
    pub fn from_listing<'a, I, C>(listing: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, C)>,
        C: IntoIterator<Item = &'a str>,
    {
        let mut out = Self::default();
        for (subtype, colors) in listing {
            let Some(s) = Subtype::from_name(subtype) else {
                log::warn!("ignoring unknown entity type '{subtype}' in availability catalog");
                continue;
            };
            for color in colors {
                match Color::from_name(color) {
                    Some(c) => out.insert(s, c),
                    None => log::warn!("ignoring unknown color '{color}' for '{subtype}'"),
                }
            }
        }
        out
    }

    /// Colors available for a subtype, in declaration order.
    pub fn colors(&self, subtype: Subtype) -> impl Iterator<Item = Color> + '_ {
        Color::ALL
            .iter()
            .copied()
            .filter(move |c| self.contains(subtype, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for s in Subtype::ALL {
            assert_eq!(Subtype::from_name(s.name()), Some(*s));
        }
        assert_eq!(Subtype::from_name("unicorn"), None);
        assert_eq!(
            serde_json::to_string(&RideKind::FerrisWheel).unwrap(),
            "\"ferris_wheel\""
        );
    }

    #[test]
    fn subtype_narrowing_matches_kind() {
        for s in Subtype::ALL {
            match s.kind() {
                EntityKind::Ride => assert_eq!(s.ride().map(Subtype::from), Some(*s)),
                EntityKind::Shop => assert_eq!(s.shop().map(Subtype::from), Some(*s)),
                EntityKind::Staff => assert_eq!(s.role().map(Subtype::from), Some(*s)),
            }
            assert!(s.kind().subtypes().contains(s));
        }
    }

    #[test]
    fn research_levels() {
        for speed in ResearchSpeed::ALL {
            assert_eq!(ResearchSpeed::from_level(speed.level()), Some(*speed));
        }
        assert_eq!(ResearchSpeed::from_level(3), None);
        assert_eq!(ResearchSpeed::from_name_lossy("ludicrous"), ResearchSpeed::None);
    }

    #[test]
    fn topics_iterate_in_declaration_order() {
        let set = TopicSet::from_names_lossy(&["specialist", "carousel", "bogus", "food"]);
        let names: Vec<_> = set.iter().map(Subtype::name).collect();
        assert_eq!(names, ["carousel", "food", "specialist"]);
        assert_eq!(TopicSet::all().len(), 9);
    }

    #[test]
    fn availability_listing() {
        let listing = vec![
            ("carousel", vec!["yellow", "red"]),
            ("dragon", vec!["yellow"]),
            ("janitor", vec!["purple", "blue"]),
        ];
        let av = AvailableEntities::from_listing(
            listing.iter().map(|(k, v)| (*k, v.iter().copied())),
        );
        assert!(av.contains(Subtype::Carousel, Color::Yellow));
        assert!(av.contains(Subtype::Carousel, Color::Red));
        assert!(av.contains(Subtype::Janitor, Color::Blue));
        assert!(!av.contains(Subtype::Janitor, Color::Yellow));
        assert_eq!(AvailableEntities::slots().count(), 36);
    }
}
