//! The action table: names, parameters, required sets and types.

use std::fmt;

macro_rules! named {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name as it appears in action text.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Look up by name.
            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named! {
    /// Every action the grammar accepts.
    ///
    /// The first eleven have a discrete vector form; the rest are sandbox
    /// controls accepted as text only.
    ActionKind {
        /// Build an entity.
        Place => "place",
        /// Relocate an entity.
        Move => "move",
        /// Demolish an entity.
        Remove => "remove",
        /// Change an entity's price or order quantity.
        Modify => "modify",
        /// Choose research speed and topics.
        SetResearch => "set_research",
        /// Survey departing guests.
        SurveyGuests => "survey_guests",
        /// Lay a path tile.
        AddPath => "add_path",
        /// Remove a path tile.
        RemovePath => "remove_path",
        /// Flood a tile.
        AddWater => "add_water",
        /// Drain a tile.
        RemoveWater => "remove_water",
        /// Advance one day.
        Wait => "wait",
        /// Sandbox: roll back one day.
        UndoDay => "undo_day",
        /// Sandbox: fill the bank.
        MaxMoney => "max_money",
        /// Sandbox: unlock all research.
        MaxResearch => "max_research",
        /// Sandbox: restart the park.
        Reset => "reset",
        /// Sandbox: enter sandbox mode for a number of steps.
        SetSandboxMode => "set_sandbox_mode",
    }
}

named! {
    /// Every keyword any action accepts.
    Param {
        /// Entity category.
        Type => "type",
        /// Entity subtype.
        Subtype => "subtype",
        /// Entity color.
        Subclass => "subclass",
        /// Column.
        X => "x",
        /// Row.
        Y => "y",
        /// Destination column.
        NewX => "new_x",
        /// Destination row.
        NewY => "new_y",
        /// Ticket or item price.
        Price => "price",
        /// Shop restock quantity.
        OrderQuantity => "order_quantity",
        /// Guests to survey.
        NumGuests => "num_guests",
        /// Research investment level.
        ResearchSpeed => "research_speed",
        /// Subtypes to research.
        ResearchTopics => "research_topics",
        /// Length of a sandbox session.
        SandboxSteps => "sandbox_steps",
    }
}

/// Declared type of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// An integer literal.
    Int,
    /// A string literal.
    Str,
    /// A list of string literals.
    StrList,
}

impl ParamType {
    /// Type name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Str => "str",
            Self::StrList => "list[str]",
        }
    }
}

impl Param {
    /// Declared type.
    pub fn ty(self) -> ParamType {
        match self {
            Self::Type | Self::Subtype | Self::Subclass | Self::ResearchSpeed => ParamType::Str,
            Self::ResearchTopics => ParamType::StrList,
            Self::X
            | Self::Y
            | Self::NewX
            | Self::NewY
            | Self::Price
            | Self::OrderQuantity
            | Self::NumGuests
            | Self::SandboxSteps => ParamType::Int,
        }
    }
}

use Param::*;

const ENTITY: &[Param] = &[Type, Subtype, Subclass, X, Y];
const PRICED: &[Param] = &[Type, Subtype, Subclass, X, Y, Price, OrderQuantity];
const MOVED: &[Param] = &[Type, Subtype, Subclass, X, Y, NewX, NewY];
const TILE: &[Param] = &[X, Y];

impl ActionKind {
    /// Exactly the keywords a valid invocation carries, after implicit
    /// defaults are filled in.
    pub fn required(self) -> &'static [Param] {
        match self {
            Self::Place | Self::Modify => PRICED,
            Self::Move => MOVED,
            Self::Remove => ENTITY,
            Self::SetResearch => &[ResearchSpeed, ResearchTopics],
            Self::SurveyGuests => &[NumGuests],
            Self::AddPath | Self::RemovePath | Self::AddWater | Self::RemoveWater => TILE,
            Self::SetSandboxMode => &[SandboxSteps],
            Self::Wait | Self::UndoDay | Self::MaxMoney | Self::MaxResearch | Self::Reset => &[],
        }
    }

    /// Whether `param` is in the required set.
    pub fn requires(self, param: Param) -> bool {
        self.required().contains(&param)
    }

    /// Position on the selector slot of the discrete action vector.
    pub fn selector(self) -> Option<usize> {
        let i = Self::ALL.iter().position(|&k| k == self)?;
        (i < Self::VECTOR_COUNT).then_some(i)
    }

    /// Inverse of [`selector`](Self::selector).
    pub fn from_selector(selector: usize) -> Option<Self> {
        Self::ALL[..Self::VECTOR_COUNT].get(selector).copied()
    }

    /// Number of actions with a vector form.
    pub const VECTOR_COUNT: usize = 11;

    /// Whether this is a sandbox control.
    pub fn is_sandbox(self) -> bool {
        self.selector().is_none()
    }

    /// Whether the action names an entity by type, subtype and color.
    pub fn targets_entity(self) -> bool {
        matches!(self, Self::Place | Self::Move | Self::Remove | Self::Modify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_follow_the_table() {
        assert_eq!(ActionKind::Place.selector(), Some(0));
        assert_eq!(ActionKind::SurveyGuests.selector(), Some(5));
        assert_eq!(ActionKind::Wait.selector(), Some(10));
        assert_eq!(ActionKind::Reset.selector(), None);
        assert!(ActionKind::SetSandboxMode.is_sandbox());
        for (i, &k) in ActionKind::ALL[..ActionKind::VECTOR_COUNT].iter().enumerate() {
            assert_eq!(ActionKind::from_selector(i), Some(k));
        }
        assert_eq!(ActionKind::from_selector(11), None);
    }

    #[test]
    fn required_sets() {
        let names = |k: ActionKind| k.required().iter().map(|p| p.name()).collect::<Vec<_>>();
        assert_eq!(
            names(ActionKind::Place),
            ["type", "subtype", "subclass", "x", "y", "price", "order_quantity"]
        );
        assert_eq!(
            names(ActionKind::Move),
            ["type", "subtype", "subclass", "x", "y", "new_x", "new_y"]
        );
        assert_eq!(names(ActionKind::Remove), ["type", "subtype", "subclass", "x", "y"]);
        assert_eq!(names(ActionKind::SetResearch), ["research_speed", "research_topics"]);
        assert_eq!(names(ActionKind::AddWater), ["x", "y"]);
        assert!(ActionKind::Wait.required().is_empty());
        assert_eq!(names(ActionKind::SetSandboxMode), ["sandbox_steps"]);
    }

    #[test]
    fn names_round_trip() {
        for &k in ActionKind::ALL {
            assert_eq!(ActionKind::from_name(k.name()), Some(k));
        }
        for &p in Param::ALL {
            assert_eq!(Param::from_name(p.name()), Some(p));
        }
        assert_eq!(ActionKind::from_name("place_ride"), None);
        assert_eq!(Param::ResearchTopics.ty(), ParamType::StrList);
        assert_eq!(Param::Price.ty(), ParamType::Int);
    }
}
