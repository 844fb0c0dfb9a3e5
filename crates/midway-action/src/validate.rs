//! Text → validated [`Action`].

use std::fmt;

use indexmap::IndexMap;
use midway_core::DecodeError;

use crate::literal::Literal;
use crate::parse::{parse, Invocation};
use crate::table::{ActionKind, Param, ParamType};

/// A validated action: its kind and exactly its required arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    kind: ActionKind,
    args: IndexMap<Param, Literal>,
}

impl Action {
    /// Parse and validate action text.
    ///
    /// Checks, in order: the grammar, the action name, the argument-name
    /// set (after implicit defaults) and each argument's type.
    ///
    /// ```
    /// use midway_action::{Action, ActionKind, Param};
    ///
    /// let a = Action::decode("place(type='staff', subtype='janitor', subclass='blue', x=0, y=0)")
    ///     .unwrap();
    /// assert_eq!(a.kind(), ActionKind::Place);
    /// assert_eq!(a.int(Param::Price), Some(1));
    /// ```
    pub fn decode(input: &str) -> Result<Self, DecodeError> {
        let result = parse(input).and_then(|call| Self::from_invocation(input, call));
        if let Err(e) = &result {
            log::debug!("rejected action: {e}");
        }
        result
    }

    /// Validate an already parsed call. `input` is reported in errors.
    pub fn from_invocation(input: &str, call: Invocation) -> Result<Self, DecodeError> {
        let kind = ActionKind::from_name(&call.name).ok_or_else(|| DecodeError::UnknownAction {
            input: input.to_string(),
            name: call.name.clone(),
        })?;

        let mut supplied = call.args;
        fill_defaults(kind, &mut supplied);

        let mut missing: Vec<String> = kind
            .required()
            .iter()
            .filter(|p| !supplied.contains_key(p.name()))
            .map(|p| p.name().to_string())
            .collect();
        let mut extra: Vec<String> = supplied
            .keys()
            .filter(|k| !Param::from_name(k).is_some_and(|p| kind.requires(p)))
            .cloned()
            .collect();
        if !missing.is_empty() || !extra.is_empty() {
            missing.sort();
            extra.sort();
            return Err(DecodeError::Arguments {
                input: input.to_string(),
                action: kind.name(),
                missing,
                extra,
            });
        }

        let mut args = IndexMap::with_capacity(supplied.len());
        for (key, value) in supplied {
            // The set check above guarantees every key names a parameter.
            let Some(param) = Param::from_name(&key) else {
                continue;
            };
            check_type(input, kind, param, &value)?;
            args.insert(param, value);
        }
        Ok(Self { kind, args })
    }

    /// Build from typed arguments, with the same checks as text.
    pub fn from_args(
        kind: ActionKind,
        args: impl IntoIterator<Item = (Param, Literal)>,
    ) -> Result<Self, DecodeError> {
        let mut call = Invocation::new(kind.name());
        for (p, v) in args {
            call.args.insert(p.name().to_string(), v);
        }
        let input = call.to_string();
        Self::from_invocation(&input, call)
    }

    /// The action.
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Arguments in the order they were supplied.
    pub fn args(&self) -> &IndexMap<Param, Literal> {
        &self.args
    }

    /// An argument.
    pub fn get(&self, param: Param) -> Option<&Literal> {
        self.args.get(&param)
    }

    /// An integer argument.
    pub fn int(&self, param: Param) -> Option<i64> {
        self.get(param).and_then(Literal::as_int)
    }

    /// A string argument.
    pub fn text(&self, param: Param) -> Option<&str> {
        self.get(param).and_then(Literal::as_str)
    }

    /// A list-of-strings argument.
    pub fn strings(&self, param: Param) -> Option<Vec<&str>> {
        self.get(param)
            .and_then(Literal::as_list)
            .map(|items| items.iter().filter_map(Literal::as_str).collect())
    }

    /// Render as a call carrying every argument.
    pub fn to_invocation(&self) -> Invocation {
        let mut call = Invocation::new(self.kind.name());
        for (p, v) in &self.args {
            call.args.insert(p.name().to_string(), v.clone());
        }
        call
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_invocation())
    }
}

/// Defaults implied by the entity type. Never overrides a supplied value.
fn fill_defaults(kind: ActionKind, args: &mut IndexMap<String, Literal>) {
    if !matches!(kind, ActionKind::Place | ActionKind::Modify) {
        return;
    }
    let Some(ty) = args.get(Param::Type.name()).and_then(Literal::as_str) else {
        return;
    };
    let (price, order_quantity) = match (kind, ty) {
        (_, "staff") => (Some(1), Some(-1)),
        (ActionKind::Place, "ride") => (Some(-1), Some(-1)),
        (_, "ride") => (None, Some(-1)),
        (ActionKind::Place, "shop") => (Some(-1), None),
        _ => (None, None),
    };
    if let Some(v) = price {
        args.entry(Param::Price.name().to_string())
            .or_insert(Literal::Int(v));
    }
    if let Some(v) = order_quantity {
        args.entry(Param::OrderQuantity.name().to_string())
            .or_insert(Literal::Int(v));
    }
}

fn check_type(
    input: &str,
    kind: ActionKind,
    param: Param,
    value: &Literal,
) -> Result<(), DecodeError> {
    let ok = match param.ty() {
        ParamType::Int => matches!(value, Literal::Int(_)),
        ParamType::Str => matches!(value, Literal::Str(_)),
        ParamType::StrList => value
            .as_list()
            .is_some_and(|items| items.iter().all(|i| matches!(i, Literal::Str(_)))),
    };
    if ok {
        Ok(())
    } else {
        Err(DecodeError::ArgumentType {
            input: input.to_string(),
            action: kind.name(),
            param: param.name().to_string(),
            expected: param.ty().name(),
            found: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments_error(text: &str) -> (Vec<String>, Vec<String>) {
        match Action::decode(text).unwrap_err() {
            DecodeError::Arguments { missing, extra, .. } => (missing, extra),
            other => panic!("expected an argument-set error, got {other:?}"),
        }
    }

    #[test]
    fn missing_arguments_are_named_exactly() {
        let (missing, extra) = arguments_error("place(type='ride', subtype='carousel')");
        assert_eq!(missing, ["subclass", "x", "y"]);
        assert!(extra.is_empty());
    }

    #[test]
    fn extra_arguments_are_named() {
        let (missing, extra) = arguments_error("wait(speed=2, alpha=1)");
        assert!(missing.is_empty());
        assert_eq!(extra, ["alpha", "speed"]);

        let (missing, extra) = arguments_error("add_path(x=1, y=2, type='ride')");
        assert!(missing.is_empty());
        assert_eq!(extra, ["type"]);
    }

    #[test]
    fn unknown_action() {
        assert_eq!(
            Action::decode("fly(x=1)").unwrap_err(),
            DecodeError::UnknownAction {
                input: "fly(x=1)".into(),
                name: "fly".into()
            }
        );
    }

    #[test]
    fn staff_placement_implies_price_and_quantity() {
        let a = Action::decode(
            "place(type='staff', subtype='mechanic', subclass='red', x=0, y=0)",
        )
        .unwrap();
        assert_eq!(a.int(Param::Price), Some(1));
        assert_eq!(a.int(Param::OrderQuantity), Some(-1));

        let a = Action::decode(
            "modify(type='staff', subtype='mechanic', subclass='red', x=0, y=0)",
        )
        .unwrap();
        assert_eq!(a.int(Param::Price), Some(1));
    }

    #[test]
    fn attraction_defaults() {
        let a = Action::decode("place(type='ride', subtype='carousel', subclass='red', x=4, y=4)")
            .unwrap();
        assert_eq!(a.int(Param::Price), Some(-1));
        assert_eq!(a.int(Param::OrderQuantity), Some(-1));

        let a = Action::decode(
            "place(type='shop', subtype='food', subclass='red', x=4, y=4, order_quantity=50)",
        )
        .unwrap();
        assert_eq!(a.int(Param::Price), Some(-1));

        // A shop modification must state its order quantity.
        let (missing, _) =
            arguments_error("modify(type='shop', subtype='food', subclass='red', x=4, y=4, price=3)");
        assert_eq!(missing, ["order_quantity"]);
    }

    #[test]
    fn supplied_values_win_over_defaults() {
        let a = Action::decode(
            "place(type='ride', subtype='carousel', subclass='red', x=4, y=4, price=7)",
        )
        .unwrap();
        assert_eq!(a.int(Param::Price), Some(7));
    }

    #[test]
    fn argument_types_are_checked() {
        let err = Action::decode("survey_guests(num_guests='five')").unwrap_err();
        assert_eq!(
            err,
            DecodeError::ArgumentType {
                input: "survey_guests(num_guests='five')".into(),
                action: "survey_guests",
                param: "num_guests".into(),
                expected: "int",
                found: "'five'".into()
            }
        );
        assert!(Action::decode("add_path(x=1.0, y=2)").is_err());
        assert!(Action::decode("add_path(x=True, y=2)").is_err());
        assert!(Action::decode("set_research(research_speed='fast', research_topics=['food', 3])")
            .is_err());
        assert!(Action::decode("set_research(research_speed='fast', research_topics='food')")
            .is_err());
    }

    #[test]
    fn sandbox_actions_validate() {
        assert_eq!(Action::decode("undo_day()").unwrap().kind(), ActionKind::UndoDay);
        let a = Action::decode("set_sandbox_mode(sandbox_steps=20)").unwrap();
        assert_eq!(a.int(Param::SandboxSteps), Some(20));
        assert!(Action::decode("reset(x=1)").is_err());
    }

    #[test]
    fn validated_action_renders_back() {
        let text = "set_research(research_speed='slow', research_topics=['food', 'carousel'])";
        let a = Action::decode(text).unwrap();
        assert_eq!(a.to_string(), text);
        assert_eq!(a.strings(Param::ResearchTopics), Some(vec!["food", "carousel"]));
    }

    #[test]
    fn typed_construction() {
        let a = Action::from_args(
            ActionKind::AddWater,
            [(Param::X, Literal::Int(3)), (Param::Y, Literal::Int(4))],
        )
        .unwrap();
        assert_eq!(a.to_string(), "add_water(x=3, y=4)");
        assert!(Action::from_args(ActionKind::AddWater, [(Param::X, Literal::Int(3))]).is_err());
    }
}
