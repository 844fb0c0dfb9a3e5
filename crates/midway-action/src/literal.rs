//! Argument literals and their canonical rendering.

use std::fmt;

/// A literal argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A quoted string.
    Str(String),
    /// `True` or `False`.
    Bool(bool),
    /// A bracketed list.
    List(Vec<Literal>),
    /// A `{key: value}` mapping, in source order.
    Map(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Short name of the literal's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Map(_) => "dict",
        }
    }

    /// The integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list items, if this is a list.
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// A list of strings.
    pub fn str_list<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        Self::List(items.into_iter().map(Self::from).collect())
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // Debug keeps a trailing `.0` on whole floats.
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(s) => write_quoted(f, s),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering() {
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(Literal::Float(-0.25).to_string(), "-0.25");
        assert_eq!(Literal::from("it's").to_string(), r"'it\'s'");
        assert_eq!(Literal::Bool(true).to_string(), "True");
        assert_eq!(Literal::str_list(["a", "b"]).to_string(), "['a', 'b']");
        assert_eq!(Literal::List(vec![]).to_string(), "[]");
        assert_eq!(
            Literal::Map(vec![(Literal::from("k"), Literal::Int(1))]).to_string(),
            "{'k': 1}"
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(Literal::Int(4).as_int(), Some(4));
        assert_eq!(Literal::Float(4.0).as_int(), None);
        assert_eq!(Literal::from("x").as_str(), Some("x"));
        assert_eq!(Literal::Int(1).type_name(), "int");
        assert!(Literal::str_list(["a"]).as_list().is_some());
    }
}
