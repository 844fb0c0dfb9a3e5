//! Parser for textual action invocations.
//!
//! The accepted grammar is a single keyword-only call:
//!
//! ```text
//! invocation := NAME "(" [ kwarg ( "," kwarg )* [","] ] ")"
//! kwarg      := NAME "=" literal
//! literal    := ["-"] NUMBER | STRING | "True" | "False"
//!             | "[" [ literal ( "," literal )* [","] ] "]"
//!             | "{" [ literal ":" literal ( "," literal ":" literal )* [","] ] "}"
//! ```
//!
//! Nothing else is evaluated: names other than `True`/`False` in value
//! position, nested calls, operators and positional arguments are all
//! syntax errors.

use std::fmt;

use indexmap::IndexMap;
use midway_core::DecodeError;

use crate::literal::Literal;

/// Deepest list/mapping nesting accepted.
const MAX_DEPTH: usize = 32;

/// A parsed call: name plus keyword arguments in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Invocation {
    /// Callable name.
    pub name: String,
    /// Keyword arguments in source order.
    pub args: IndexMap<String, Literal>,
}

impl Invocation {
    /// A call with no arguments yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (k, v)) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str(")")
    }
}

/// Parse `input` as a keyword-only call.
///
/// ```
/// use midway_action::{parse, Literal};
///
/// let call = parse("place(x=3, y=-1, topics=['food'])").unwrap();
/// assert_eq!(call.name, "place");
/// assert_eq!(call.args["y"], Literal::Int(-1));
/// ```
pub fn parse(input: &str) -> Result<Invocation, DecodeError> {
    let tokens = tokenize(input)?;
    Parser {
        input,
        tokens,
        pos: 0,
    }
    .invocation()
}

// ── Tokens ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Equals,
    Minus,
    End,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Self::Ident(s) => format!("name '{s}'"),
            Self::Int(v) => format!("number {v}"),
            Self::Float(v) => format!("number {v:?}"),
            Self::Str(_) => "string".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
            Self::LBracket => "'['".into(),
            Self::RBracket => "']'".into(),
            Self::LBrace => "'{'".into(),
            Self::RBrace => "'}'".into(),
            Self::Colon => "':'".into(),
            Self::Comma => "','".into(),
            Self::Equals => "'='".into(),
            Self::Minus => "'-'".into(),
            Self::End => "end of input".into(),
        }
    }
}

struct Token {
    tok: Tok,
    at: usize,
}

fn syntax(input: &str, position: usize, reason: impl Into<String>) -> DecodeError {
    DecodeError::Syntax {
        input: input.to_string(),
        position,
        reason: reason.into(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(input: &str) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(at, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let single = match c {
            '(' => Some(Tok::LParen),
            ')' => Some(Tok::RParen),
            '[' => Some(Tok::LBracket),
            ']' => Some(Tok::RBracket),
            '{' => Some(Tok::LBrace),
            '}' => Some(Tok::RBrace),
            ':' => Some(Tok::Colon),
            ',' => Some(Tok::Comma),
            '=' => Some(Tok::Equals),
            '-' => Some(Tok::Minus),
            _ => None,
        };
        if let Some(tok) = single {
            chars.next();
            tokens.push(Token { tok, at });
            continue;
        }

        if c == '\'' || c == '"' {
            chars.next();
            let mut s = String::new();
            let mut closed = false;
            while let Some((_, ch)) = chars.next() {
                if ch == c {
                    closed = true;
                    break;
                }
                if ch == '\\' {
                    let Some((_, esc)) = chars.next() else {
                        break;
                    };
                    match esc {
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        'r' => s.push('\r'),
                        '0' => s.push('\0'),
                        '\\' | '\'' | '"' => s.push(esc),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                } else {
                    s.push(ch);
                }
            }
            if !closed {
                return Err(syntax(input, at, "unterminated string literal"));
            }
            tokens.push(Token {
                tok: Tok::Str(s),
                at,
            });
            continue;
        }

        if is_ident_start(c) {
            let mut end = at;
            while let Some(&(i, ch)) = chars.peek() {
                if !is_ident_continue(ch) {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            tokens.push(Token {
                tok: Tok::Ident(input[at..end].to_string()),
                at,
            });
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut end = at;
            let mut is_float = false;
            let mut prev = ' ';
            while let Some(&(i, ch)) = chars.peek() {
                let accept = ch.is_ascii_digit()
                    || ch == '.'
                    || ch == 'e'
                    || ch == 'E'
                    || ((ch == '+' || ch == '-') && (prev == 'e' || prev == 'E'));
                if !accept {
                    break;
                }
                if !ch.is_ascii_digit() {
                    is_float = true;
                }
                prev = ch;
                end = i + 1;
                chars.next();
            }
            let text = &input[at..end];
            let tok = if is_float {
                text.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Tok::Float)
            } else {
                text.parse::<i64>().ok().map(Tok::Int)
            };
            let tok = tok.ok_or_else(|| syntax(input, at, format!("invalid number '{text}'")))?;
            tokens.push(Token { tok, at });
            continue;
        }

        return Err(syntax(input, at, format!("unexpected character '{c}'")));
    }

    tokens.push(Token {
        tok: Tok::End,
        at: input.len(),
    });
    Ok(tokens)
}

// ── Parser ─────────────────────────────────────────────────────────

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        // `tokenize` always ends the stream with `End`, and `bump` never
        // moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, ahead: usize) -> &Tok {
        let i = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[i].tok
    }

    fn bump(&mut self) -> Tok {
        let tok = self.peek().tok.clone();
        if tok != Tok::End {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, reason: impl Into<String>) -> DecodeError {
        syntax(self.input, self.peek().at, reason)
    }

    fn expect(&mut self, want: Tok) -> Result<(), DecodeError> {
        if self.peek().tok == want {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                want.describe(),
                self.peek().tok.describe()
            )))
        }
    }

    fn invocation(mut self) -> Result<Invocation, DecodeError> {
        let name = match self.bump() {
            Tok::Ident(name) => name,
            other => {
                self.pos = 0;
                return Err(self.error(format!("expected an action name, found {}", other.describe())));
            }
        };
        self.expect(Tok::LParen)?;

        let mut args = IndexMap::new();
        while self.peek().tok != Tok::RParen {
            let key_at = self.peek().at;
            let key = match (self.peek().tok.clone(), self.peek_at(1)) {
                (Tok::Ident(key), Tok::Equals) => key,
                _ => return Err(self.error("positional arguments are not supported")),
            };
            self.bump();
            self.bump();
            let value = self.literal(0)?;
            if args.insert(key.clone(), value).is_some() {
                return Err(syntax(
                    self.input,
                    key_at,
                    format!("repeated keyword argument '{key}'"),
                ));
            }
            match self.peek().tok.clone() {
                Tok::Comma => {
                    self.bump();
                }
                Tok::RParen => {}
                other => {
                    return Err(self.error(format!("expected ',' or ')', found {}", other.describe())))
                }
            }
        }
        self.expect(Tok::RParen)?;
        self.expect(Tok::End)?;
        Ok(Invocation { name, args })
    }

    fn literal(&mut self, depth: usize) -> Result<Literal, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        let found = self.peek().tok.describe();
        match self.bump() {
            Tok::Int(v) => Ok(Literal::Int(v)),
            Tok::Float(v) => Ok(Literal::Float(v)),
            Tok::Str(s) => Ok(Literal::Str(s)),
            Tok::Minus => match self.bump() {
                Tok::Int(v) => Ok(Literal::Int(-v)),
                Tok::Float(v) => Ok(Literal::Float(-v)),
                _ => {
                    self.pos -= 1;
                    Err(self.error("unary minus applies to numbers only"))
                }
            },
            Tok::Ident(name) => match name.as_str() {
                "True" => Ok(Literal::Bool(true)),
                "False" => Ok(Literal::Bool(false)),
                _ => {
                    self.pos -= 1;
                    Err(self.error(format!("expected a literal, found {found}")))
                }
            },
            Tok::LBracket => {
                let mut items = Vec::new();
                while self.peek().tok != Tok::RBracket {
                    items.push(self.literal(depth + 1)?);
                    if self.peek().tok == Tok::Comma {
                        self.bump();
                    } else {
                        break;
                    }
                }
                self.expect(Tok::RBracket)?;
                Ok(Literal::List(items))
            }
            Tok::LBrace => {
                let mut entries = Vec::new();
                while self.peek().tok != Tok::RBrace {
                    let k = self.literal(depth + 1)?;
                    self.expect(Tok::Colon)?;
                    let v = self.literal(depth + 1)?;
                    entries.push((k, v));
                    if self.peek().tok == Tok::Comma {
                        self.bump();
                    } else {
                        break;
                    }
                }
                self.expect(Tok::RBrace)?;
                Ok(Literal::Map(entries))
            }
            Tok::End => Err(self.error("expected a literal, found end of input")),
            _ => {
                self.pos -= 1;
                Err(self.error(format!("expected a literal, found {found}")))
            }
        }
    }
}
