//! Discrete action vectors ↔ text.
//!
//! Slot layout:
//!
//! | slot | meaning | size |
//! |------|---------|------|
//! | 0 | action selector | 11 |
//! | 1 | type | 3 |
//! | 2 | subtype | 9 |
//! | 3 | subclass (color) | 4 |
//! | 4–7 | x, y, new_x, new_y | park size |
//! | 8 | price | highest price + 1 |
//! | 9 | order quantity / step | order quantity slots |
//! | 10 | num_guests | max survey guests + 1 |
//! | 11 | research speed | 4 |
//! | 12–20 | one bit per research topic | 2 |

use midway_core::{
    CodecConfig, Color, ConfigError, DecodeError, EntityKind, ResearchSpeed, Subtype,
};

use crate::literal::Literal;
use crate::parse::Invocation;
use crate::table::{ActionKind, Param};
use crate::validate::Action;

/// Selector slot.
pub const SELECTOR: usize = 0;
/// Entity type slot.
pub const TYPE: usize = 1;
/// Subtype slot.
pub const SUBTYPE: usize = 2;
/// Color slot.
pub const SUBCLASS: usize = 3;
/// Column slot.
pub const X: usize = 4;
/// Row slot.
pub const Y: usize = 5;
/// Destination column slot.
pub const NEW_X: usize = 6;
/// Destination row slot.
pub const NEW_Y: usize = 7;
/// Price slot.
pub const PRICE: usize = 8;
/// Order quantity slot, in units of the configured step.
pub const ORDER_QUANTITY: usize = 9;
/// Survey size slot.
pub const NUM_GUESTS: usize = 10;
/// Research speed slot.
pub const RESEARCH_SPEED: usize = 11;
/// First research topic bit; topics follow [`Subtype::ALL`].
pub const TOPICS: usize = 12;
/// Vector length.
pub const LEN: usize = TOPICS + 9;

fn slot_of(param: Param) -> Option<usize> {
    Some(match param {
        Param::Type => TYPE,
        Param::Subtype => SUBTYPE,
        Param::Subclass => SUBCLASS,
        Param::X => X,
        Param::Y => Y,
        Param::NewX => NEW_X,
        Param::NewY => NEW_Y,
        Param::Price => PRICE,
        Param::OrderQuantity => ORDER_QUANTITY,
        Param::NumGuests => NUM_GUESTS,
        Param::ResearchSpeed => RESEARCH_SPEED,
        Param::ResearchTopics | Param::SandboxSteps => return None,
    })
}

fn entity_kind(i: i64) -> Option<EntityKind> {
    EntityKind::ALL.get(usize::try_from(i).ok()?).copied()
}

/// Whether the parameter is emitted for this action and entity type.
pub(crate) fn relevant(kind: ActionKind, entity: Option<EntityKind>, param: Param) -> bool {
    if !kind.requires(param) {
        return false;
    }
    match param {
        Param::Price => entity.is_some_and(|e| e != EntityKind::Staff),
        Param::OrderQuantity => entity == Some(EntityKind::Shop),
        _ => true,
    }
}

/// The full discrete action space.
///
/// Immutable once built; shares freely across threads.
///
/// ```
/// use midway_action::ActionSpace;
/// use midway_core::CodecConfig;
///
/// let space = ActionSpace::new(&CodecConfig::default()).unwrap();
/// let mut v = vec![0; space.len()];
/// v[0] = 6; // add_path
/// v[4] = 3;
/// v[5] = 7;
/// assert_eq!(space.to_text(&v).unwrap(), "add_path(x=3, y=7)");
/// assert_eq!(space.from_text("add_path(x=3, y=7)").unwrap(), v);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ActionSpace {
    nvec: Vec<i64>,
    order_quantity_step: i64,
}

impl ActionSpace {
    /// Size every slot from `config`.
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = i64::from(config.park_size);
        let mut nvec = vec![
            ActionKind::VECTOR_COUNT as i64,
            EntityKind::ALL.len() as i64,
            Subtype::ALL.len() as i64,
            Color::ALL.len() as i64,
            size,
            size,
            size,
            size,
            i64::from(config.prices.highest_price()) + 1,
            i64::from(config.order_quantity_slots),
            i64::from(config.max_survey_guests) + 1,
            ResearchSpeed::ALL.len() as i64,
        ];
        nvec.extend(std::iter::repeat_n(2, Subtype::ALL.len()));
        Ok(Self {
            nvec,
            order_quantity_step: i64::from(config.order_quantity_step),
        })
    }

    /// Number of choices per slot.
    pub fn nvec(&self) -> &[i64] {
        &self.nvec
    }

    /// Vector length.
    pub fn len(&self) -> usize {
        self.nvec.len()
    }

    /// Always false; every space has a selector.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Which slots after the selector an action reads.
    ///
    /// Price and order quantity are listed for every entity action; which
    /// of them a given vector emits also depends on its type slot.
    pub fn mask(&self, kind: ActionKind) -> [bool; LEN - 1] {
        let mut mask = [false; LEN - 1];
        for &p in kind.required() {
            match p {
                Param::ResearchTopics => mask[TOPICS - 1..].fill(true),
                _ => {
                    if let Some(slot) = slot_of(p) {
                        mask[slot - 1] = true;
                    }
                }
            }
        }
        mask
    }

    fn check(&self, v: &[i64]) -> Result<ActionKind, DecodeError> {
        if v.len() != self.nvec.len() {
            return Err(DecodeError::Vector {
                vector: v.to_vec(),
                reason: format!("expected {} slots, got {}", self.nvec.len(), v.len()),
            });
        }
        if let Some((i, (&x, &n))) = v
            .iter()
            .zip(&self.nvec)
            .enumerate()
            .find(|(_, (&x, &n))| x < 0 || x >= n)
        {
            return Err(DecodeError::Vector {
                vector: v.to_vec(),
                reason: format!("slot {i} holds {x}, outside 0..{n}"),
            });
        }
        usize::try_from(v[SELECTOR])
            .ok()
            .and_then(ActionKind::from_selector)
            .ok_or_else(|| DecodeError::Vector {
                vector: v.to_vec(),
                reason: format!("unknown selector {}", v[SELECTOR]),
            })
    }

    /// The minimal call a vector stands for.
    ///
    /// Only the parameters relevant to the selected action and entity type
    /// are emitted; topics appear in declaration order.
    pub fn to_invocation(&self, v: &[i64]) -> Result<Invocation, DecodeError> {
        let kind = self.check(v)?;
        let entity = entity_kind(v[TYPE]);
        let mut call = Invocation::new(kind.name());
        for &p in kind.required() {
            if !relevant(kind, entity, p) {
                continue;
            }
            let value = match p {
                Param::Type => Literal::from(EntityKind::ALL[v[TYPE] as usize].name()),
                Param::Subtype => Literal::from(Subtype::ALL[v[SUBTYPE] as usize].name()),
                Param::Subclass => Literal::from(Color::ALL[v[SUBCLASS] as usize].name()),
                Param::ResearchSpeed => Literal::from(ResearchSpeed::ALL[v[RESEARCH_SPEED] as usize].name()),
                Param::OrderQuantity => Literal::Int(v[ORDER_QUANTITY] * self.order_quantity_step),
                Param::ResearchTopics => Literal::str_list(
                    Subtype::ALL
                        .iter()
                        .zip(&v[TOPICS..])
                        .filter(|(_, &bit)| bit == 1)
                        .map(|(t, _)| t.name()),
                ),
                other => match slot_of(other) {
                    Some(slot) => Literal::Int(v[slot]),
                    None => continue,
                },
            };
            call.args.insert(p.name().to_string(), value);
        }
        Ok(call)
    }

    /// Render a vector as action text.
    pub fn to_text(&self, v: &[i64]) -> Result<String, DecodeError> {
        Ok(self.to_invocation(v)?.to_string())
    }

    /// The validated action a vector stands for.
    pub fn to_action(&self, v: &[i64]) -> Result<Action, DecodeError> {
        let call = self.to_invocation(v)?;
        let input = call.to_string();
        Action::from_invocation(&input, call)
    }

    /// Parse action text into its canonical vector.
    pub fn from_text(&self, input: &str) -> Result<Vec<i64>, DecodeError> {
        self.from_action(&Action::decode(input)?)
    }

    /// Encode a validated action.
    ///
    /// Slots the action does not read are zero. Values outside their
    /// slot's range (including the `-1` "server default" price) have no
    /// vector form.
    pub fn from_action(&self, action: &Action) -> Result<Vec<i64>, DecodeError> {
        let kind = action.kind();
        let input = action.to_string();
        let selector = kind.selector().ok_or_else(|| DecodeError::UnknownAction {
            input: input.clone(),
            name: kind.name().to_string(),
        })?;

        let mut v = vec![0; self.nvec.len()];
        v[SELECTOR] = selector as i64;

        let vocab = |param: Param, index: Option<usize>| -> Result<i64, DecodeError> {
            index.map(|i| i as i64).ok_or_else(|| DecodeError::UnknownValue {
                input: input.clone(),
                param: param.name(),
                value: action.get(param).map(Literal::to_string).unwrap_or_default(),
            })
        };

        let entity = action.text(Param::Type).and_then(EntityKind::from_name);
        for &p in kind.required() {
            if !relevant(kind, entity, p) {
                continue;
            }
            let text = action.text(p).unwrap_or_default();
            match p {
                Param::Type => v[TYPE] = vocab(p, entity.map(EntityKind::index))?,
                Param::Subtype => {
                    v[SUBTYPE] = vocab(p, Subtype::from_name(text).map(Subtype::index))?
                }
                Param::Subclass => v[SUBCLASS] = vocab(p, Color::from_name(text).map(Color::index))?,
                Param::ResearchSpeed => {
                    v[RESEARCH_SPEED] =
                        vocab(p, ResearchSpeed::from_name(text).map(ResearchSpeed::index))?
                }
                Param::ResearchTopics => {
                    for topic in action.strings(p).unwrap_or_default() {
                        let i = vocab(p, Subtype::from_name(topic).map(Subtype::index))?;
                        v[TOPICS + i as usize] = 1;
                    }
                }
                Param::OrderQuantity => {
                    let q = action.int(p).unwrap_or_default();
                    let step = self.order_quantity_step;
                    if q.rem_euclid(step) != 0 {
                        return Err(DecodeError::OffStep {
                            input: input.clone(),
                            param: p.name(),
                            value: q,
                            step,
                        });
                    }
                    v[ORDER_QUANTITY] = q.div_euclid(step);
                }
                other => {
                    if let Some(slot) = slot_of(other) {
                        v[slot] = action.int(other).unwrap_or_default();
                    }
                }
            }
        }

        self.check(&v)?;
        Ok(v)
    }

    /// Zero every slot the vector's action does not read.
    pub fn canonicalize(&self, v: &[i64]) -> Result<Vec<i64>, DecodeError> {
        let kind = self.check(v)?;
        let entity = entity_kind(v[TYPE]);
        let mut out = vec![0; v.len()];
        out[SELECTOR] = v[SELECTOR];
        for &p in kind.required() {
            if !relevant(kind, entity, p) {
                continue;
            }
            match p {
                Param::ResearchTopics => out[TOPICS..].copy_from_slice(&v[TOPICS..]),
                other => {
                    if let Some(slot) = slot_of(other) {
                        out[slot] = v[slot];
                    }
                }
            }
        }
        Ok(out)
    }
}
