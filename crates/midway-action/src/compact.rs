//! Compact action vectors completed from park state.
//!
//! The compact space keeps only the choices a policy has to make (what
//! to do and to which kind of entity) and fills coordinates, prices and
//! order quantities from a detailed snapshot.

use std::collections::{HashSet, VecDeque};

use midway_core::{
    CodecConfig, Color, ConfigError, DecodeError, EntityKind, PriceTable, ResearchSpeed, Subtype,
};
use midway_snapshot::{Coord, DomainSnapshot};
use smallvec::SmallVec;

use crate::literal::Literal;
use crate::table::{ActionKind, Param};
use crate::validate::Action;

/// Actions in selector order.
const ACTIONS: [ActionKind; 6] = [
    ActionKind::Place,
    ActionKind::Move,
    ActionKind::Remove,
    ActionKind::Modify,
    ActionKind::SetResearch,
    ActionKind::Wait,
];

const TYPE: usize = 1;
const SUBTYPE: usize = 2;
const SUBCLASS: usize = 3;
const RESEARCH_SPEED: usize = 4;
const TOPICS: usize = 5;

/// Candidate cells examined per placement.
const CANDIDATES: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Path,
    Water,
    Ride,
    Shop,
    Entrance,
    Exit,
}

/// Occupancy grid of a snapshot, indexed `[x * size + y]`.
struct Grid {
    size: u32,
    cells: Vec<Cell>,
}

impl Grid {
    fn of(snapshot: &DomainSnapshot, size: u32) -> Self {
        let mut grid = Self {
            size,
            cells: vec![Cell::Empty; (size as usize) * (size as usize)],
        };
        for p in snapshot.path_list() {
            grid.set(p.position, Cell::Path);
        }
        for w in snapshot.water_list() {
            grid.set(w.position, Cell::Water);
        }
        for r in snapshot.ride_list() {
            grid.set(r.position, Cell::Ride);
        }
        for s in snapshot.shop_list() {
            grid.set(s.position, Cell::Shop);
        }
        grid.set(snapshot.entrance, Cell::Entrance);
        grid.set(snapshot.exit, Cell::Exit);
        grid
    }

    fn index(&self, c: Coord) -> Option<usize> {
        (c.x < self.size && c.y < self.size)
            .then(|| c.x as usize * self.size as usize + c.y as usize)
    }

    fn set(&mut self, c: Coord, cell: Cell) {
        if let Some(i) = self.index(c) {
            self.cells[i] = cell;
        }
    }

    fn get(&self, c: Coord) -> Cell {
        self.index(c).map_or(Cell::Empty, |i| self.cells[i])
    }

    /// In-bounds 4-neighbors: left, right, up, down.
    fn neighbors(&self, c: Coord) -> SmallVec<[Coord; 4]> {
        let mut out = SmallVec::new();
        if c.x > 0 {
            out.push(Coord::new(c.x - 1, c.y));
        }
        if c.x + 1 < self.size {
            out.push(Coord::new(c.x + 1, c.y));
        }
        if c.y > 0 {
            out.push(Coord::new(c.x, c.y - 1));
        }
        if c.y + 1 < self.size {
            out.push(Coord::new(c.x, c.y + 1));
        }
        out
    }
}

/// Where to build an attraction.
///
/// Walks the path network breadth-first from the entrance and collects
/// the first few empty cells beside it, skipping cells that touch the
/// entrance directly. Rides prefer water around them, shops prefer open
/// ground. Ties go to the cell found first.
fn attraction_site(snapshot: &DomainSnapshot, size: u32, kind: EntityKind) -> Coord {
    let grid = Grid::of(snapshot, size);
    let start = snapshot.entrance;

    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut candidates: SmallVec<[Coord; CANDIDATES]> = SmallVec::new();
    while candidates.len() < CANDIDATES {
        let Some(current) = queue.pop_front() else {
            break;
        };
        for n in grid.neighbors(current) {
            if visited.contains(&n) {
                continue;
            }
            match grid.get(n) {
                Cell::Path => {
                    visited.insert(n);
                    queue.push_back(n);
                }
                Cell::Empty if current != start => {
                    visited.insert(n);
                    candidates.push(n);
                }
                _ => {}
            }
        }
    }

    let score = |c: Coord| -> i32 {
        grid.neighbors(c)
            .into_iter()
            .map(|n| match (grid.get(n), kind) {
                (Cell::Empty, EntityKind::Ride) | (Cell::Water, EntityKind::Shop) => -1,
                (Cell::Water, EntityKind::Ride) | (Cell::Empty, EntityKind::Shop) => 1,
                _ => 0,
            })
            .sum()
    };

    let mut best: Option<(Coord, i32)> = None;
    for c in candidates {
        let s = score(c);
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((c, s));
        }
    }
    match best {
        Some((c, _)) => c,
        None => {
            log::debug!("no attraction site beside the path network, using the entrance");
            start
        }
    }
}

/// The worst-performing entity of one subtype and color.
fn worst(snapshot: &DomainSnapshot, subtype: Subtype, color: Color) -> Option<Coord> {
    let scored: Vec<(Coord, f64)> = match subtype.kind() {
        EntityKind::Ride => snapshot
            .ride_list()
            .iter()
            .filter(|r| subtype.ride() == Some(r.subtype) && r.subclass == color)
            .map(|r| (r.position, (r.revenue_generated - r.operating_cost) as f64))
            .collect(),
        EntityKind::Shop => snapshot
            .shop_list()
            .iter()
            .filter(|s| subtype.shop() == Some(s.subtype) && s.subclass == color)
            .map(|s| (s.position, (s.revenue_generated - s.operating_cost) as f64))
            .collect(),
        EntityKind::Staff => snapshot
            .staff_list()
            .iter()
            .filter(|e| subtype.role() == Some(e.role) && e.subclass == color)
            .map(|e| (e.position, e.success_metric_value))
            .collect(),
    };
    let mut best: Option<(Coord, f64)> = None;
    for (c, metric) in scored {
        if best.is_none_or(|(_, m)| metric < m) {
            best = Some((c, metric));
        }
    }
    best.map(|(c, _)| c)
}

/// The compact discrete action space.
///
/// ```
/// use midway_action::{ActionKind, CompactActionSpace};
/// use midway_core::{CodecConfig, ViewContext};
/// use midway_snapshot::DomainSnapshot;
/// use midway_test_utils::RawSnapshotBuilder;
///
/// let config = CodecConfig::default();
/// let space = CompactActionSpace::new(&config).unwrap();
/// let snap = DomainSnapshot::from_value(
///     RawSnapshotBuilder::new().entrance(4, 4).build(),
///     ViewContext::DETAILED,
///     &config,
/// )
/// .unwrap();
///
/// // place a red mechanic
/// let action = space.decode(&[0, 2, 7, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], &snap).unwrap();
/// assert_eq!(action.kind(), ActionKind::Place);
/// assert_eq!(
///     action.to_string(),
///     "place(type='staff', subtype='mechanic', subclass='red', x=4, y=4, price=1, order_quantity=-1)"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompactActionSpace {
    park_size: u32,
    prices: PriceTable,
    nvec: Vec<i64>,
}

impl CompactActionSpace {
    /// Build from `config`.
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut nvec = vec![
            ACTIONS.len() as i64,
            EntityKind::ALL.len() as i64,
            Subtype::ALL.len() as i64,
            Color::ALL.len() as i64,
            ResearchSpeed::ALL.len() as i64,
        ];
        nvec.extend(std::iter::repeat_n(2, Subtype::ALL.len()));
        Ok(Self {
            park_size: config.park_size,
            prices: config.prices.clone(),
            nvec,
        })
    }

    /// Number of choices per slot.
    pub fn nvec(&self) -> &[i64] {
        &self.nvec
    }

    /// Which slots after the selector an action reads.
    pub fn mask(&self, kind: ActionKind) -> Vec<bool> {
        let mut mask = vec![false; self.nvec.len() - 1];
        if kind.targets_entity() {
            mask[TYPE - 1..SUBCLASS].fill(true);
        } else if kind == ActionKind::SetResearch {
            mask[RESEARCH_SPEED - 1..].fill(true);
        }
        mask
    }

    fn check(&self, v: &[i64]) -> Result<ActionKind, DecodeError> {
        let bad = |reason: String| DecodeError::Vector {
            vector: v.to_vec(),
            reason,
        };
        if v.len() != self.nvec.len() {
            return Err(bad(format!(
                "expected {} slots, got {}",
                self.nvec.len(),
                v.len()
            )));
        }
        for (i, (&x, &n)) in v.iter().zip(&self.nvec).enumerate() {
            if x < 0 || x >= n {
                return Err(bad(format!("slot {i} holds {x}, outside 0..{n}")));
            }
        }
        Ok(ACTIONS[v[0] as usize])
    }

    /// Complete a compact vector into a validated action.
    ///
    /// Entity actions need itemized lists, so `snapshot` should be
    /// detailed; against a summary snapshot move, remove and modify find
    /// no target and placements fall back to the entrance.
    pub fn decode(&self, v: &[i64], snapshot: &DomainSnapshot) -> Result<Action, DecodeError> {
        let kind = self.check(v)?;
        let mut args: Vec<(Param, Literal)> = Vec::new();

        if kind == ActionKind::SetResearch {
            let speed = ResearchSpeed::ALL[v[RESEARCH_SPEED] as usize];
            let topics = Subtype::ALL
                .iter()
                .zip(&v[TOPICS..])
                .filter(|(_, &bit)| bit == 1)
                .map(|(t, _)| t.name());
            args.push((Param::ResearchSpeed, Literal::from(speed.name())));
            args.push((Param::ResearchTopics, Literal::str_list(topics)));
        } else if kind.targets_entity() {
            let entity = EntityKind::ALL[v[TYPE] as usize];
            let subtype = Subtype::ALL[v[SUBTYPE] as usize];
            let color = Color::ALL[v[SUBCLASS] as usize];
            if subtype.kind() != entity {
                return Err(DecodeError::Vector {
                    vector: v.to_vec(),
                    reason: format!("subtype '{subtype}' is not a {entity}"),
                });
            }
            args.push((Param::Type, Literal::from(entity.name())));
            args.push((Param::Subtype, Literal::from(subtype.name())));
            args.push((Param::Subclass, Literal::from(color.name())));

            let site = || match entity {
                EntityKind::Staff => snapshot.entrance,
                _ => attraction_site(snapshot, self.park_size, entity),
            };
            let target = || {
                worst(snapshot, subtype, color).ok_or_else(|| DecodeError::NoTarget {
                    action: kind.name(),
                    reason: format!("no {color} {subtype} in the park"),
                })
            };

            let at = if kind == ActionKind::Place {
                site()
            } else {
                target()?
            };
            args.push((Param::X, Literal::Int(i64::from(at.x))));
            args.push((Param::Y, Literal::Int(i64::from(at.y))));

            if kind == ActionKind::Move {
                let to = site();
                args.push((Param::NewX, Literal::Int(i64::from(to.x))));
                args.push((Param::NewY, Literal::Int(i64::from(to.y))));
            }
            if matches!(kind, ActionKind::Place | ActionKind::Modify) {
                if let Some(price) = self.prices.max_price(subtype, color) {
                    args.push((Param::Price, Literal::Int(i64::from(price))));
                }
                if entity == EntityKind::Shop {
                    let quantity = (2 * snapshot.guests.total_guests).max(10);
                    args.push((Param::OrderQuantity, Literal::Int(quantity)));
                }
            }
        }

        Action::from_args(kind, args)
    }

    /// Complete a compact vector and render it as action text.
    pub fn to_text(&self, v: &[i64], snapshot: &DomainSnapshot) -> Result<String, DecodeError> {
        Ok(self.decode(v, snapshot)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midway_core::ViewContext;
    use midway_test_utils::{complex_park, RawSnapshotBuilder};

    fn config() -> CodecConfig {
        CodecConfig::default()
    }

    fn snap(raw: serde_json::Value) -> DomainSnapshot {
        DomainSnapshot::from_value(raw, ViewContext::DETAILED, &config()).unwrap()
    }

    fn compact(selector: i64, ty: i64, subtype: i64, color: i64) -> Vec<i64> {
        let mut v = vec![0; 14];
        v[0] = selector;
        v[TYPE] = ty;
        v[SUBTYPE] = subtype;
        v[SUBCLASS] = color;
        v
    }

    #[test]
    fn nvec_and_masks() {
        let s = CompactActionSpace::new(&config()).unwrap();
        assert_eq!(s.nvec(), &[6, 3, 9, 4, 4, 2, 2, 2, 2, 2, 2, 2, 2, 2]);
        assert_eq!(s.mask(ActionKind::Remove)[..4], [true, true, true, false]);
        assert!(s.mask(ActionKind::SetResearch)[3..].iter().all(|&b| b));
        assert!(s.mask(ActionKind::Wait).iter().all(|&b| !b));
    }

    #[test]
    fn ride_prefers_water_and_shop_prefers_open_ground() {
        // Path runs right from the entrance; water lies below (5, 1).
        let raw = RawSnapshotBuilder::new()
            .entrance(2, 0)
            .path(3, 0, 1.0)
            .path(4, 0, 1.0)
            .path(5, 0, 1.0)
            .water(5, 2)
            .water(6, 1)
            .build();
        let s = snap(raw);
        // Candidates in discovery order: (3,1), (4,1), (6,0), (5,1).
        assert_eq!(attraction_site(&s, 20, EntityKind::Ride), Coord::new(5, 1));
        assert_eq!(attraction_site(&s, 20, EntityKind::Shop), Coord::new(3, 1));
    }

    #[test]
    fn cells_beside_the_entrance_are_skipped() {
        let raw = RawSnapshotBuilder::new().entrance(5, 5).build();
        let s = snap(raw);
        assert_eq!(attraction_site(&s, 20, EntityKind::Ride), Coord::new(5, 5));
    }

    #[test]
    fn worst_attraction_is_targeted() {
        let raw = RawSnapshotBuilder::new()
            .ride_with("carousel", "red", 2, 2, |r| {
                r.insert("revenue_generated".into(), 100.into());
            })
            .ride_with("carousel", "red", 7, 7, |r| {
                r.insert("revenue_generated".into(), 50.into());
            })
            .ride("carousel", "blue", 9, 9)
            .build();
        let space = CompactActionSpace::new(&config()).unwrap();
        let text = space.to_text(&compact(2, 0, 0, 3), &snap(raw)).unwrap();
        assert_eq!(text, "remove(type='ride', subtype='carousel', subclass='red', x=7, y=7)");
    }

    #[test]
    fn worst_staff_member_is_targeted() {
        let space = CompactActionSpace::new(&config()).unwrap();
        let s = snap(complex_park());
        let text = space.to_text(&compact(1, 2, 6, 1), &s).unwrap();
        assert_eq!(
            text,
            "move(type='staff', subtype='janitor', subclass='blue', x=2, y=2, new_x=0, new_y=0)"
        );
    }

    #[test]
    fn modify_shop_fills_price_and_quantity() {
        let space = CompactActionSpace::new(&config()).unwrap();
        let s = snap(complex_park());
        let text = space.to_text(&compact(3, 1, 4, 0), &s).unwrap();
        assert_eq!(
            text,
            "modify(type='shop', subtype='food', subclass='yellow', x=3, y=4, price=10, order_quantity=62)"
        );
    }

    #[test]
    fn missing_target_is_an_error() {
        let space = CompactActionSpace::new(&config()).unwrap();
        let s = snap(complex_park());
        assert!(matches!(
            space.decode(&compact(2, 0, 2, 3), &s),
            Err(DecodeError::NoTarget { action: "remove", .. })
        ));
    }

    #[test]
    fn mismatched_subtype_is_rejected() {
        let space = CompactActionSpace::new(&config()).unwrap();
        let s = snap(complex_park());
        assert!(matches!(
            space.decode(&compact(0, 0, 6, 0), &s),
            Err(DecodeError::Vector { .. })
        ));
    }

    #[test]
    fn research_and_wait() {
        let space = CompactActionSpace::new(&config()).unwrap();
        let s = snap(complex_park());
        let mut v = compact(4, 0, 0, 0);
        v[RESEARCH_SPEED] = 2;
        v[TOPICS + 4] = 1;
        assert_eq!(
            space.to_text(&v, &s).unwrap(),
            "set_research(research_speed='medium', research_topics=['food'])"
        );
        assert_eq!(space.to_text(&compact(5, 2, 8, 3), &s).unwrap(), "wait()");
    }
}
