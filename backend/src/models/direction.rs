//! Compass directions and movement identifiers
//!
//! A four-way intersection has exactly eight movements: each of the four
//! approaches has a left-turn movement and a straight movement (which also
//! carries right turns). Movements are addressed by a small integer index so
//! that per-movement state lives in fixed-size arrays instead of maps.
//!
//! # Conflict groups
//!
//! The eight movements fall into four mutually exclusive groups:
//!
//! ```text
//! NsStraight = {N-straight, S-straight}
//! EwStraight = {E-straight, W-straight}
//! NsLeft     = {N-left,     S-left}
//! EwLeft     = {E-left,     W-left}
//! ```
//!
//! At most one group may show green at any instant.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Approach a vehicle enters from (or leaves towards)
///
/// Serialized lower-case; parsed in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// A road or vehicle-class name that matches no variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {name:?}")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

impl Direction {
    /// All directions in canonical order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Direction reached by turning left from this approach
    ///
    /// # Example
    /// ```
    /// use signal_control_core::Direction;
    ///
    /// assert_eq!(Direction::North.left(), Direction::West);
    /// assert_eq!(Direction::West.left(), Direction::South);
    /// ```
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Direction reached by turning right from this approach
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// True for the north/south axis
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// Position in [`Direction::ALL`]
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Upper-case label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
            Direction::East => "EAST",
            Direction::West => "WEST",
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.label().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownName {
                kind: "direction",
                name: name.to_string(),
            })
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of movement a queue serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    #[serde(alias = "LEFT", alias = "Left")]
    Left,
    /// Straight through; right turns share this movement
    #[serde(alias = "STRAIGHT", alias = "Straight")]
    Straight,
}

impl MovementKind {
    pub const ALL: [MovementKind; 2] = [MovementKind::Left, MovementKind::Straight];

    /// Movement a vehicle from `origin` heading to `destination` uses
    ///
    /// Only a left turn gets the left movement; straight, right and
    /// U-turn traffic all queue in the straight movement.
    ///
    /// # Example
    /// ```
    /// use signal_control_core::{Direction, MovementKind};
    ///
    /// assert_eq!(MovementKind::for_route(Direction::North, Direction::West), MovementKind::Left);
    /// assert_eq!(MovementKind::for_route(Direction::North, Direction::South), MovementKind::Straight);
    /// assert_eq!(MovementKind::for_route(Direction::North, Direction::East), MovementKind::Straight);
    /// ```
    pub fn for_route(origin: Direction, destination: Direction) -> MovementKind {
        if destination == origin.left() {
            MovementKind::Left
        } else {
            MovementKind::Straight
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::Left => f.write_str("LEFT"),
            MovementKind::Straight => f.write_str("STRAIGHT"),
        }
    }
}

/// Mutually exclusive class of movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictGroup {
    NsStraight,
    EwStraight,
    NsLeft,
    EwLeft,
}

impl ConflictGroup {
    pub const ALL: [ConflictGroup; 4] = [
        ConflictGroup::NsStraight,
        ConflictGroup::EwStraight,
        ConflictGroup::NsLeft,
        ConflictGroup::EwLeft,
    ];

    pub fn index(self) -> usize {
        match self {
            ConflictGroup::NsStraight => 0,
            ConflictGroup::EwStraight => 1,
            ConflictGroup::NsLeft => 2,
            ConflictGroup::EwLeft => 3,
        }
    }

    /// The two movements belonging to this group
    pub fn members(self) -> MovementSet {
        let (a, b, kind) = match self {
            ConflictGroup::NsStraight => (Direction::North, Direction::South, MovementKind::Straight),
            ConflictGroup::EwStraight => (Direction::East, Direction::West, MovementKind::Straight),
            ConflictGroup::NsLeft => (Direction::North, Direction::South, MovementKind::Left),
            ConflictGroup::EwLeft => (Direction::East, Direction::West, MovementKind::Left),
        };
        MovementSet::from_movements([MovementId::new(a, kind), MovementId::new(b, kind)])
    }
}

/// One of the eight (direction, kind) movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementId {
    pub direction: Direction,
    pub kind: MovementKind,
}

impl MovementId {
    /// Number of movements at a four-way intersection
    pub const COUNT: usize = 8;

    pub const fn new(direction: Direction, kind: MovementKind) -> Self {
        Self { direction, kind }
    }

    /// All movements in index order
    pub fn all() -> impl Iterator<Item = MovementId> {
        (0..Self::COUNT).map(Self::from_index)
    }

    /// Array slot of this movement: `direction * 2 + kind`
    pub fn index(self) -> usize {
        let kind = match self.kind {
            MovementKind::Left => 0,
            MovementKind::Straight => 1,
        };
        self.direction.index() * 2 + kind
    }

    /// Inverse of [`MovementId::index`]
    ///
    /// # Panics
    ///
    /// Panics if `index >= MovementId::COUNT`; every caller derives the index
    /// from an existing `MovementId` or a bounded loop.
    pub fn from_index(index: usize) -> Self {
        assert!(index < Self::COUNT, "movement index {} out of range", index);
        let direction = Direction::ALL[index / 2];
        let kind = MovementKind::ALL[index % 2];
        Self { direction, kind }
    }

    pub fn conflict_group(self) -> ConflictGroup {
        match (self.direction.is_vertical(), self.kind) {
            (true, MovementKind::Straight) => ConflictGroup::NsStraight,
            (false, MovementKind::Straight) => ConflictGroup::EwStraight,
            (true, MovementKind::Left) => ConflictGroup::NsLeft,
            (false, MovementKind::Left) => ConflictGroup::EwLeft,
        }
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.direction, self.kind)
    }
}

/// Set of movements, stored as an 8-bit mask
///
/// # Example
/// ```
/// use signal_control_core::{Direction, MovementId, MovementKind, MovementSet};
///
/// let ns = MovementId::new(Direction::North, MovementKind::Straight);
/// let mut set = MovementSet::empty();
/// set.insert(ns);
/// assert!(set.contains(ns));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MovementSet(u8);

impl MovementSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn single(movement: MovementId) -> Self {
        Self(1 << movement.index())
    }

    pub fn from_movements<I: IntoIterator<Item = MovementId>>(movements: I) -> Self {
        let mut set = Self::empty();
        for movement in movements {
            set.insert(movement);
        }
        set
    }

    pub fn insert(&mut self, movement: MovementId) {
        self.0 |= 1 << movement.index();
    }

    pub fn contains(self, movement: MovementId) -> bool {
        self.0 & (1 << movement.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = MovementId> {
        MovementId::all().filter(move |m| self.contains(*m))
    }
}

impl fmt::Debug for MovementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|m| m.to_string())).finish()
    }
}

impl FromIterator<MovementId> for MovementSet {
    fn from_iter<I: IntoIterator<Item = MovementId>>(iter: I) -> Self {
        Self::from_movements(iter)
    }
}
