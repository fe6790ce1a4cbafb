use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four cardinal neighbors, unbounded; containers decide which exist.
    pub fn neighbors(self) -> [Coord; 4] {
        [
            Coord { x: self.x, y: self.y - 1 },
            Coord { x: self.x + 1, y: self.y },
            Coord { x: self.x, y: self.y + 1 },
            Coord { x: self.x - 1, y: self.y },
        ]
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grass,
    Mountain,
    Water,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleState {
    None,
    MyCastle,
    EnemyCastle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureState {
    None,
    MyTreasure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarState {
    None,
    Mine,
    Enemy,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Derives the cardinal direction for a unit step between two coordinates.
    /// Any delta other than exactly one of the four unit deltas is `None`.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }

    pub fn step(self, from: Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: from.x, y: from.y - 1 },
            Direction::Down => Coord { x: from.x, y: from.y + 1 },
            Direction::Left => Coord { x: from.x - 1, y: from.y },
            Direction::Right => Coord { x: from.x + 1, y: from.y },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    OutOfBounds { coord: Coord, width: i32, height: i32 },
    WrongFieldCount { expected: usize, actual: usize },
    CastleMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapGenError {
    AttemptBudgetExhausted { attempts: u32 },
}
