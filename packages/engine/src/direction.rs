use bevy_math::IVec3;
use serde::Deserialize;
use serde::Serialize;
use strum::EnumIter;

/// Compass directions in the x/y plane. North is +y, east is +x.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter,
)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn delta(&self) -> IVec3 {
        match self {
            Direction::North => IVec3::new(0, 1, 0),
            Direction::East => IVec3::new(1, 0, 0),
            Direction::South => IVec3::new(0, -1, 0),
            Direction::West => IVec3::new(-1, 0, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The direction of a single orthogonal step from `from` to `to`,
    /// ignoring z. None unless the two cells are orthogonal neighbours.
    pub fn between(from: IVec3, to: IVec3) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// The dominant direction from `from` toward `to`, preferring the x
    /// axis on ties. None if the cells share an x/y column.
    pub fn toward(from: IVec3, to: IVec3) -> Option<Self> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0 { Direction::East } else { Direction::West })
        } else {
            Some(if dy > 0 {
                Direction::North
            } else {
                Direction::South
            })
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' | 'n' => Some(Direction::North),
            'E' | 'e' => Some(Direction::East),
            'S' | 's' => Some(Direction::South),
            'W' | 'w' => Some(Direction::West),
            _ => None,
        }
    }
}
