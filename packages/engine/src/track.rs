use bevy_math::IVec3;
use serde::Deserialize;
use serde::Serialize;

use crate::Direction;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackMode {
    /// Return to the first waypoint after the last.
    #[default]
    Loop,
    /// Walk the waypoints back in reverse after the last.
    Bounce,
}

/// A patrol route through a list of waypoints. Movers call `next_cell`
/// once per step and decide themselves whether the returned cell can be
/// entered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Track {
    waypoints: Vec<IVec3>,
    mode: TrackMode,
    target: usize,
    forward: bool,
}

impl Track {
    pub fn new(waypoints: Vec<IVec3>, mode: TrackMode) -> Self {
        assert!(!waypoints.is_empty(), "a track needs at least one waypoint");
        Self {
            waypoints,
            mode,
            target: 0,
            forward: true,
        }
    }

    /// Waypoints built from a start cell and a string of compass moves,
    /// one waypoint per character.
    pub fn from_moves(start: IVec3, moves: &str, mode: TrackMode) -> Self {
        let mut cell = start;
        let mut waypoints = vec![start];
        for c in moves.chars() {
            let direction = Direction::from_char(c)
                .unwrap_or_else(|| panic!("invalid track move '{c}'"));
            cell += direction.delta();
            waypoints.push(cell);
        }
        Self::new(waypoints, mode)
    }

    pub fn target(&self) -> IVec3 {
        self.waypoints[self.target]
    }

    pub fn mode(&self) -> TrackMode {
        self.mode
    }

    /// The cell one step from `from` toward the current waypoint, moving
    /// along x first, then y, then z. Reaching a waypoint retargets to
    /// the next one before stepping.
    pub fn next_cell(&mut self, from: IVec3) -> IVec3 {
        if from == self.target() {
            self.advance_target();
        }
        let target = self.target();
        let mut step = IVec3::ZERO;
        if target.x != from.x {
            step.x = (target.x - from.x).signum();
        } else if target.y != from.y {
            step.y = (target.y - from.y).signum();
        } else if target.z != from.z {
            step.z = (target.z - from.z).signum();
        }
        from + step
    }

    fn advance_target(&mut self) {
        let len = self.waypoints.len();
        if len == 1 {
            return;
        }
        match self.mode {
            TrackMode::Loop => self.target = (self.target + 1) % len,
            TrackMode::Bounce => {
                if self.forward && self.target + 1 == len {
                    self.forward = false;
                } else if !self.forward && self.target == 0 {
                    self.forward = true;
                }
                if self.forward {
                    self.target += 1;
                } else {
                    self.target -= 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(track: &mut Track, mut cell: IVec3, steps: usize) -> Vec<IVec3> {
        let mut out = Vec::new();
        for _ in 0..steps {
            cell = track.next_cell(cell);
            out.push(cell);
        }
        out
    }

    #[test]
    fn loop_wraps_to_first_waypoint() {
        let start = IVec3::new(0, 0, 0);
        let mut track = Track::from_moves(start, "EN", TrackMode::Loop);
        let cells = walk(&mut track, start, 4);
        assert_eq!(
            cells,
            vec![
                IVec3::new(1, 0, 0),
                IVec3::new(1, 1, 0),
                // back toward the start, x first
                IVec3::new(0, 1, 0),
                IVec3::new(0, 0, 0),
            ]
        );
    }

    #[test]
    fn bounce_reverses_at_ends() {
        let start = IVec3::new(0, 0, 0);
        let mut track = Track::new(vec![start, IVec3::new(2, 0, 0)], TrackMode::Bounce);
        let xs: Vec<i32> = walk(&mut track, start, 6).iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn single_waypoint_holds_position() {
        let cell = IVec3::new(3, 3, 0);
        let mut track = Track::new(vec![cell], TrackMode::Bounce);
        assert_eq!(track.next_cell(cell), cell);
    }
}
