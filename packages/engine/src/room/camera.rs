use bevy_math::IVec2;
use bevy_math::IVec3;

use crate::constants::ROOM_SIZE;

/// A height band for the camera. Bands of neighbouring levels overlap
/// so a player standing in the overlap does not flip between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraLevel {
    pub z_min: i32,
    pub z_max: i32,
    /// Height the camera centres on while in this band.
    pub view_z: i32,
}

impl CameraLevel {
    pub const fn new(z_min: i32, z_max: i32, view_z: i32) -> Self {
        Self {
            z_min,
            z_max,
            view_z,
        }
    }

    pub fn contains(&self, z: i32) -> bool {
        z >= self.z_min && z <= self.z_max
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scroll {
    Horizontal { from: IVec2, to: IVec2 },
    Vertical { from: usize, to: usize },
}

/// Which zone and level of the active room is on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub zone: IVec2,
    pub level: usize,
}

impl Camera {
    fn zone_for(position: IVec3, zones: IVec2) -> IVec2 {
        IVec2::new(
            position.x.div_euclid(ROOM_SIZE).clamp(0, zones.x - 1),
            position.y.div_euclid(ROOM_SIZE).clamp(0, zones.y - 1),
        )
    }

    fn level_for(z: i32, levels: &[CameraLevel]) -> usize {
        levels.iter().position(|level| level.contains(z)).unwrap_or(0)
    }

    /// Jump straight to the view for `position`, as on entering a room.
    pub fn reset(&mut self, position: IVec3, zones: IVec2, levels: &[CameraLevel]) {
        self.zone = Self::zone_for(position, zones);
        self.level = Self::level_for(position.z, levels);
    }

    /// Move to the zone the player is in, if it changed.
    pub fn check_horizontal_scroll(&mut self, position: IVec3, zones: IVec2) -> Option<Scroll> {
        let zone = Self::zone_for(position, zones);
        if zone == self.zone {
            return None;
        }
        let from = self.zone;
        self.zone = zone;
        Some(Scroll::Horizontal { from, to: zone })
    }

    /// Move one level up or down once the player leaves the current band.
    pub fn check_vertical_scroll(&mut self, z: i32, levels: &[CameraLevel]) -> Option<Scroll> {
        let current = levels.get(self.level)?;
        let from = self.level;
        if z > current.z_max && self.level + 1 < levels.len() {
            self.level += 1;
        } else if z < current.z_min && self.level > 0 {
            self.level -= 1;
        } else {
            return None;
        }
        Some(Scroll::Vertical {
            from,
            to: self.level,
        })
    }

    pub fn view_z(&self, levels: &[CameraLevel]) -> i32 {
        levels.get(self.level).map(|level| level.view_z).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [CameraLevel; 2] = [CameraLevel::new(-10, 3, 0), CameraLevel::new(2, 20, 4)];

    #[test]
    fn overlapping_bands_give_hysteresis() {
        let mut camera = Camera::default();
        assert_eq!(camera.check_vertical_scroll(3, &LEVELS), None);
        assert_eq!(
            camera.check_vertical_scroll(4, &LEVELS),
            Some(Scroll::Vertical { from: 0, to: 1 })
        );
        // back inside the overlap, still on the upper level
        assert_eq!(camera.check_vertical_scroll(2, &LEVELS), None);
        assert_eq!(camera.view_z(&LEVELS), 4);
        assert_eq!(
            camera.check_vertical_scroll(1, &LEVELS),
            Some(Scroll::Vertical { from: 1, to: 0 })
        );
    }

    #[test]
    fn horizontal_scroll_follows_zones() {
        let mut camera = Camera::default();
        let zones = IVec2::new(2, 1);
        assert_eq!(camera.check_horizontal_scroll(IVec3::new(9, 5, 0), zones), None);
        assert_eq!(
            camera.check_horizontal_scroll(IVec3::new(10, 5, 0), zones),
            Some(Scroll::Horizontal {
                from: IVec2::ZERO,
                to: IVec2::new(1, 0)
            })
        );
        // the east doorway is outside the room but still shows zone one
        assert_eq!(camera.check_horizontal_scroll(IVec3::new(20, 5, 0), zones), None);
    }
}
