use bevy_math::IVec3;

use crate::prelude::*;
use crate::sprite::WallSwitch;

/// Shared flight rules for flames and bullets: advance one cell every
/// `speed` ticks, vanish when out of range or when the next cell is solid.
/// Returns the new cell, if the projectile survives.
fn fly(
    world: &SpriteManager,
    position: IVec3,
    direction: Direction,
    range: u32,
    id: SpriteId,
    passes: impl Fn(IVec3) -> bool,
) -> Option<IVec3> {
    if range == 0 {
        return None;
    }
    let target = position + direction.delta();
    if world.blocked(target, Some(id)) && !passes(target) {
        return None;
    }
    Some(target)
}

sprite_struct!(
    /// Dragon breath.
    pub struct Flame {
        pub direction: Direction,
        pub speed: u32,
        pub range: u32,
        move_timer: u32,
    }
);

impl Flame {
    pub fn new(position: IVec3, direction: Direction, speed: u32, range: u32) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            direction,
            speed,
            range,
            move_timer: speed,
        }
    }
}

impl Sprite for Flame {
    fn is_lethal(&self, cell: IVec3) -> bool {
        cell == self.position()
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        if self.move_timer > 0 {
            next.move_timer = self.move_timer - 1;
            return;
        }
        match fly(world, self.position(), self.direction, self.range, self.id(), |_| false) {
            Some(target) => {
                next.set_position(target);
                next.range = self.range - 1;
                next.move_timer = self.speed;
            }
            None => ctx.remove(self.id()),
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), '*', (self.range % 2) as u8);
    }
}

sprite_struct!(
    /// Turret fire. Flies into wall switches, which toggle when struck.
    pub struct Bullet {
        pub direction: Direction,
        pub speed: u32,
        pub range: u32,
        move_timer: u32,
    }
);

impl Bullet {
    pub fn new(position: IVec3, direction: Direction, speed: u32, range: u32) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            direction,
            speed,
            range,
            move_timer: speed,
        }
    }
}

impl Sprite for Bullet {
    fn is_lethal(&self, cell: IVec3) -> bool {
        cell == self.position()
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        if self.move_timer > 0 {
            next.move_timer = self.move_timer - 1;
            return;
        }
        // a bullet inside a switch has done its job
        let inside_switch = world
            .sprites_of_type::<WallSwitch>()
            .any(|switch| switch.position() == self.position());
        let flight = if inside_switch {
            None
        } else {
            fly(world, self.position(), self.direction, self.range, self.id(), |cell| {
                world
                    .sprites_of_type::<WallSwitch>()
                    .any(|switch| switch.position() == cell)
            })
        };
        match flight {
            Some(target) => {
                next.set_position(target);
                next.range = self.range - 1;
                next.move_timer = self.speed;
            }
            None => ctx.remove(self.id()),
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), '-', 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::palette;

    #[test]
    fn flames_burn_out_at_walls() {
        let mut manager = SpriteManager::new();
        manager.add_sprite(BlockArray::slab(IVec3::new(3, 0, 0), 1, 1, palette::BROWN));
        let id = manager.add_sprite(Flame::new(IVec3::new(1, 0, 0), Direction::East, 0, 10));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        manager.advance(&mut env, &mut events);
        assert_eq!(manager.get::<Flame>(id).unwrap().position(), IVec3::new(2, 0, 0));
        manager.advance(&mut env, &mut events);
        assert!(!manager.contains(id));
    }

    #[test]
    fn range_limits_flight() {
        let mut manager = SpriteManager::new();
        let id = manager.add_sprite(Bullet::new(IVec3::ZERO, Direction::North, 0, 2));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        for _ in 0..2 {
            manager.advance(&mut env, &mut events);
        }
        assert_eq!(manager.get::<Bullet>(id).unwrap().position(), IVec3::new(0, 2, 0));
        manager.advance(&mut env, &mut events);
        assert!(!manager.contains(id));
    }
}
