use bevy_math::IVec3;
use rand::Rng;

use crate::constants::DYING_TICKS;
use crate::prelude::*;
use crate::sprite::Flame;
use crate::sprite::advance_dying;
use crate::sprite::struck_by_player;

/// After a hit the dragon ignores further swings for this long.
pub const HIT_GRACE_TICKS: u32 = 12;
const BREATH_JITTER: u32 = 8;
const FLAME_RANGE: u32 = 6;
const FLAME_SPEED: u32 = 2;

sprite_struct!(
    /// The boss. Turns to face the player and breathes flames at a steady
    /// rate, and takes several hits to bring down.
    pub struct Dragon {
        pub facing: Direction,
        pub hit_points: u32,
        pub breath_period: u32,
        breath_timer: u32,
        grace_timer: u32,
        dying: u32,
    }
);

impl Dragon {
    pub fn new(position: IVec3, facing: Direction, hit_points: u32, breath_period: u32) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            facing,
            hit_points,
            breath_period,
            breath_timer: breath_period,
            grace_timer: 0,
            dying: 0,
        }
    }

    pub fn is_dying(&self) -> bool {
        self.dying > 0
    }
}

impl Sprite for Dragon {
    fn hits(&self, cell: IVec3) -> bool {
        self.dying == 0 && cell == self.position()
    }

    fn is_lethal(&self, cell: IVec3) -> bool {
        self.dying == 0 && cell == self.position()
    }

    fn is_enemy(&self) -> bool {
        true
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        let position = self.position();
        if advance_dying(self.id(), position, self.dying, &mut next.dying, ctx) {
            return;
        }
        if self.grace_timer > 0 {
            next.grace_timer = self.grace_timer - 1;
        } else if struck_by_player(world, position) {
            next.hit_points = self.hit_points.saturating_sub(1);
            next.grace_timer = HIT_GRACE_TICKS;
            ctx.play(Sound::Splat);
            if next.hit_points == 0 {
                next.dying = DYING_TICKS;
                return;
            }
        }
        if let Some(player) = world.player().filter(|p| !p.is_dead())
            && let Some(direction) = Direction::toward(position, player.position())
        {
            next.facing = direction;
        }
        if self.breath_timer > 0 {
            next.breath_timer = self.breath_timer - 1;
            return;
        }
        let jitter = self.rng(ctx.tick()).random_range(0..BREATH_JITTER);
        next.breath_timer = self.breath_period + jitter;
        ctx.spawn(Flame::new(
            position + next.facing.delta(),
            next.facing,
            FLAME_SPEED,
            FLAME_RANGE,
        ));
        ctx.play(Sound::Flame);
    }

    fn draw(&self, list: &mut DrawList) {
        let frame = if self.grace_timer > 0 { 1 } else { 0 };
        list.push_sprite(self.position(), 'D', frame);
    }
}
