use bevy_math::IVec3;
use rand::Rng;

use crate::constants::DYING_TICKS;
use crate::prelude::*;
use crate::sprite::advance_dying;
use crate::sprite::struck_by_player;

const SOLID_TICKS: u32 = 40;
const FADED_TICKS: u32 = 30;
/// Random extra length added to every phase.
const PHASE_JITTER: u32 = 10;

sprite_struct!(
    /// A floating enemy that drifts through walls along its track and
    /// fades in and out. Only a solid spook can hurt or be hurt.
    pub struct Spook {
        track: Track,
        pub speed: u32,
        move_timer: u32,
        solid: bool,
        phase_timer: u32,
        dying: u32,
    }
);

impl Spook {
    pub fn new(track: Track, speed: u32) -> Self {
        Self {
            state: BaseSpriteState::at(track.target()),
            track,
            speed,
            move_timer: speed,
            solid: true,
            phase_timer: SOLID_TICKS,
            dying: 0,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.solid
    }
}

impl Sprite for Spook {
    fn is_lethal(&self, cell: IVec3) -> bool {
        self.solid && self.dying == 0 && cell == self.position()
    }

    fn is_enemy(&self) -> bool {
        true
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        let position = self.position();
        if advance_dying(self.id(), position, self.dying, &mut next.dying, ctx) {
            return;
        }
        if self.solid && struck_by_player(world, position) {
            next.dying = DYING_TICKS;
            ctx.play(Sound::Splat);
            return;
        }
        if self.phase_timer == 0 {
            let jitter = self.rng(ctx.tick()).random_range(0..PHASE_JITTER);
            next.solid = !self.solid;
            next.phase_timer = jitter + if next.solid { SOLID_TICKS } else { FADED_TICKS };
        } else {
            next.phase_timer = self.phase_timer - 1;
        }
        if self.move_timer > 0 {
            next.move_timer = self.move_timer - 1;
            return;
        }
        // walls and floors mean nothing to a spook
        let target = next.track.next_cell(position);
        next.set_position(target);
        next.move_timer = self.speed;
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), if self.solid { 'S' } else { 's' }, 0);
    }
}
