use bevy_math::IVec3;

use crate::collision;
use crate::constants::DYING_TICKS;
use crate::prelude::*;
use crate::sprite::advance_dying;
use crate::sprite::struck_by_player;

sprite_struct!(
    /// A small ground bound enemy that patrols a track. One hit kills it.
    pub struct Critter {
        track: Track,
        /// Ticks between steps.
        pub speed: u32,
        move_timer: u32,
        dying: u32,
    }
);

impl Critter {
    /// Starts on the track's first waypoint.
    pub fn new(track: Track, speed: u32) -> Self {
        Self {
            state: BaseSpriteState::at(track.target()),
            track,
            speed,
            move_timer: speed,
            dying: 0,
        }
    }

    pub fn is_dying(&self) -> bool {
        self.dying > 0
    }
}

impl Sprite for Critter {
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
        if struck_by_player(world, position) {
            next.dying = DYING_TICKS;
            ctx.play(Sound::Splat);
            return;
        }
        if self.move_timer > 0 {
            next.move_timer = self.move_timer - 1;
            return;
        }
        let mut track = self.track.clone();
        let target = track.next_cell(position);
        // blocked critters wait without advancing along the track
        if collision::walkable(world, target, self.id()) {
            next.track = track;
            next.set_position(target);
        }
        next.move_timer = self.speed;
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), 'c', self.is_dying() as u8);
    }
}
