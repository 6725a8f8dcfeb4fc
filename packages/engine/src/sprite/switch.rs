use bevy_math::IVec3;

use crate::prelude::*;
use crate::sprite::Bullet;

sprite_struct!(
    /// A pressure plate. Toggles each time the player steps onto it and
    /// reports the new state as a `StateChange`.
    pub struct FloorSwitch {
        on: bool,
        frozen: bool,
        /// Whether the player stood on the plate last tick.
        occupied: bool,
    }
);

impl FloorSwitch {
    pub fn new(position: IVec3, on: bool) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            on,
            frozen: false,
            occupied: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Set the state without raising an event.
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    /// A frozen switch ignores the player.
    pub fn freeze_state(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl Sprite for FloorSwitch {
    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        let present = world
            .player()
            .is_some_and(|player| !player.is_dead() && player.position() == self.position());
        next.occupied = present;
        if present && !self.occupied && !self.frozen {
            next.on = !self.on;
            ctx.play(Sound::Switch);
            ctx.push_event(StoryEvent::StateChange {
                id: self.id(),
                on: next.on,
            });
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), if self.on { '+' } else { 'o' }, self.on as u8);
    }
}

sprite_struct!(
    /// A lever set into a wall. Toggled by the start of a swing aimed at
    /// it or by a bullet flying into it.
    pub struct WallSwitch {
        on: bool,
        frozen: bool,
    }
);

impl WallSwitch {
    pub fn new(position: IVec3, on: bool) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            on,
            frozen: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Set the state without raising an event.
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    pub fn freeze_state(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl Sprite for WallSwitch {
    fn hits(&self, cell: IVec3) -> bool {
        cell == self.position()
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        if self.frozen {
            return;
        }
        let position = self.position();
        let swung_at = world.player().is_some_and(|player| {
            !player.is_dead() && player.attack_started() && player.facing_cell() == position
        });
        let shot = world
            .sprites_of_type::<Bullet>()
            .any(|bullet| bullet.position() == position);
        if swung_at || shot {
            next.on = !self.on;
            ctx.play(Sound::Switch);
            ctx.push_event(StoryEvent::StateChange {
                id: self.id(),
                on: next.on,
            });
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), if self.on { '/' } else { '\\' }, self.on as u8);
    }
}
