use bevy_math::IVec3;

use crate::prelude::*;

sprite_struct!(
    /// A treasure chest. Opens when the player walks into it and reports
    /// the opening as a `StateChange`. The room decides what was inside.
    pub struct Chest {
        open: bool,
    }
);

impl Chest {
    pub fn new(position: IVec3, open: bool) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Sprite for Chest {
    fn hits(&self, cell: IVec3) -> bool {
        cell == self.position()
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        !self.open
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        let bumped = world
            .player()
            .is_some_and(|player| player.bumped() == Some(self.position()));
        if bumped {
            next.open = true;
            ctx.play(Sound::Chest);
            ctx.push_event(StoryEvent::StateChange {
                id: self.id(),
                on: true,
            });
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), if self.open { 'u' } else { '$' }, self.open as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Player;
    use crate::sprite::palette;

    #[test]
    fn opens_once_when_walked_into() {
        let mut manager = SpriteManager::new();
        manager.add_sprite(BlockArray::slab(IVec3::new(0, 0, -1), 4, 4, palette::GREEN));
        let id = manager.add_sprite(Chest::new(IVec3::new(2, 2, 0), false));
        manager.add_sprite(Player::new(IVec3::new(1, 2, 0), Direction::East));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        for _ in 0..12 {
            env.begin_tick(ActionInput::moving(Direction::East));
            manager.advance(&mut env, &mut events);
        }
        assert!(manager.get::<Chest>(id).unwrap().is_open());
        assert_eq!(manager.player().unwrap().position(), IVec3::new(1, 2, 0));
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == StoryEvent::StateChange { id, on: true })
                .count(),
            1
        );
    }
}
