use bevy_math::IVec3;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DYING_TICKS;
use crate::prelude::*;
use crate::sprite::advance_dying;
use crate::sprite::struck_by_player;

const LUNGE_TICKS: u32 = 6;
const RECOIL_TICKS: u32 = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriffidState {
    Idle,
    Lunging { direction: Direction, timer: u32 },
    Recoiling { timer: u32 },
}

sprite_struct!(
    /// A rooted plant that lunges at a player standing next to it. It
    /// can only be cut down while it is not mid lunge.
    pub struct Triffid {
        pub mode: TriffidState,
        dying: u32,
    }
);

impl Triffid {
    pub fn new(position: IVec3) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            mode: TriffidState::Idle,
            dying: 0,
        }
    }

    fn reach(&self) -> Option<IVec3> {
        match self.mode {
            TriffidState::Lunging { direction, .. } => Some(self.position() + direction.delta()),
            _ => None,
        }
    }
}

impl Sprite for Triffid {
    fn hits(&self, cell: IVec3) -> bool {
        self.dying == 0 && cell == self.position()
    }

    fn is_lethal(&self, cell: IVec3) -> bool {
        self.dying == 0 && (cell == self.position() || Some(cell) == self.reach())
    }

    fn is_enemy(&self) -> bool {
        true
    }

    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        let position = self.position();
        if advance_dying(self.id(), position, self.dying, &mut next.dying, ctx) {
            return;
        }
        let lunging = matches!(self.mode, TriffidState::Lunging { .. });
        if !lunging && struck_by_player(world, position) {
            next.dying = DYING_TICKS;
            ctx.play(Sound::Splat);
            return;
        }
        next.mode = match self.mode {
            TriffidState::Idle => world
                .player()
                .filter(|player| !player.is_dead() && player.position().z == position.z)
                .and_then(|player| Direction::between(position, player.position()))
                .map(|direction| TriffidState::Lunging {
                    direction,
                    timer: LUNGE_TICKS,
                })
                .unwrap_or(TriffidState::Idle),
            TriffidState::Lunging { timer: 0, .. } => TriffidState::Recoiling {
                timer: RECOIL_TICKS,
            },
            TriffidState::Lunging { direction, timer } => TriffidState::Lunging {
                direction,
                timer: timer - 1,
            },
            TriffidState::Recoiling { timer: 0 } => TriffidState::Idle,
            TriffidState::Recoiling { timer } => TriffidState::Recoiling { timer: timer - 1 },
        };
    }

    fn draw(&self, list: &mut DrawList) {
        let frame = match self.mode {
            TriffidState::Idle => 0,
            TriffidState::Lunging { .. } => 1,
            TriffidState::Recoiling { .. } => 2,
        };
        list.push_sprite(self.position(), 'T', frame);
        if let Some(reach) = self.reach() {
            list.push_sprite(reach, '~', frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Player;
    use crate::sprite::palette;

    #[test]
    fn lunges_at_a_neighbour_then_recoils() {
        let mut manager = SpriteManager::new();
        manager.add_sprite(BlockArray::slab(IVec3::new(0, 0, -1), 4, 4, palette::GREEN));
        let id = manager.add_sprite(Triffid::new(IVec3::new(1, 1, 0)));
        manager.add_sprite(Player::new(IVec3::new(1, 3, 0), Direction::South));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        manager.advance(&mut env, &mut events);
        assert_eq!(manager.get::<Triffid>(id).unwrap().mode, TriffidState::Idle);

        manager.player_mut().unwrap().set_position(IVec3::new(1, 2, 0));
        manager.advance(&mut env, &mut events);
        assert!(matches!(
            manager.get::<Triffid>(id).unwrap().mode,
            TriffidState::Lunging {
                direction: Direction::North,
                ..
            }
        ));
        assert!(manager.lethal_at(IVec3::new(1, 2, 0)));

        manager.advance(&mut env, &mut events);
        assert!(events.contains(&StoryEvent::PlayerKilled));

        for _ in 0..LUNGE_TICKS {
            manager.advance(&mut env, &mut events);
        }
        assert!(matches!(
            manager.get::<Triffid>(id).unwrap().mode,
            TriffidState::Recoiling { .. }
        ));
    }
}
