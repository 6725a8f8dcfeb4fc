use bevy_math::IVec3;
use tracing::debug;

use crate::collision;
use crate::constants::*;
use crate::prelude::*;

sprite_struct!(
    pub struct Player {
        pub facing: Direction,
        walk_timer: u32,
        fall_timer: u32,
        attack_timer: u32,
        falling: bool,
        /// The blocked cell the player last tried to walk into.
        bumped: Option<IVec3>,
        dead: bool,
        death_timer: u32,
    }
);

impl Player {
    pub fn new(position: IVec3, facing: Direction) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            facing,
            walk_timer: 0,
            fall_timer: 0,
            attack_timer: 0,
            falling: false,
            bumped: None,
            dead: false,
            death_timer: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// True once the death animation has run its course.
    pub fn death_finished(&self) -> bool {
        self.dead && self.death_timer == 0
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0
    }

    /// True on the first tick of a swing only.
    pub fn attack_started(&self) -> bool {
        self.attack_timer == ATTACK_TICKS
    }

    /// The cell in front of the player.
    pub fn facing_cell(&self) -> IVec3 {
        self.position() + self.facing.delta()
    }

    /// Whether the current swing reaches `cell`, either the cell in
    /// front or the one the player stands in.
    pub fn strikes(&self, cell: IVec3) -> bool {
        self.is_attacking() && (cell == self.facing_cell() || cell == self.position())
    }

    pub fn bumped(&self) -> Option<IVec3> {
        self.bumped
    }

    fn die(&mut self, ctx: &mut TickContext) {
        debug!("player died at {}", self.position());
        self.dead = true;
        self.death_timer = DEATH_TICKS;
        self.attack_timer = 0;
        ctx.play(Sound::Death);
        ctx.push_event(StoryEvent::PlayerKilled);
    }

    fn touches_hazard(&self, world: &SpriteManager) -> bool {
        let position = self.position();
        let attacking = self.is_attacking();
        world.list().any(|sprite| {
            sprite.id() != self.id()
                && sprite.is_lethal(position)
                && !(attacking && sprite.is_enemy())
        })
    }
}

impl Sprite for Player {
    fn advance(&self, world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        if self.dead {
            next.death_timer = self.death_timer.saturating_sub(1);
            return;
        }
        next.attack_timer = self.attack_timer.saturating_sub(1);
        next.walk_timer = self.walk_timer.saturating_sub(1);
        next.bumped = None;

        if self.touches_hazard(world) {
            next.die(ctx);
            return;
        }

        let position = self.position();
        if !collision::supported(world, position) {
            next.falling = true;
            if self.fall_timer > 0 {
                next.fall_timer = self.fall_timer - 1;
                return;
            }
            let below = collision::fall_step(world, position);
            next.set_position(below);
            next.fall_timer = FALL_TICKS - 1;
            if below.z < FALL_DEATH_Z {
                next.die(ctx);
            }
            return;
        }
        next.falling = false;
        next.fall_timer = 0;

        let input = ctx.env.input;
        if input.attack && !self.is_attacking() {
            next.attack_timer = ATTACK_TICKS;
            ctx.play(Sound::Swing);
            return;
        }
        if self.is_attacking() || self.walk_timer > 0 {
            return;
        }
        let Some(direction) = input.direction() else {
            return;
        };
        next.facing = direction;
        match collision::step_target(world, position, direction, true, self.id()) {
            Some(target) => {
                next.set_position(target);
                next.walk_timer = WALK_TICKS - 1;
                ctx.play(Sound::Step);
            }
            None => next.bumped = Some(position + direction.delta()),
        }
    }

    fn draw(&self, list: &mut DrawList) {
        let frame = if self.dead {
            2
        } else if self.is_attacking() {
            1
        } else {
            0
        };
        list.push_sprite(self.position(), '@', frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::palette;

    fn room() -> (SpriteManager, SpriteId) {
        let mut manager = SpriteManager::new();
        // a 5x5 floor with a pit at x = 4 and a step at (2, 2)
        manager.add_sprite(BlockArray::from_fn(
            IVec3::new(0, 0, -1),
            IVec3::new(5, 5, 2),
            |local| match (local.x, local.y, local.z) {
                (4, _, _) => None,
                (_, _, 0) => Some(palette::GREEN),
                (2, 2, 1) => Some(palette::BROWN),
                _ => None,
            },
        ));
        let id = manager.add_sprite(Player::new(IVec3::new(1, 2, 0), Direction::East));
        (manager, id)
    }

    fn run(manager: &mut SpriteManager, env: &mut Env, events: &mut StoryEvents, input: ActionInput, ticks: usize) {
        for _ in 0..ticks {
            env.begin_tick(input);
            manager.advance(env, events);
        }
    }

    #[test]
    fn climbs_one_step() {
        let (mut manager, id) = room();
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        run(&mut manager, &mut env, &mut events, ActionInput::moving(Direction::East), 1);
        let player = manager.get::<Player>(id).unwrap();
        assert_eq!(player.position(), IVec3::new(2, 2, 1));
        assert!(collision::supported(&manager, player.position()));
    }

    #[test]
    fn walking_waits_between_steps() {
        let (mut manager, id) = room();
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        manager.get_mut::<Player>(id).unwrap().set_position(IVec3::new(0, 0, 0));
        run(&mut manager, &mut env, &mut events, ActionInput::moving(Direction::North), WALK_TICKS as usize);
        assert_eq!(manager.get::<Player>(id).unwrap().position(), IVec3::new(0, 1, 0));
        run(&mut manager, &mut env, &mut events, ActionInput::moving(Direction::North), 1);
        assert_eq!(manager.get::<Player>(id).unwrap().position(), IVec3::new(0, 2, 0));
    }

    #[test]
    fn falling_out_of_the_room_kills_once() {
        let (mut manager, id) = room();
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        manager.get_mut::<Player>(id).unwrap().set_position(IVec3::new(3, 0, 0));
        run(&mut manager, &mut env, &mut events, ActionInput::moving(Direction::East), 1);
        assert_eq!(manager.get::<Player>(id).unwrap().position(), IVec3::new(4, 0, 0));
        run(&mut manager, &mut env, &mut events, ActionInput::default(), 20);
        let player = manager.get::<Player>(id).unwrap();
        assert!(player.is_dead());
        assert_eq!(player.position().z, FALL_DEATH_Z - 1);
        let kills = events
            .iter()
            .filter(|e| **e == StoryEvent::PlayerKilled)
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn bumping_a_wall_is_recorded() {
        let (mut manager, id) = room();
        // two blocks high, too tall to climb
        manager.add_sprite(BlockArray::from_fn(
            IVec3::new(0, 4, 0),
            IVec3::new(1, 1, 2),
            |_| Some(palette::BROWN),
        ));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        manager.get_mut::<Player>(id).unwrap().set_position(IVec3::new(0, 3, 0));
        run(&mut manager, &mut env, &mut events, ActionInput::moving(Direction::North), 1);
        let player = manager.get::<Player>(id).unwrap();
        assert_eq!(player.position(), IVec3::new(0, 3, 0));
        assert_eq!(player.facing, Direction::North);
        assert_eq!(player.bumped(), Some(IVec3::new(0, 4, 0)));
    }
}
