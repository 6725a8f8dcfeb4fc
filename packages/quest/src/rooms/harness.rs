//! Drives a single room without the rest of the story, for room tests.

use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::Camera;
use mq_engine::sprite::Player;

pub(crate) struct RoomHarness<R: Room> {
    pub room: R,
    pub sprites: SpriteManager,
    pub env: Env,
    pub camera: Camera,
    pub items: ItemSet,
    /// Events the room left for the story, oldest first.
    pub seen: Vec<StoryEvent>,
}

impl<R: Room + Default> RoomHarness<R> {
    pub fn new() -> Self {
        Self::with_room(R::default())
    }
}

impl<R: Room> RoomHarness<R> {
    pub fn with_room(room: R) -> Self {
        Self {
            room,
            sprites: SpriteManager::new(),
            env: Env::new(7),
            camera: Camera::default(),
            items: ItemSet::default(),
            seen: Vec::new(),
        }
    }

    pub fn enter(&mut self, entry: Entry) {
        self.room.discard_resources();
        self.sprites.clear();
        let player = self.room.create_player(entry);
        let lookup = RoomLookup::new(&[], &[], self.items);
        self.room.create_sprites(&mut self.sprites, &lookup);
        self.camera
            .reset(player.position(), self.room.zones(), self.room.camera_levels());
        self.sprites.add_sprite(player);
    }

    pub fn tick(&mut self, input: ActionInput) -> Vec<StoryEvent> {
        let mut events = StoryEvents::new();
        self.env.begin_tick(input);
        self.sprites.advance(&mut self.env, &mut events);
        let mut ctx = RoomContext {
            events: &mut events,
            sprites: &mut self.sprites,
            env: &mut self.env,
            rooms: RoomLookup::new(&[], &[], self.items),
            camera: &mut self.camera,
        };
        self.room.advance(&mut ctx);
        let left = events.drain();
        self.seen.extend(left.iter().cloned());
        left
    }

    pub fn run(&mut self, input: ActionInput, ticks: usize) {
        for _ in 0..ticks {
            self.tick(input);
        }
    }

    pub fn walk(&mut self, direction: Direction, ticks: usize) {
        self.run(ActionInput::moving(direction), ticks);
    }

    pub fn idle(&mut self, ticks: usize) {
        self.run(ActionInput::default(), ticks);
    }

    pub fn player(&self) -> &Player {
        self.sprites.player().expect("harness room has a player")
    }

    pub fn place_player(&mut self, position: IVec3, facing: Direction) {
        let player = self.sprites.player_mut().expect("harness room has a player");
        player.set_position(position);
        player.facing = facing;
    }

    pub fn count(&self, event: &StoryEvent) -> usize {
        self.seen.iter().filter(|seen| *seen == event).count()
    }

    /// Round trip the room's durable state into a fresh instance.
    pub fn reloaded(&self) -> R
    where
        R: Default,
    {
        let mut buffer = BitBuffer::new();
        self.room.save(&mut buffer);
        let mut fresh = R::default();
        assert!(fresh.restore(crate::SAVE_VERSION, &mut buffer));
        fresh
    }
}
