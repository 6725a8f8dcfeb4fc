use bevy_math::IVec3;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::prelude::*;
use crate::sprite::Player;

/// Sprite changes requested during a step. They are applied after every
/// sprite has advanced so the step reads a consistent world.
#[derive(Debug, Clone)]
enum SpriteCommand {
    Spawn(SpriteEntity),
    Remove(SpriteId),
}

/// Writable access handed to each sprite while it advances.
pub struct TickContext<'a> {
    pub env: &'a mut Env,
    pub events: &'a mut StoryEvents,
    commands: Vec<SpriteCommand>,
}

impl<'a> TickContext<'a> {
    pub fn new(env: &'a mut Env, events: &'a mut StoryEvents) -> Self {
        Self {
            env,
            events,
            commands: Vec::new(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.env.tick()
    }

    pub fn play(&mut self, sound: Sound) {
        self.env.play(sound);
    }

    pub fn push_event(&mut self, event: StoryEvent) {
        self.events.push(event);
    }

    /// Add a sprite once the current step finishes.
    pub fn spawn(&mut self, sprite: impl Into<SpriteEntity>) {
        self.commands.push(SpriteCommand::Spawn(sprite.into()));
    }

    /// Remove a sprite once the current step finishes.
    pub fn remove(&mut self, id: SpriteId) {
        self.commands.push(SpriteCommand::Remove(id));
    }
}

/// Owns the live sprites of the active room, in insertion order.
///
/// Each sprite lives behind a `RefPointer` so sprites that do not change
/// during a tick are carried into the next tick without a copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteManager {
    id_counter: SpriteId,
    sprites: Vec<RefPointer<SpriteEntity>>,
}

impl SpriteManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_id(&mut self) -> SpriteId {
        self.id_counter += 1;
        self.id_counter
    }

    /// Take ownership of `sprite` and give it a fresh id.
    pub fn add_sprite(&mut self, sprite: impl Into<SpriteEntity>) -> SpriteId {
        let mut sprite = sprite.into();
        let id = self.generate_id();
        sprite.state_mut().id = id;
        self.sprites.push(RefPointer::new(sprite));
        id
    }

    pub fn remove_sprite(&mut self, id: SpriteId) -> bool {
        match self.sprites.iter().position(|sprite| sprite.id() == id) {
            Some(index) => {
                self.sprites.remove(index);
                true
            }
            None => {
                warn!("attempting to remove sprite that does not exist: {id}");
                false
            }
        }
    }

    pub fn remove_sprites(&mut self, ids: &[SpriteId]) {
        self.sprites.retain(|sprite| !ids.contains(&sprite.id()));
    }

    /// Drop every sprite. Ids keep counting up so stale handles held by a
    /// room never match a new sprite.
    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn list(&self) -> impl Iterator<Item = &SpriteEntity> {
        self.sprites.iter().map(|sprite| sprite.as_ref())
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.entity(id).is_some()
    }

    pub fn entity(&self, id: SpriteId) -> Option<&SpriteEntity> {
        self.list().find(|sprite| sprite.id() == id)
    }

    pub fn get<T: Sprite>(&self, id: SpriteId) -> Option<&T> {
        self.entity(id)?.get_ref::<T>()
    }

    /// Mutable access for room scripts. Copies the sprite first if the
    /// previous tick still shares it.
    pub fn get_mut<T: Sprite>(&mut self, id: SpriteId) -> Option<&mut T> {
        let sprite = self.sprites.iter_mut().find(|sprite| sprite.id() == id)?;
        RefPointer::make_mut(sprite).get_mut::<T>()
    }

    pub fn find_sprite_of_type<T: Sprite>(&self) -> Option<&T> {
        self.list().find_map(|sprite| sprite.get_ref::<T>())
    }

    pub fn sprites_of_type<T: Sprite>(&self) -> impl Iterator<Item = &T> {
        self.list().filter_map(|sprite| sprite.get_ref::<T>())
    }

    pub fn player(&self) -> Option<&Player> {
        self.find_sprite_of_type::<Player>()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        let id = self.player()?.id();
        self.get_mut::<Player>(id)
    }

    /// Whether any sprite other than `ignore` makes `cell` solid.
    pub fn blocked(&self, cell: IVec3, ignore: Option<SpriteId>) -> bool {
        self.list()
            .any(|sprite| Some(sprite.id()) != ignore && sprite.hits(cell))
    }

    pub fn platform_at(&self, cell: IVec3) -> bool {
        self.list().any(|sprite| sprite.is_platform(cell))
    }

    pub fn lethal_at(&self, cell: IVec3) -> bool {
        self.list().any(|sprite| sprite.is_lethal(cell))
    }

    /// Advance every sprite one tick against the current state, then
    /// apply the spawns and removals they asked for.
    pub fn advance(&mut self, env: &mut Env, events: &mut StoryEvents) {
        let mut ctx = TickContext::new(env, events);
        let mut next_sprites = Vec::with_capacity(self.sprites.len());
        for sprite in &self.sprites {
            if sprite.prestep(self) {
                let mut next = sprite.as_ref().clone();
                sprite.advance(self, &mut next, &mut ctx);
                next_sprites.push(RefPointer::new(next));
            } else {
                next_sprites.push(sprite.clone());
            }
        }
        self.sprites = next_sprites;

        for command in std::mem::take(&mut ctx.commands) {
            match command {
                SpriteCommand::Spawn(sprite) => {
                    self.add_sprite(sprite);
                }
                SpriteCommand::Remove(id) => {
                    self.remove_sprite(id);
                }
            }
        }
    }

    pub fn draw(&self) -> DrawList {
        let mut list = DrawList::new();
        for sprite in self.list() {
            sprite.draw(&mut list);
        }
        list
    }

    /// A digest of every sprite, used to compare replays.
    pub fn state_hash(&self) -> anyhow::Result<blake3::Hash> {
        let bytes = bincode::serialize(self)?;
        Ok(blake3::hash(&bytes))
    }
}
