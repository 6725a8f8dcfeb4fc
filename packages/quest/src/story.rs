use anyhow::anyhow;
use mq_engine::prelude::*;
use mq_engine::room::Camera;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::GameConfig;
use crate::RoomRegistry;
use crate::Rune;
use crate::SAVE_VERSION;
use crate::SaveState;

/// The quest's top level state: which room is active, its live sprites
/// and the progress that outlives any one room.
pub struct QuestStory {
    rooms: RoomRegistry,
    current: usize,
    /// How the player entered the current room. Respawns reuse it.
    entry: Entry,
    sprites: SpriteManager,
    events: StoryEvents,
    camera: Camera,
    items: ItemSet,
    deaths: u16,
    respawn_timer: Option<u32>,
    finished: bool,
    pending_save: Option<SaveState>,
    handled: Vec<StoryEvent>,

    start_room: usize,
    respawn_delay: u32,
    autosave: bool,
}

impl QuestStory {
    pub fn new(config: &GameConfig) -> anyhow::Result<Self> {
        let rooms = RoomRegistry::new();
        let start_room = rooms
            .index_of(&config.start_room)
            .ok_or_else(|| anyhow!("unknown start room {}", config.start_room))?;
        Ok(Self {
            rooms,
            current: start_room,
            entry: Entry::GameStart,
            sprites: SpriteManager::new(),
            events: StoryEvents::new(),
            camera: Camera::default(),
            items: ItemSet::default(),
            deaths: 0,
            respawn_timer: None,
            finished: false,
            pending_save: None,
            handled: Vec::new(),
            start_room,
            respawn_delay: config.respawn_delay_ticks,
            autosave: config.autosave,
        })
    }

    /// Begin a new game in the start room with fresh rooms.
    pub fn start(&mut self) {
        self.rooms.reset_all();
        self.items = ItemSet::default();
        self.deaths = 0;
        self.finished = false;
        self.pending_save = None;
        self.enter_room(self.start_room, Entry::GameStart);
    }

    /// Make `index` the active room and build its sprites.
    pub fn enter_room(&mut self, index: usize, entry: Entry) {
        self.rooms.get_mut(self.current).discard_resources();
        self.sprites.clear();
        self.events = StoryEvents::new();
        self.respawn_timer = None;
        self.current = index;
        self.entry = entry;

        let (room, lookup) = self.rooms.split(index, self.items);
        debug!("entering {} via {:?}", room.id(), entry);
        let player = room.create_player(entry);
        let position = player.position();
        room.create_sprites(&mut self.sprites, &lookup);
        self.sprites.add_sprite(player);
        self.camera.reset(position, room.zones(), room.camera_levels());

        if self.autosave && entry != Entry::GameStart {
            self.pending_save = Some(self.save_state());
        }
    }

    /// One tick: sprites, then the active room, then whatever events the
    /// room left for the story.
    pub fn advance(&mut self, env: &mut Env) {
        self.handled.clear();
        if self.finished {
            return;
        }
        self.sprites.advance(env, &mut self.events);
        {
            let (room, rooms) = self.rooms.split(self.current, self.items);
            let mut ctx = RoomContext {
                events: &mut self.events,
                sprites: &mut self.sprites,
                env,
                rooms,
                camera: &mut self.camera,
            };
            room.advance(&mut ctx);
        }
        self.handle_events();
        self.advance_respawn();
    }

    fn handle_events(&mut self) {
        let events = self.events.drain();
        for (index, event) in events.iter().enumerate() {
            self.handled.push(event.clone());
            match event {
                StoryEvent::RoomChange { destination, entry } => {
                    let Some(target) = self.rooms.index_of(destination) else {
                        panic!("room change to unknown room {destination}");
                    };
                    let dropped = events.len() - index - 1;
                    if dropped > 0 {
                        debug!("dropping {dropped} events left by the previous room");
                    }
                    self.enter_room(target, *entry);
                    return;
                }
                StoryEvent::PlayerKilled => {
                    self.deaths = self.deaths.saturating_add(1);
                    self.respawn_timer = Some(self.respawn_delay);
                    debug!("player killed, {} deaths", self.deaths);
                }
                StoryEvent::SaveGame => {
                    debug!("saving in {}", self.current_room().id());
                    self.pending_save = Some(self.save_state());
                }
                StoryEvent::ItemCollected { item } => {
                    match Rune::from_item(*item) {
                        Some(rune) => {
                            let name: &'static str = rune.into();
                            info!("collected the {name} rune");
                        }
                        None => debug!("collected item {item}"),
                    }
                    self.items.insert(*item);
                }
                StoryEvent::PlayerWins => {
                    info!("quest complete after {} deaths", self.deaths);
                    self.finished = true;
                }
                StoryEvent::CameraScroll(scroll) => debug!("camera {scroll:?}"),
                StoryEvent::StateChange { .. } | StoryEvent::Killed { .. } => {}
            }
        }
    }

    fn advance_respawn(&mut self) {
        let Some(timer) = self.respawn_timer else {
            return;
        };
        if timer > 0 {
            self.respawn_timer = Some(timer - 1);
            return;
        }
        debug!("respawning in {}", self.current_room().id());
        self.enter_room(self.current, self.entry);
    }

    pub fn save_state(&self) -> SaveState {
        let records = self
            .rooms
            .iter()
            .map(|room| {
                let mut record = BitBuffer::new();
                room.save(&mut record);
                record
            })
            .collect();
        SaveState {
            version: SAVE_VERSION,
            room_index: self.current,
            entry: self.entry,
            items: self.items,
            deaths: self.deaths,
            records,
        }
    }

    /// Resume from a save. The header is checked before anything changes,
    /// so false means the game carries on untouched. A room whose record
    /// it cannot read starts fresh.
    pub fn restore(&mut self, state: &SaveState) -> bool {
        if state.records.len() != self.rooms.len() {
            warn!(
                "save holds {} rooms, expected {}",
                state.records.len(),
                self.rooms.len()
            );
            return false;
        }
        if state.room_index >= self.rooms.len() {
            warn!("save names room index {}", state.room_index);
            return false;
        }
        if let Entry::Door(index) = state.entry
            && index >= self.rooms.get(state.room_index).exits().len()
        {
            warn!("save names entry {index} of room index {}", state.room_index);
            return false;
        }

        for (index, record) in state.records.iter().enumerate() {
            self.rooms.reset(index);
            let mut record = record.clone();
            record.rewind();
            if !self.rooms.get_mut(index).restore(state.version, &mut record) {
                warn!("room {} record unreadable, starting it fresh", self.rooms.get(index).id());
                self.rooms.reset(index);
            }
        }
        self.items = state.items;
        self.deaths = state.deaths;
        self.finished = false;
        self.pending_save = None;
        self.enter_room(state.room_index, state.entry);
        true
    }

    /// The save requested since the last call, if any.
    pub fn take_save(&mut self) -> Option<SaveState> {
        self.pending_save.take()
    }

    /// Story level events handled during the last tick.
    pub fn last_events(&self) -> &[StoryEvent] {
        &self.handled
    }

    pub fn current_room(&self) -> &dyn Room {
        self.rooms.get(self.current)
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut RoomRegistry {
        &mut self.rooms
    }

    pub fn sprites(&self) -> &SpriteManager {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteManager {
        &mut self.sprites
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn items(&self) -> ItemSet {
        self.items
    }

    pub fn deaths(&self) -> u16 {
        self.deaths
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_timer.is_some()
    }
}
