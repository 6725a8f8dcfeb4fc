use crate::SpriteId;
use crate::room::Entry;
use crate::room::RoomId;
use crate::room::Scroll;

/// Notifications raised by sprites and rooms during a tick. The active
/// room consumes the ones it understands, the story handles the rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoryEvent {
    /// A switch, chest or similar toggled. `on` is the new state.
    StateChange { id: SpriteId, on: bool },
    /// An enemy finished dying and has been removed.
    Killed { id: SpriteId },
    RoomChange { destination: RoomId, entry: Entry },
    SaveGame,
    PlayerKilled,
    PlayerWins,
    ItemCollected { item: u8 },
    CameraScroll(Scroll),
}

/// An ordered queue of story events. Consumers take the events they
/// handle and leave the rest, in their original order, for the next
/// consumer.
#[derive(Clone, Debug, Default)]
pub struct StoryEvents {
    events: Vec<StoryEvent>,
}

impl StoryEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: StoryEvent) {
        self.events.push(event);
    }

    /// Offer every queued event to `handler` in order. Events it returns
    /// true for are consumed, the others stay queued.
    pub fn process(&mut self, mut handler: impl FnMut(&StoryEvent) -> bool) {
        let pending = std::mem::take(&mut self.events);
        let mut unhandled = Vec::with_capacity(pending.len());
        for event in pending {
            if !handler(&event) {
                unhandled.push(event);
            }
        }
        // anything pushed while the queue was taken lands after the survivors
        unhandled.append(&mut self.events);
        self.events = unhandled;
    }

    pub fn contains(&self, event: &StoryEvent) -> bool {
        self.events.contains(event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoryEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<StoryEvent> {
        std::mem::take(&mut self.events)
    }
}
