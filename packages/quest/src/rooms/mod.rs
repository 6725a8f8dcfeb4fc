use mq_engine::ItemSet;
use mq_engine::room::Room;
use mq_engine::room::RoomId;
use mq_engine::room::RoomLookup;

mod a01;
mod a02;
mod b01;
mod b02;
mod c01;
mod c02;

#[cfg(test)]
pub(crate) mod harness;

pub use a01::RoomA01;
pub use a02::RoomA02;
pub use b01::BRIDGE_LEN;
pub use b01::RoomB01;
pub use b02::RoomB02;
pub use b02::bridge_extent;
pub use c01::LairMode;
pub use c01::RoomC01;
pub use c02::RoomC02;

pub type RoomFactory = fn() -> Box<dyn Room>;

fn boxed<R: Room + Default>() -> Box<dyn Room> {
    Box::new(R::default())
}

/// Every room of the quest in save order. Appending is safe, reordering
/// breaks existing saves.
pub const ROOM_FACTORIES: [(RoomId, RoomFactory); 6] = [
    ("A01", boxed::<RoomA01>),
    ("A02", boxed::<RoomA02>),
    ("B01", boxed::<RoomB01>),
    ("B02", boxed::<RoomB02>),
    ("C01", boxed::<RoomC01>),
    ("C02", boxed::<RoomC02>),
];

/// Owns one instance of every room for the whole game, so durable room
/// state survives the player leaving.
pub struct RoomRegistry {
    rooms: Vec<Box<dyn Room>>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        let rooms = ROOM_FACTORIES
            .iter()
            .map(|(id, factory)| {
                let room = factory();
                assert_eq!(room.id(), *id, "room factory registered under the wrong id");
                room
            })
            .collect();
        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room.id() == id)
    }

    pub fn get(&self, index: usize) -> &dyn Room {
        self.rooms[index].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Box<dyn Room> {
        &mut self.rooms[index]
    }

    /// Replace a room with a fresh instance, forgetting its durable state.
    pub fn reset(&mut self, index: usize) {
        let (_, factory) = ROOM_FACTORIES[index];
        self.rooms[index] = factory();
    }

    pub fn reset_all(&mut self) {
        for index in 0..self.rooms.len() {
            self.reset(index);
        }
    }

    pub fn find<T: Room>(&self, id: RoomId) -> Option<&T> {
        let room = self.rooms.iter().find(|room| room.id() == id)?;
        (**room).as_any().downcast_ref::<T>()
    }

    pub fn find_mut<T: Room>(&mut self, id: RoomId) -> Option<&mut T> {
        let room = self.rooms.iter_mut().find(|room| room.id() == id)?;
        (**room).as_any_mut().downcast_mut::<T>()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Room> {
        self.rooms.iter().map(|room| room.as_ref())
    }

    /// The room at `index` for writing, and every other room for reading.
    pub fn split(&mut self, index: usize, items: ItemSet) -> (&mut Box<dyn Room>, RoomLookup<'_>) {
        let (before, rest) = self.rooms.split_at_mut(index);
        let Some((current, after)) = rest.split_first_mut() else {
            panic!("room index {index} out of range");
        };
        (current, RoomLookup::new(before, after, items))
    }
}
