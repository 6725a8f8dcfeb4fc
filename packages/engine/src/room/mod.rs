use std::any::Any;

use bevy_math::IVec2;
use bevy_math::IVec3;

use crate::prelude::*;
use crate::sprite::Player;

mod camera;
pub mod toolkit;

pub use camera::Camera;
pub use camera::CameraLevel;
pub use camera::Scroll;

/// Rooms are named by short static ids such as `"A01"`.
pub type RoomId = &'static str;

/// Where the player appears on entering a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entry {
    /// Through the room's exit with this index.
    Door(usize),
    /// The room's own starting position, used for a new game.
    GameStart,
}

/// A doorway in a room's outer wall leading to another room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exit {
    pub side: Direction,
    /// Offset of the doorway along its wall.
    pub door_pos: i32,
    /// Height of the floor in the doorway. The player walks at
    /// `floor_z + 1`.
    pub floor_z: i32,
    pub floor_colour: Colour,
    pub destination: RoomId,
    /// Index of the exit in the destination room the player arrives at.
    pub entry_point: usize,
}

impl Exit {
    pub const fn new(side: Direction, door_pos: i32, destination: RoomId, entry_point: usize) -> Self {
        Self {
            side,
            door_pos,
            floor_z: -1,
            floor_colour: Colour(0),
            destination,
            entry_point,
        }
    }

    pub const fn with_floor(mut self, floor_z: i32, floor_colour: Colour) -> Self {
        self.floor_z = floor_z;
        self.floor_colour = floor_colour;
        self
    }
}

/// Downcasting for room trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Read only access to every room other than the one being driven.
#[derive(Clone, Copy)]
pub struct RoomLookup<'a> {
    before: &'a [Box<dyn Room>],
    after: &'a [Box<dyn Room>],
    items: ItemSet,
}

impl<'a> RoomLookup<'a> {
    pub fn new(before: &'a [Box<dyn Room>], after: &'a [Box<dyn Room>], items: ItemSet) -> Self {
        Self {
            before,
            after,
            items,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[], ItemSet::default())
    }

    /// Items collected so far in the game.
    pub fn items(&self) -> ItemSet {
        self.items
    }

    pub fn find_room(&self, id: RoomId) -> Option<&'a dyn Room> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find(|room| room.id() == id)
            .map(|room| room.as_ref())
    }

    pub fn find<T: Room>(&self, id: RoomId) -> Option<&'a T> {
        self.find_room(id)?.as_any().downcast_ref::<T>()
    }
}

/// Everything a room may touch while it advances.
pub struct RoomContext<'a> {
    pub events: &'a mut StoryEvents,
    pub sprites: &'a mut SpriteManager,
    pub env: &'a mut Env,
    pub rooms: RoomLookup<'a>,
    pub camera: &'a mut Camera,
}

/// One room of the game. The room owns its durable state (what survives
/// leaving and re-entering, and what goes into a save), while the live
/// sprites it creates belong to the `SpriteManager` and only exist while
/// the room is active.
pub trait Room: AsAny {
    fn id(&self) -> RoomId;

    fn exits(&self) -> &[Exit];

    /// Size of the room in zones. Most rooms are a single zone.
    fn zones(&self) -> IVec2 {
        IVec2::ONE
    }

    /// Height bands for vertical camera scrolling. Empty for single
    /// level rooms.
    fn camera_levels(&self) -> &[CameraLevel] {
        &[]
    }

    /// Where a new game places the player.
    fn start_position(&self) -> (IVec3, Direction) {
        (IVec3::new(4, 4, 0), Direction::North)
    }

    /// The player for an entry. The default places it just inside the
    /// entry exit, facing into the room.
    fn create_player(&mut self, entry: Entry) -> Player {
        toolkit::set_player_at_exit(self.exits(), self.zones(), entry, self.start_position())
    }

    /// Populate the sprite manager for a fresh entry, consistent with
    /// the room's durable state.
    fn create_sprites(&mut self, sprites: &mut SpriteManager, rooms: &RoomLookup);

    /// Forget handles to live sprites. Called when the player leaves.
    fn discard_resources(&mut self);

    /// Room logic for one tick, after the sprites have advanced.
    fn advance(&mut self, ctx: &mut RoomContext);

    fn save(&self, buffer: &mut BitBuffer);

    /// Read durable state written by `save`. Returns false, leaving the
    /// room untouched, if the data is incomplete or out of range.
    fn restore(&mut self, version: u32, buffer: &mut BitBuffer) -> bool;
}
