pub use crate::RefPointer;
pub use crate::SpriteId;

pub use crate::ActionInput;
pub use crate::BitBuffer;
pub use crate::Direction;
pub use crate::DrawList;
pub use crate::Env;
pub use crate::ItemSet;
pub use crate::Sound;
pub use crate::StoryEvent;
pub use crate::StoryEvents;
pub use crate::Track;
pub use crate::TrackMode;

pub use crate::SpriteManager;
pub use crate::TickContext;

pub use crate::sprite::BaseSpriteState;
pub use crate::sprite::BlockArray;
pub use crate::sprite::Colour;
pub use crate::sprite::Sprite;
pub use crate::sprite::SpriteBase;
pub use crate::sprite::SpriteEntity;
pub use crate::sprite::SpritePoly;

pub use crate::room::CameraLevel;
pub use crate::room::Entry;
pub use crate::room::Exit;
pub use crate::room::Room;
pub use crate::room::RoomContext;
pub use crate::room::RoomId;
pub use crate::room::RoomLookup;

pub use crate::sprite_enum;
pub use crate::sprite_struct;
