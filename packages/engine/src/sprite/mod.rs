use std::any::Any;
use std::fmt::Debug;

use bevy_math::IVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::prelude::*;

mod block_array;
mod block_pattern;
mod chest;
mod critter;
mod dragon;
mod liquid;
mod player;
mod projectile;
mod scenery;
mod spikes;
mod spook;
mod switch;
mod triffid;

pub use block_array::BlockArray;
pub use block_array::BlockArrayData;
pub use block_pattern::BlockPattern;
pub use block_pattern::FIXED_ONE;
pub use chest::Chest;
pub use critter::Critter;
pub use dragon::Dragon;
pub use liquid::Liquid;
pub use player::Player;
pub use projectile::Bullet;
pub use projectile::Flame;
pub use scenery::Door;
pub use scenery::Fence;
pub use scenery::Splatter;
pub use scenery::Statue;
pub use spikes::SpikeState;
pub use spikes::Spikes;
pub use spook::Spook;
pub use switch::FloorSwitch;
pub use switch::WallSwitch;
pub use triffid::Triffid;
pub use triffid::TriffidState;

/// A palette entry. Values follow the 6 bit EGA layout, renderers map them
/// to actual colours.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Colour(pub u8);

pub mod palette {
    use super::Colour;

    pub const BLACK: Colour = Colour(0);
    pub const BLUE: Colour = Colour(1);
    pub const GREEN: Colour = Colour(2);
    pub const CYAN: Colour = Colour(3);
    pub const RED: Colour = Colour(4);
    pub const MAGENTA: Colour = Colour(5);
    pub const BROWN: Colour = Colour(20);
    pub const LIGHT_GREY: Colour = Colour(7);
    pub const DARK_GREY: Colour = Colour(56);
    pub const LIGHT_BLUE: Colour = Colour(57);
    pub const LIGHT_GREEN: Colour = Colour(58);
    pub const LIGHT_CYAN: Colour = Colour(59);
    pub const LIGHT_RED: Colour = Colour(60);
    pub const PINK: Colour = Colour(61);
    pub const YELLOW: Colour = Colour(62);
    pub const WHITE: Colour = Colour(63);
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaseSpriteState {
    #[serde(default)]
    pub id: SpriteId,
    #[serde(default)]
    pub position: IVec3,
}

impl BaseSpriteState {
    pub fn at(position: IVec3) -> Self {
        Self { id: 0, position }
    }
}

/// A helper trait for polymorphism over the sprite enum.
pub trait SpritePoly {
    fn as_any(&self) -> &dyn Any;

    fn get_ref<T: 'static>(&self) -> Option<&T>;

    fn get_mut<T: 'static>(&mut self) -> Option<&mut T>;
}

/// Properties every sprite has.
pub trait SpriteBase: Debug + Any + Clone {
    fn state(&self) -> &BaseSpriteState;
    fn state_mut(&mut self) -> &mut BaseSpriteState;

    fn id(&self) -> SpriteId {
        self.state().id
    }

    fn position(&self) -> IVec3 {
        self.state().position
    }

    fn set_position(&mut self, position: IVec3) {
        self.state_mut().position = position;
    }

    /// deterministic rng for sprites, safe for replay
    fn rng(&self, tick: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64((self.id() as u64) ^ tick.rotate_left(32))
    }
}

/// A sprite that takes part in the simulation. Every query is answered
/// against the previous tick's world.
pub trait Sprite: SpriteBase {
    /// Whether this sprite makes `cell` solid.
    fn hits(&self, _cell: IVec3) -> bool {
        false
    }

    /// Whether something standing in `cell` is held up by this sprite.
    fn is_platform(&self, _cell: IVec3) -> bool {
        false
    }

    /// Whether the player dies on entering or staying in `cell`.
    fn is_lethal(&self, _cell: IVec3) -> bool {
        false
    }

    /// Enemies stop being lethal while the player is mid swing.
    fn is_enemy(&self) -> bool {
        false
    }

    /// False when `advance` would leave the sprite unchanged this tick.
    /// The sprite is then carried over without a copy.
    fn prestep(&self, _world: &SpriteManager) -> bool {
        true
    }

    /// Write the sprite's state for the next tick into `next`, which
    /// starts as a copy of `self`.
    fn advance(&self, _world: &SpriteManager, _next: &mut Self, _ctx: &mut TickContext) {}

    fn draw(&self, _list: &mut DrawList) {}
}

/// Properties that all sprites have. Generates the struct with a leading
/// `state` field plus its `SpriteBase` impl.
#[macro_export]
macro_rules! sprite_struct {
    (
        $(#[$struct_attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident: $field_type:ty
            ),*
            $(,)?
        }
    ) => {
        $(#[$struct_attr])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            #[serde(default)]
            pub state: $crate::sprite::BaseSpriteState,
            $(
                $(#[$field_attr])*
                $field_vis $field_name: $field_type,
            )*
        }

        impl $crate::sprite::SpriteBase for $name {
            fn state(&self) -> &$crate::sprite::BaseSpriteState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut $crate::sprite::BaseSpriteState {
                &mut self.state
            }
        }
    };
}

/// Build the enum wrapping every sprite kind, with downcasts and
/// dispatch of the sprite traits.
#[macro_export]
macro_rules! sprite_enum {
    (
        $(#[$enum_attr:meta])*
        $vis:vis enum $name:ident {
            $(
                $variant_name:ident($variant_type:ty)
            ),* $(,)?
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $variant_name($variant_type),
            )*
        }

        impl $name {
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(
                        $name::$variant_name(_) => stringify!($variant_name),
                    )*
                }
            }
        }

        impl $crate::sprite::SpritePoly for $name {
            fn as_any(&self) -> &dyn std::any::Any {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite,
                    )*
                }
            }

            fn get_ref<T: 'static>(&self) -> Option<&T> {
                self.as_any().downcast_ref::<T>()
            }

            fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
                match self {
                    $(
                        $name::$variant_name(sprite) => {
                            let sprite: &mut dyn std::any::Any = sprite;
                            sprite.downcast_mut::<T>()
                        },
                    )*
                }
            }
        }

        $(
            impl From<$variant_type> for $name {
                fn from(value: $variant_type) -> Self {
                    $name::$variant_name(value)
                }
            }
        )*

        impl $crate::sprite::SpriteBase for $name {
            fn state(&self) -> &$crate::sprite::BaseSpriteState {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.state(),
                    )*
                }
            }

            fn state_mut(&mut self) -> &mut $crate::sprite::BaseSpriteState {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.state_mut(),
                    )*
                }
            }
        }

        impl $crate::sprite::Sprite for $name {
            fn hits(&self, cell: bevy_math::IVec3) -> bool {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.hits(cell),
                    )*
                }
            }

            fn is_platform(&self, cell: bevy_math::IVec3) -> bool {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.is_platform(cell),
                    )*
                }
            }

            fn is_lethal(&self, cell: bevy_math::IVec3) -> bool {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.is_lethal(cell),
                    )*
                }
            }

            fn is_enemy(&self) -> bool {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.is_enemy(),
                    )*
                }
            }

            fn prestep(&self, world: &$crate::SpriteManager) -> bool {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.prestep(world),
                    )*
                }
            }

            fn advance(
                &self,
                world: &$crate::SpriteManager,
                next: &mut Self,
                ctx: &mut $crate::TickContext,
            ) {
                match (self, next) {
                    $(
                        ($name::$variant_name(sprite), $name::$variant_name(next)) => {
                            sprite.advance(world, next, ctx)
                        }
                    )*
                    #[allow(unreachable_patterns)]
                    _ => unreachable!("sprite changed kind during a step"),
                }
            }

            fn draw(&self, list: &mut $crate::DrawList) {
                match self {
                    $(
                        $name::$variant_name(sprite) => sprite.draw(list),
                    )*
                }
            }
        }
    };
}

sprite_enum!(
    pub enum SpriteEntity {
        BlockArray(BlockArray),
        BlockPattern(BlockPattern),
        Player(Player),
        Critter(Critter),
        Spook(Spook),
        Triffid(Triffid),
        Dragon(Dragon),
        Flame(Flame),
        Bullet(Bullet),
        FloorSwitch(FloorSwitch),
        WallSwitch(WallSwitch),
        Chest(Chest),
        Spikes(Spikes),
        Liquid(Liquid),
        Fence(Fence),
        Statue(Statue),
        Door(Door),
        Splatter(Splatter),
    }
);

/// Whether the living player swings at `cell` this tick.
pub(crate) fn struck_by_player(world: &SpriteManager, cell: IVec3) -> bool {
    world
        .player()
        .is_some_and(|player| !player.is_dead() && player.strikes(cell))
}

/// Count down an enemy hit by the player. When the countdown ends the
/// enemy is removed, leaves a splatter and reports itself killed.
/// Returns false if the enemy is not dying.
pub(crate) fn advance_dying(
    id: SpriteId,
    position: IVec3,
    dying: u32,
    next_dying: &mut u32,
    ctx: &mut TickContext,
) -> bool {
    if dying == 0 {
        return false;
    }
    *next_dying = dying - 1;
    if *next_dying == 0 {
        ctx.remove(id);
        ctx.spawn(Splatter::new(position));
        ctx.push_event(StoryEvent::Killed { id });
    }
    true
}
