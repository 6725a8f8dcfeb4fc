use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::toolkit;
use mq_engine::sprite::Bullet;
use mq_engine::sprite::Chest;
use mq_engine::sprite::Door;
use mq_engine::sprite::Dragon;
use mq_engine::sprite::palette;
use rand::Rng;
use tracing::debug;

use crate::Rune;

const EXITS: [Exit; 2] = [
    Exit::new(Direction::West, 3, "A02", 1).with_floor(-1, palette::DARK_GREY),
    Exit::new(Direction::East, 6, "C02", 0).with_floor(-1, palette::DARK_GREY),
];
const WEST_EXIT: usize = 0;
const EAST_EXIT: usize = 1;

const DRAGON_POS: IVec3 = IVec3::new(7, 6, 0);
const DRAGON_HIT_POINTS: u32 = 3;
const DRAGON_BREATH_TICKS: u32 = 40;
/// The lair seals once the player is this far in.
const SEAL_X: i32 = 2;
const REWARD_TICKS: u32 = 15;
const CHEST_POS: IVec3 = IVec3::new(5, 5, 0);

/// A slot in the east wall that fires along the south lane.
const TURRET_POS: IVec3 = IVec3::new(10, 1, 0);
const TURRET_TICKS: u32 = 30;
const TURRET_JITTER: u32 = 10;
const BULLET_SPEED: u32 = 1;
const BULLET_RANGE: u32 = 10;

/// Progress through the lair's script. Only `dragon_dead` and
/// `chest_open` outlive a visit, the mode restarts on every entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LairMode {
    /// The dragon sleeps until the player walks in.
    #[default]
    Waiting,
    /// Both doors shut until the dragon falls.
    Fight,
    /// A pause between the kill and the reward appearing.
    Reward { timer: u32 },
    Cleared,
}

#[derive(Debug, Default)]
pub struct RoomC01 {
    dragon_dead: bool,
    chest_open: bool,

    mode: LairMode,
    dragon: Option<SpriteId>,
    chest: Option<SpriteId>,
    doors: Vec<SpriteId>,
    turret_timer: u32,
}

impl RoomC01 {
    pub fn dragon_dead(&self) -> bool {
        self.dragon_dead
    }

    pub fn chest_open(&self) -> bool {
        self.chest_open
    }

    pub fn mode(&self) -> LairMode {
        self.mode
    }

    fn set_door(&self, sprites: &mut SpriteManager, index: usize, closed: bool) {
        if let Some(door) = self.doors.get(index).and_then(|&id| sprites.get_mut::<Door>(id)) {
            door.set_closed(closed);
        }
    }

    fn add_chest(&mut self, sprites: &mut SpriteManager) {
        self.chest = Some(sprites.add_sprite(Chest::new(CHEST_POS, self.chest_open)));
    }

    fn fire_turret(&mut self, ctx: &mut RoomContext) {
        if self.turret_timer > 0 {
            self.turret_timer -= 1;
            return;
        }
        self.turret_timer = TURRET_TICKS + ctx.env.rng().random_range(0..TURRET_JITTER);
        ctx.sprites.add_sprite(Bullet::new(
            TURRET_POS + Direction::West.delta(),
            Direction::West,
            BULLET_SPEED,
            BULLET_RANGE,
        ));
        ctx.env.play(Sound::Shot);
    }

    fn next_mode(&mut self, ctx: &mut RoomContext) -> LairMode {
        match self.mode {
            LairMode::Waiting => {
                let inside = ctx
                    .sprites
                    .player()
                    .is_some_and(|player| player.position().x >= SEAL_X);
                if !inside {
                    return LairMode::Waiting;
                }
                debug!("C01 lair sealed");
                self.set_door(ctx.sprites, WEST_EXIT, true);
                ctx.env.play(Sound::Door);
                LairMode::Fight
            }
            LairMode::Fight => LairMode::Fight,
            LairMode::Reward { timer: 0 } => {
                debug!("C01 reward revealed");
                self.add_chest(ctx.sprites);
                self.set_door(ctx.sprites, WEST_EXIT, false);
                self.set_door(ctx.sprites, EAST_EXIT, false);
                ctx.env.play(Sound::Door);
                ctx.events.push(StoryEvent::SaveGame);
                LairMode::Cleared
            }
            LairMode::Reward { timer } => LairMode::Reward { timer: timer - 1 },
            LairMode::Cleared => LairMode::Cleared,
        }
    }
}

impl Room for RoomC01 {
    fn id(&self) -> RoomId {
        "C01"
    }

    fn exits(&self) -> &[Exit] {
        &EXITS
    }

    fn create_sprites(&mut self, sprites: &mut SpriteManager, _rooms: &RoomLookup) {
        let zones = self.zones();
        toolkit::add_floor(sprites, zones, palette::DARK_GREY);
        toolkit::add_basic_walls(sprites, &EXITS, zones, -1, 1, palette::RED);

        let cleared = self.dragon_dead;
        self.doors = toolkit::add_exit_doors(sprites, &EXITS, zones, palette::BROWN, |index| {
            !cleared && index == EAST_EXIT
        });
        if cleared {
            self.mode = LairMode::Cleared;
            self.add_chest(sprites);
        } else {
            self.mode = LairMode::Waiting;
            self.turret_timer = TURRET_TICKS;
            let dragon = Dragon::new(
                DRAGON_POS,
                Direction::West,
                DRAGON_HIT_POINTS,
                DRAGON_BREATH_TICKS,
            );
            self.dragon = Some(sprites.add_sprite(dragon));
        }
    }

    fn discard_resources(&mut self) {
        self.dragon = None;
        self.chest = None;
        self.doors.clear();
    }

    fn advance(&mut self, ctx: &mut RoomContext) {
        if toolkit::leave_by_exit(ctx, &EXITS, self.zones()) {
            return;
        }

        let (dragon, chest) = (self.dragon, self.chest);
        let mut slain = false;
        let mut opened = false;
        ctx.events.process(|event| match event {
            StoryEvent::Killed { id } if Some(*id) == dragon => {
                slain = true;
                true
            }
            StoryEvent::StateChange { id, on: true } if Some(*id) == chest => {
                opened = true;
                true
            }
            _ => false,
        });
        if slain {
            debug!("C01 dragon slain");
            self.dragon_dead = true;
            self.dragon = None;
            self.mode = LairMode::Reward {
                timer: REWARD_TICKS,
            };
        }
        if opened && !self.chest_open {
            self.chest_open = true;
            ctx.events.push(StoryEvent::ItemCollected {
                item: Rune::Fire.item(),
            });
            ctx.events.push(StoryEvent::SaveGame);
        }

        self.mode = self.next_mode(ctx);
        if matches!(self.mode, LairMode::Waiting | LairMode::Fight) {
            self.fire_turret(ctx);
        }
    }

    fn save(&self, buffer: &mut BitBuffer) {
        buffer.write_bool(self.dragon_dead);
        buffer.write_bool(self.chest_open);
    }

    fn restore(&mut self, _version: u32, buffer: &mut BitBuffer) -> bool {
        let (Some(dragon_dead), Some(chest_open)) = (buffer.read_bool(), buffer.read_bool()) else {
            return false;
        };
        // the chest only appears once the dragon is dead
        if chest_open && !dragon_dead {
            return false;
        }
        self.dragon_dead = dragon_dead;
        self.chest_open = chest_open;
        true
    }
}
