use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::toolkit;
use mq_engine::sprite::Chest;
use mq_engine::sprite::BlockPattern;
use mq_engine::sprite::Critter;
use mq_engine::sprite::FIXED_ONE;
use mq_engine::sprite::FloorSwitch;
use mq_engine::sprite::Spikes;
use mq_engine::sprite::palette;
use tracing::debug;

use crate::Rune;

const EXITS: [Exit; 2] = [
    Exit::new(Direction::West, 5, "A01", 0).with_floor(-1, palette::GREEN),
    Exit::new(Direction::East, 3, "C01", 0).with_floor(-1, palette::DARK_GREY),
];

const PLATE_POS: IVec3 = IVec3::new(5, 8, 0);
const CHEST_POS: IVec3 = IVec3::new(8, 8, 0);
const TRAP_X: i32 = 7;
const TRAP_ROWS: [i32; 3] = [7, 8, 9];
const LONE_SPIKE_POS: IVec3 = IVec3::new(4, 1, 0);
const HEDGE_START: IVec3 = IVec3::new(0, 9, 0);
/// Fixed point cells per tick the hedge grows or shrinks by.
const HEDGE_RATE: i32 = FIXED_ONE / 8;

/// The garden. Critters patrol the lawn, and the chest in the corner is
/// guarded by a row of spikes sprung from a plate.
#[derive(Debug, Default)]
pub struct RoomA02 {
    chest_open: bool,

    plate: Option<SpriteId>,
    chest: Option<SpriteId>,
    trap: Vec<SpriteId>,
    critters: Vec<SpriteId>,
    hedge: Option<SpriteId>,
}

impl RoomA02 {
    pub fn chest_open(&self) -> bool {
        self.chest_open
    }

    fn spring_trap(&self, ctx: &mut RoomContext) {
        for &id in &self.trap {
            if let Some(spikes) = ctx.sprites.get_mut::<Spikes>(id) {
                spikes.trigger();
            }
        }
    }

    /// The hedge in the north west corner grows to full length, then is
    /// cut back to nothing, forever.
    fn tend_hedge(&self, sprites: &mut SpriteManager) {
        let Some(hedge) = self.hedge.and_then(|id| sprites.get_mut::<BlockPattern>(id)) else {
            return;
        };
        if hedge.is_moving() {
            return;
        }
        let (_, end) = hedge.window();
        let rate = if end == 0 { HEDGE_RATE } else { -HEDGE_RATE };
        hedge.set_rates(0, rate);
    }

    fn take_rune(&mut self, ctx: &mut RoomContext) {
        debug!("A02 chest opened");
        self.chest_open = true;
        ctx.events.push(StoryEvent::ItemCollected {
            item: Rune::Earth.item(),
        });
        ctx.events.push(StoryEvent::SaveGame);
    }
}

impl Room for RoomA02 {
    fn id(&self) -> RoomId {
        "A02"
    }

    fn exits(&self) -> &[Exit] {
        &EXITS
    }

    fn create_sprites(&mut self, sprites: &mut SpriteManager, _rooms: &RoomLookup) {
        let zones = self.zones();
        toolkit::add_floor(sprites, zones, palette::LIGHT_GREEN);
        toolkit::add_basic_walls(sprites, &EXITS, zones, -1, 1, palette::GREEN);

        self.plate = Some(sprites.add_sprite(FloorSwitch::new(PLATE_POS, false)));
        // only the first spike of the row makes a sound
        self.trap = TRAP_ROWS
            .iter()
            .enumerate()
            .map(|(index, &y)| {
                sprites.add_sprite(Spikes::new(IVec3::new(TRAP_X, y, 0), false, index > 0))
            })
            .collect();
        sprites.add_sprite(Spikes::new(LONE_SPIKE_POS, true, false));
        self.chest = Some(sprites.add_sprite(Chest::new(CHEST_POS, self.chest_open)));

        let lawn = Track::new(
            vec![
                IVec3::new(2, 2, 0),
                IVec3::new(7, 2, 0),
                IVec3::new(7, 6, 0),
                IVec3::new(2, 6, 0),
            ],
            TrackMode::Loop,
        );
        let path = Track::from_moves(IVec3::new(1, 8, 0), "EEEE", TrackMode::Bounce);
        self.critters = vec![
            sprites.add_sprite(Critter::new(lawn, 4)),
            sprites.add_sprite(Critter::new(path, 3)),
        ];
        self.hedge = Some(sprites.add_sprite(BlockPattern::from_path(
            HEDGE_START,
            "EE",
            palette::GREEN,
        )));
    }

    fn discard_resources(&mut self) {
        self.plate = None;
        self.chest = None;
        self.trap.clear();
        self.critters.clear();
        self.hedge = None;
    }

    fn advance(&mut self, ctx: &mut RoomContext) {
        if toolkit::leave_by_exit(ctx, &EXITS, self.zones()) {
            return;
        }

        let (plate, chest) = (self.plate, self.chest);
        let mut sprung = false;
        let mut opened = false;
        ctx.events.process(|event| match event {
            StoryEvent::StateChange { id, .. } if Some(*id) == plate => {
                sprung = true;
                true
            }
            StoryEvent::StateChange { id, on: true } if Some(*id) == chest => {
                opened = true;
                true
            }
            // critters leave nothing behind worth tracking
            StoryEvent::Killed { id } => self.critters.contains(id),
            _ => false,
        });
        if sprung {
            self.spring_trap(ctx);
        }
        if opened && !self.chest_open {
            self.take_rune(ctx);
        }
        self.tend_hedge(ctx.sprites);
    }

    fn save(&self, buffer: &mut BitBuffer) {
        buffer.write_bool(self.chest_open);
    }

    fn restore(&mut self, _version: u32, buffer: &mut BitBuffer) -> bool {
        let Some(chest_open) = buffer.read_bool() else {
            return false;
        };
        self.chest_open = chest_open;
        true
    }
}
