use bevy_math::IVec2;
use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::toolkit;
use mq_engine::sprite::Fence;
use mq_engine::sprite::Liquid;
use mq_engine::sprite::Statue;
use mq_engine::sprite::palette;
use tracing::debug;
use tracing::info;

use crate::Rune;

const ZONES: IVec2 = IVec2::new(2, 1);
const EXITS: [Exit; 2] = [
    Exit::new(Direction::West, 6, "C01", 1).with_floor(-1, palette::DARK_GREY),
    Exit::new(Direction::East, 5, "C02", 1).with_floor(3, palette::YELLOW),
];
const FINAL_EXIT: usize = 1;
const LEVELS: [CameraLevel; 2] = [CameraLevel::new(-10, 2, 0), CameraLevel::new(2, 20, 4)];

const MOAT_X: i32 = 10;
const MOAT_WIDTH: i32 = 2;
/// Rows of the moat crossed by the planks.
const PLANK_Y: i32 = 4;
const PLANK_ROWS: i32 = 2;
const DRY_TICKS: u32 = 60;
const WET_TICKS: u32 = 30;

const STAIRS: [(IVec3, i32); 3] = [
    (IVec3::new(13, 5, 0), 1),
    (IVec3::new(14, 5, 0), 2),
    (IVec3::new(15, 5, 0), 3),
];
const PLATEAU_MIN: IVec3 = IVec3::new(16, 3, 0);
const PLATEAU_SIZE: IVec3 = IVec3::new(4, 5, 4);

/// The tower. A flooding causeway crosses the moat, statues climb to the
/// battlements, and the way out opens only for a player holding every
/// rune.
#[derive(Debug, Default)]
pub struct RoomC02 {
    dry_planks: Option<SpriteId>,
    wet_planks: Option<SpriteId>,
    flood: Option<SpriteId>,
    flooded: bool,
    flood_timer: u32,
    won: bool,
}

impl RoomC02 {
    pub fn flooded(&self) -> bool {
        self.flooded
    }

    fn planks(min: IVec3, colour: Colour) -> BlockArray {
        BlockArray::slab(min, MOAT_WIDTH, PLANK_ROWS, colour)
    }

    fn advance_flood(&mut self, sprites: &mut SpriteManager) {
        if self.flood_timer > 0 {
            self.flood_timer -= 1;
            return;
        }
        self.flooded = !self.flooded;
        debug!("C02 causeway flooded: {}", self.flooded);
        self.flood_timer = if self.flooded { WET_TICKS } else { DRY_TICKS };
        self.show_flood(sprites);
    }

    /// The dry and wet planks share one footprint and only swap
    /// visibility. The flood water is what kills.
    fn show_flood(&self, sprites: &mut SpriteManager) {
        let flooded = self.flooded;
        if let Some(planks) = self.dry_planks.and_then(|id| sprites.get_mut::<BlockArray>(id)) {
            planks.set_visible(!flooded);
        }
        if let Some(planks) = self.wet_planks.and_then(|id| sprites.get_mut::<BlockArray>(id)) {
            planks.set_visible(flooded);
        }
        if let Some(water) = self.flood.and_then(|id| sprites.get_mut::<Liquid>(id)) {
            water.set_active(flooded);
        }
    }
}

impl Room for RoomC02 {
    fn id(&self) -> RoomId {
        "C02"
    }

    fn exits(&self) -> &[Exit] {
        &EXITS
    }

    fn zones(&self) -> IVec2 {
        ZONES
    }

    fn camera_levels(&self) -> &[CameraLevel] {
        &LEVELS
    }

    fn create_sprites(&mut self, sprites: &mut SpriteManager, rooms: &RoomLookup) {
        let extent = toolkit::room_extent(ZONES);
        sprites.add_sprite(BlockArray::from_fn(
            IVec3::new(0, 0, -1),
            IVec3::new(extent.x, extent.y, 1),
            |local| {
                let moat = local.x >= MOAT_X && local.x < MOAT_X + MOAT_WIDTH;
                (!moat).then_some(palette::DARK_GREY)
            },
        ));
        toolkit::add_basic_walls(sprites, &EXITS, ZONES, -1, 5, palette::LIGHT_GREY);
        let locked = !Rune::all_collected(rooms.items());
        toolkit::add_exit_doors(sprites, &EXITS, ZONES, palette::YELLOW, |index| {
            index == FINAL_EXIT && locked
        });

        let water = vec![palette::BLUE, palette::LIGHT_BLUE];
        let south = IVec3::new(MOAT_X, 0, 0);
        let north = IVec3::new(MOAT_X, PLANK_Y + PLANK_ROWS, 0);
        sprites.add_sprite(Liquid::new(south, IVec2::new(MOAT_WIDTH, PLANK_Y), water.clone()));
        sprites.add_sprite(Liquid::new(
            north,
            IVec2::new(MOAT_WIDTH, extent.y - north.y),
            water.clone(),
        ));

        let planks_min = IVec3::new(MOAT_X, PLANK_Y, -1);
        self.dry_planks = Some(sprites.add_sprite(Self::planks(planks_min, palette::BROWN)));
        self.wet_planks = Some(sprites.add_sprite(Self::planks(planks_min, palette::CYAN)));
        self.flood = Some(sprites.add_sprite(Liquid::new(
            IVec3::new(MOAT_X, PLANK_Y, 0),
            IVec2::new(MOAT_WIDTH, PLANK_ROWS),
            water,
        )));
        self.flooded = false;
        self.flood_timer = DRY_TICKS;
        self.show_flood(sprites);

        for (position, height) in STAIRS {
            sprites.add_sprite(Statue::new(position, height, palette::LIGHT_GREY));
        }
        sprites.add_sprite(BlockArray::from_fn(PLATEAU_MIN, PLATEAU_SIZE, |_| {
            Some(palette::DARK_GREY)
        }));
        sprites.add_sprite(Fence::new(IVec3::new(2, 8, 0), Direction::East, 6, 1, palette::BROWN));
        self.won = false;
    }

    fn discard_resources(&mut self) {
        self.dry_planks = None;
        self.wet_planks = None;
        self.flood = None;
    }

    fn advance(&mut self, ctx: &mut RoomContext) {
        let exit = ctx
            .sprites
            .player()
            .and_then(|player| toolkit::check_exits(player, &EXITS, ZONES));
        match exit {
            Some(FINAL_EXIT) => {
                if !self.won {
                    info!("the player left the tower with every rune");
                    self.won = true;
                    ctx.events.push(StoryEvent::PlayerWins);
                }
                return;
            }
            Some(_) => {
                if toolkit::leave_by_exit(ctx, &EXITS, ZONES) {
                    return;
                }
            }
            None => {}
        }

        self.advance_flood(ctx.sprites);
        toolkit::update_camera(ctx, ZONES, &LEVELS);
    }

    fn save(&self, _buffer: &mut BitBuffer) {}

    fn restore(&mut self, _version: u32, _buffer: &mut BitBuffer) -> bool {
        true
    }
}
