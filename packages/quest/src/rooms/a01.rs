use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::toolkit;
use mq_engine::sprite::Door;
use mq_engine::sprite::FloorSwitch;
use mq_engine::sprite::palette;
use tracing::debug;

const EXITS: [Exit; 2] = [
    Exit::new(Direction::East, 5, "A02", 0).with_floor(-1, palette::GREEN),
    Exit::new(Direction::North, 4, "B01", 0).with_floor(-1, palette::DARK_GREY),
];
const NORTH_EXIT: usize = 1;

const SWITCH_POS: IVec3 = IVec3::new(2, 7, 0);
const FLOWER_BED_POS: IVec3 = IVec3::new(6, 2, 0);
const REPAINT_TICKS: u32 = 20;
const FLOWER_FRAMES: [[&str; 2]; 2] = [["12", "21"], ["21", "12"]];

/// The courtyard where a new game starts. A pressure plate opens the
/// north door for good.
#[derive(Debug, Default)]
pub struct RoomA01 {
    door_open: bool,

    switch: Option<SpriteId>,
    doors: Vec<SpriteId>,
    flower_bed: Option<SpriteId>,
    repaint_timer: u32,
    flower_frame: usize,
}

impl RoomA01 {
    pub fn door_open(&self) -> bool {
        self.door_open
    }

    fn open_door(&mut self, ctx: &mut RoomContext) {
        debug!("A01 north door opened");
        self.door_open = true;
        if let Some(door) = self
            .doors
            .get(NORTH_EXIT)
            .and_then(|&id| ctx.sprites.get_mut::<Door>(id))
        {
            door.set_closed(false);
        }
        if let Some(switch) = self.switch.and_then(|id| ctx.sprites.get_mut::<FloorSwitch>(id)) {
            switch.freeze_state(true);
        }
        ctx.env.play(Sound::Door);
        ctx.events.push(StoryEvent::SaveGame);
    }

    fn repaint_flowers(&mut self, ctx: &mut RoomContext) {
        if self.repaint_timer > 0 {
            self.repaint_timer -= 1;
            return;
        }
        self.repaint_timer = REPAINT_TICKS;
        self.flower_frame = (self.flower_frame + 1) % FLOWER_FRAMES.len();
        if let Some(bed) = self.flower_bed.and_then(|id| ctx.sprites.get_mut::<BlockArray>(id)) {
            bed.paint(&FLOWER_FRAMES[self.flower_frame], FLOWER_BED_POS);
        }
    }
}

impl Room for RoomA01 {
    fn id(&self) -> RoomId {
        "A01"
    }

    fn exits(&self) -> &[Exit] {
        &EXITS
    }

    fn start_position(&self) -> (IVec3, Direction) {
        (IVec3::new(2, 2, 0), Direction::North)
    }

    fn create_sprites(&mut self, sprites: &mut SpriteManager, _rooms: &RoomLookup) {
        let zones = self.zones();
        toolkit::add_floor(sprites, zones, palette::GREEN);
        toolkit::add_basic_walls(sprites, &EXITS, zones, -1, 1, palette::LIGHT_GREY);
        let door_open = self.door_open;
        self.doors = toolkit::add_exit_doors(sprites, &EXITS, zones, palette::BROWN, |index| {
            index == NORTH_EXIT && !door_open
        });

        let mut switch = FloorSwitch::new(SWITCH_POS, door_open);
        switch.freeze_state(door_open);
        self.switch = Some(sprites.add_sprite(switch));

        self.flower_frame = 0;
        self.repaint_timer = REPAINT_TICKS;
        self.flower_bed = Some(sprites.add_sprite(BlockArray::new(
            &[FLOWER_FRAMES[0]],
            &[palette::GREEN, palette::RED, palette::YELLOW],
            FLOWER_BED_POS,
        )));
    }

    fn discard_resources(&mut self) {
        self.switch = None;
        self.doors.clear();
        self.flower_bed = None;
    }

    fn advance(&mut self, ctx: &mut RoomContext) {
        if toolkit::leave_by_exit(ctx, &EXITS, self.zones()) {
            return;
        }

        let switch = self.switch;
        let mut pressed = false;
        ctx.events.process(|event| match event {
            StoryEvent::StateChange { id, on } if Some(*id) == switch => {
                pressed |= *on;
                true
            }
            _ => false,
        });
        if pressed && !self.door_open {
            self.open_door(ctx);
        }

        self.repaint_flowers(ctx);
    }

    fn save(&self, buffer: &mut BitBuffer) {
        buffer.write_bool(self.door_open);
    }

    fn restore(&mut self, _version: u32, buffer: &mut BitBuffer) -> bool {
        let Some(door_open) = buffer.read_bool() else {
            return false;
        };
        self.door_open = door_open;
        true
    }
}
