use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::toolkit;
use mq_engine::sprite::BlockPattern;
use mq_engine::sprite::Spook;
use mq_engine::sprite::WallSwitch;
use mq_engine::sprite::palette;
use tracing::debug;

const EXITS: [Exit; 2] = [
    Exit::new(Direction::South, 4, "A01", 1).with_floor(-1, palette::DARK_GREY),
    Exit::new(Direction::North, 4, "B02", 0).with_floor(-1, palette::DARK_GREY),
];

/// Cells in the bridge across the chasm.
pub const BRIDGE_LEN: u32 = 3;
const BRIDGE_START: IVec3 = IVec3::new(4, 4, -1);
const BRIDGE_STEP_TICKS: u32 = 8;
const CHASM_ROWS: std::ops::RangeInclusive<i32> = 4..=6;
const SWITCH_POS: IVec3 = IVec3::new(-1, 2, 0);

const EXTENT_BITS: u32 = 2;

/// The chasm. A lever in the west wall runs a bridge out across it one
/// plank at a time.
#[derive(Debug, Default)]
pub struct RoomB01 {
    bridge_extent: u32,
    switch_on: bool,

    bridge: Option<SpriteId>,
    switch: Option<SpriteId>,
    step_timer: u32,
}

impl RoomB01 {
    /// Planks currently laid, from the south edge of the chasm.
    pub fn bridge_extent(&self) -> u32 {
        self.bridge_extent
    }

    pub fn switch_on(&self) -> bool {
        self.switch_on
    }

    fn bridge_target(&self) -> u32 {
        if self.switch_on { BRIDGE_LEN } else { 0 }
    }

    pub fn bridge_moving(&self) -> bool {
        self.bridge_extent != self.bridge_target()
    }

    /// Move the bridge one plank toward where the switch wants it.
    /// Returns the new extent.
    pub fn update_bridge(&mut self) -> u32 {
        let target = self.bridge_target();
        if self.bridge_extent < target {
            self.bridge_extent += 1;
        } else if self.bridge_extent > target {
            self.bridge_extent -= 1;
        }
        self.bridge_extent
    }

    /// Accept a switch throw unless the bridge is still travelling. A
    /// throw mid travel would leave the lever pointing the wrong way, so
    /// the caller flips the lever back instead.
    pub fn throw_switch(&mut self, on: bool) -> bool {
        if self.bridge_moving() {
            return false;
        }
        self.switch_on = on;
        true
    }

    fn sync_bridge(&self, sprites: &mut SpriteManager) {
        if let Some(bridge) = self.bridge.and_then(|id| sprites.get_mut::<BlockPattern>(id)) {
            bridge.set_window(0, self.bridge_extent as usize);
        }
    }
}

impl Room for RoomB01 {
    fn id(&self) -> RoomId {
        "B01"
    }

    fn exits(&self) -> &[Exit] {
        &EXITS
    }

    /// South of the chasm, facing it.
    fn start_position(&self) -> (IVec3, Direction) {
        (IVec3::new(4, 1, 0), Direction::North)
    }

    fn create_sprites(&mut self, sprites: &mut SpriteManager, _rooms: &RoomLookup) {
        let zones = self.zones();
        let extent = toolkit::room_extent(zones);
        sprites.add_sprite(BlockArray::from_fn(
            IVec3::new(0, 0, -1),
            IVec3::new(extent.x, extent.y, 1),
            |local| (!CHASM_ROWS.contains(&local.y)).then_some(palette::DARK_GREY),
        ));
        toolkit::add_basic_walls(sprites, &EXITS, zones, -1, 1, palette::LIGHT_GREY);

        let bridge = BlockPattern::from_path(BRIDGE_START, "NN", palette::BROWN);
        debug_assert_eq!(bridge.len(), BRIDGE_LEN as usize);
        self.bridge = Some(sprites.add_sprite(bridge));
        self.sync_bridge(sprites);

        self.switch = Some(sprites.add_sprite(WallSwitch::new(SWITCH_POS, self.switch_on)));
        self.step_timer = BRIDGE_STEP_TICKS;

        let haunt = Track::new(vec![IVec3::new(1, 5, 0), IVec3::new(8, 5, 0)], TrackMode::Bounce);
        sprites.add_sprite(Spook::new(haunt, 6));
    }

    fn discard_resources(&mut self) {
        self.bridge = None;
        self.switch = None;
    }

    fn advance(&mut self, ctx: &mut RoomContext) {
        if toolkit::leave_by_exit(ctx, &EXITS, self.zones()) {
            return;
        }

        let switch = self.switch;
        let mut thrown = None;
        ctx.events.process(|event| match event {
            StoryEvent::StateChange { id, on } if Some(*id) == switch => {
                thrown = Some(*on);
                true
            }
            _ => false,
        });
        if let Some(on) = thrown {
            if self.throw_switch(on) {
                debug!("B01 bridge heading to {}", self.bridge_target());
                self.step_timer = BRIDGE_STEP_TICKS;
            } else if let Some(lever) = switch.and_then(|id| ctx.sprites.get_mut::<WallSwitch>(id)) {
                debug!("B01 switch thrown while the bridge moves, flipping it back");
                lever.set_on(self.switch_on);
            }
        }

        if !self.bridge_moving() {
            return;
        }
        if self.step_timer > 0 {
            self.step_timer -= 1;
            return;
        }
        self.step_timer = BRIDGE_STEP_TICKS;
        self.update_bridge();
        self.sync_bridge(ctx.sprites);
        ctx.env.play(Sound::Door);
        if !self.bridge_moving() {
            ctx.events.push(StoryEvent::SaveGame);
        }
    }

    fn save(&self, buffer: &mut BitBuffer) {
        buffer.write(self.bridge_extent, EXTENT_BITS);
        buffer.write_bool(self.switch_on);
    }

    fn restore(&mut self, _version: u32, buffer: &mut BitBuffer) -> bool {
        let (Some(extent), Some(switch_on)) = (buffer.read(EXTENT_BITS), buffer.read_bool()) else {
            return false;
        };
        if extent > BRIDGE_LEN {
            return false;
        }
        self.bridge_extent = extent;
        self.switch_on = switch_on;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::harness::RoomHarness;

    fn at_the_lever() -> RoomHarness<RoomB01> {
        let mut harness = RoomHarness::<RoomB01>::new();
        harness.enter(Entry::Door(0));
        harness.place_player(SWITCH_POS + IVec3::X, Direction::West);
        harness
    }

    fn bridge(harness: &RoomHarness<RoomB01>) -> &BlockPattern {
        harness
            .sprites
            .get::<BlockPattern>(harness.room.bridge.unwrap())
            .unwrap()
    }

    #[test]
    fn lever_lays_the_bridge_plank_by_plank() {
        let mut harness = at_the_lever();
        harness.tick(ActionInput::attacking());
        harness.idle(BRIDGE_STEP_TICKS as usize + 2);
        assert_eq!(harness.room.bridge_extent(), 1);
        assert_eq!(bridge(&harness).window(), (0, 1));
        harness.idle(40);
        assert_eq!(harness.room.bridge_extent(), BRIDGE_LEN);
        assert_eq!(bridge(&harness).visible_cells().len(), BRIDGE_LEN as usize);
        assert_eq!(harness.count(&StoryEvent::SaveGame), 1);
    }

    #[test]
    fn throw_mid_travel_is_refused() {
        let mut harness = at_the_lever();
        harness.tick(ActionInput::attacking());
        harness.idle(7);
        assert!(harness.room.bridge_moving());
        harness.tick(ActionInput::attacking());
        harness.idle(1);
        let lever = harness
            .sprites
            .get::<WallSwitch>(harness.room.switch.unwrap())
            .unwrap();
        assert!(lever.is_on());
        assert!(harness.room.switch_on());
        harness.idle(40);
        assert_eq!(harness.room.bridge_extent(), BRIDGE_LEN);
    }

    #[test]
    fn bridge_steps_toward_the_lever() {
        let mut room = RoomB01::default();
        assert_eq!(room.update_bridge(), 0);
        assert!(room.throw_switch(true));
        assert!(!room.throw_switch(false));
        assert_eq!(room.update_bridge(), 1);
        assert_eq!(room.update_bridge(), 2);
        assert_eq!(room.update_bridge(), 3);
        assert_eq!(room.update_bridge(), 3);
        assert!(room.throw_switch(false));
        assert_eq!(room.update_bridge(), 2);
    }

    #[test]
    fn chasm_swallows_the_player() {
        let mut harness = RoomHarness::<RoomB01>::new();
        harness.enter(Entry::Door(0));
        harness.place_player(IVec3::new(4, 3, 0), Direction::North);
        harness.walk(Direction::North, 1);
        harness.idle(20);
        assert!(harness.player().is_dead());
    }

    #[test]
    fn partial_bridge_round_trips() {
        let mut room = RoomB01::default();
        room.throw_switch(true);
        room.update_bridge();
        room.update_bridge();
        let harness = RoomHarness::with_room(room);
        let reloaded = harness.reloaded();
        assert_eq!(reloaded.bridge_extent(), 2);
        assert!(reloaded.switch_on());
    }

    #[test]
    fn short_record_is_rejected() {
        let mut buffer = BitBuffer::new();
        buffer.write(3, EXTENT_BITS);
        buffer.write_bool(false);
        let mut room = RoomB01::default();
        // three planks with the lever off is a valid mid travel state
        assert!(room.restore(1, &mut buffer));

        let mut short = BitBuffer::new();
        short.write(1, EXTENT_BITS);
        let mut room = RoomB01::default();
        assert!(!room.restore(1, &mut short));
        assert_eq!(room.bridge_extent(), 0);
    }
}
