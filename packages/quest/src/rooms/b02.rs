use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_engine::room::toolkit;
use mq_engine::sprite::Chest;
use mq_engine::sprite::Door;
use mq_engine::sprite::Fence;
use mq_engine::sprite::Triffid;
use mq_engine::sprite::WallSwitch;
use mq_engine::sprite::palette;
use tracing::debug;

use super::BRIDGE_LEN;
use super::RoomB01;
use crate::Rune;

const EXITS: [Exit; 1] =
    [Exit::new(Direction::South, 4, "B01", 1).with_floor(-1, palette::DARK_GREY)];

const POSTS_POS: IVec3 = IVec3::new(3, 0, 0);
const GATE_POS: IVec3 = IVec3::new(5, 6, 0);
const SWITCH_POS: IVec3 = IVec3::new(10, 3, 0);
const CHEST_POS: IVec3 = IVec3::new(5, 8, 0);
const TRIFFID_POS: [IVec3; 2] = [IVec3::new(4, 8, 0), IVec3::new(6, 8, 0)];

/// Planks of the B01 bridge laid so far, as last left by that room.
pub fn bridge_extent(rooms: &RoomLookup) -> u32 {
    rooms
        .find::<RoomB01>("B01")
        .map(|room| room.bridge_extent())
        .unwrap_or(0)
}

/// The far side of the chasm. A gated garden where two triffids guard
/// the water rune.
#[derive(Debug, Default)]
pub struct RoomB02 {
    chest_open: bool,
    gate_open: bool,

    posts: Option<SpriteId>,
    gate: Option<SpriteId>,
    switch: Option<SpriteId>,
    chest: Option<SpriteId>,
}

impl RoomB02 {
    pub fn chest_open(&self) -> bool {
        self.chest_open
    }

    pub fn gate_open(&self) -> bool {
        self.gate_open
    }

    /// The bridge end posts, while the room is active.
    pub fn posts(&self) -> Option<SpriteId> {
        self.posts
    }

    /// The bridge end posts show once the bridge reaches this side.
    fn sync_posts(&self, sprites: &mut SpriteManager, rooms: &RoomLookup) {
        let reached = bridge_extent(rooms) == BRIDGE_LEN;
        if let Some(posts) = self.posts.and_then(|id| sprites.get_mut::<BlockArray>(id))
            && posts.is_visible() != reached
        {
            posts.set_visible(reached);
        }
    }

    fn open_gate(&mut self, ctx: &mut RoomContext) {
        debug!("B02 gate opened");
        self.gate_open = true;
        if let Some(gate) = self.gate.and_then(|id| ctx.sprites.get_mut::<Door>(id)) {
            gate.set_closed(false);
        }
        if let Some(switch) = self.switch.and_then(|id| ctx.sprites.get_mut::<WallSwitch>(id)) {
            switch.freeze_state(true);
        }
        ctx.env.play(Sound::Door);
        ctx.events.push(StoryEvent::SaveGame);
    }
}

impl Room for RoomB02 {
    fn id(&self) -> RoomId {
        "B02"
    }

    fn exits(&self) -> &[Exit] {
        &EXITS
    }

    fn create_sprites(&mut self, sprites: &mut SpriteManager, rooms: &RoomLookup) {
        let zones = self.zones();
        toolkit::add_floor(sprites, zones, palette::GREEN);
        toolkit::add_basic_walls(sprites, &EXITS, zones, -1, 1, palette::LIGHT_GREY);

        let posts = BlockArray::from_fn(POSTS_POS, IVec3::new(3, 1, 1), |local| {
            (local.x != 1).then_some(palette::BROWN)
        });
        self.posts = Some(sprites.add_sprite(posts));
        self.sync_posts(sprites, rooms);

        sprites.add_sprite(Fence::new(IVec3::new(0, 6, 0), Direction::East, 5, 2, palette::BROWN));
        sprites.add_sprite(Fence::new(IVec3::new(6, 6, 0), Direction::East, 4, 2, palette::BROWN));
        self.gate = Some(sprites.add_sprite(Door::new(GATE_POS, !self.gate_open, palette::BROWN)));
        let mut switch = WallSwitch::new(SWITCH_POS, self.gate_open);
        switch.freeze_state(self.gate_open);
        self.switch = Some(sprites.add_sprite(switch));

        self.chest = Some(sprites.add_sprite(Chest::new(CHEST_POS, self.chest_open)));
        for position in TRIFFID_POS {
            sprites.add_sprite(Triffid::new(position));
        }
    }

    fn discard_resources(&mut self) {
        self.posts = None;
        self.gate = None;
        self.switch = None;
        self.chest = None;
    }

    fn advance(&mut self, ctx: &mut RoomContext) {
        if toolkit::leave_by_exit(ctx, &EXITS, self.zones()) {
            return;
        }
        self.sync_posts(ctx.sprites, &ctx.rooms);

        let (switch, chest) = (self.switch, self.chest);
        let mut gate = false;
        let mut opened = false;
        ctx.events.process(|event| match event {
            StoryEvent::StateChange { id, on } if Some(*id) == switch => {
                gate |= *on;
                true
            }
            StoryEvent::StateChange { id, on: true } if Some(*id) == chest => {
                opened = true;
                true
            }
            _ => false,
        });
        if gate && !self.gate_open {
            self.open_gate(ctx);
        }
        if opened && !self.chest_open {
            debug!("B02 chest opened");
            self.chest_open = true;
            ctx.events.push(StoryEvent::ItemCollected {
                item: Rune::Water.item(),
            });
            ctx.events.push(StoryEvent::SaveGame);
        }
    }

    fn save(&self, buffer: &mut BitBuffer) {
        buffer.write_bool(self.chest_open);
        buffer.write_bool(self.gate_open);
    }

    fn restore(&mut self, _version: u32, buffer: &mut BitBuffer) -> bool {
        let (Some(chest_open), Some(gate_open)) = (buffer.read_bool(), buffer.read_bool()) else {
            return false;
        };
        self.chest_open = chest_open;
        self.gate_open = gate_open;
        true
    }
}
