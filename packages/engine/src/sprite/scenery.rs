use bevy_math::IVec3;

use crate::prelude::*;

const SPLATTER_TICKS: u32 = 30;

sprite_struct!(
    /// A straight run of fence posts along one axis.
    pub struct Fence {
        pub direction: Direction,
        pub length: i32,
        pub height: i32,
        pub colour: Colour,
    }
);

impl Fence {
    pub fn new(start: IVec3, direction: Direction, length: i32, height: i32, colour: Colour) -> Self {
        Self {
            state: BaseSpriteState::at(start),
            direction,
            length,
            height,
            colour,
        }
    }

    fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        let start = self.position();
        (0..self.length).flat_map(move |i| {
            (0..self.height).map(move |z| start + self.direction.delta() * i + IVec3::Z * z)
        })
    }
}

impl Sprite for Fence {
    fn hits(&self, cell: IVec3) -> bool {
        self.cells().any(|c| c == cell)
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        false
    }

    fn draw(&self, list: &mut DrawList) {
        for cell in self.cells() {
            list.push_block(cell, self.colour);
        }
    }
}

sprite_struct!(
    /// A solid plinth of `height` levels. The top can be stood on, so a
    /// row of statues makes a staircase.
    pub struct Statue {
        pub height: i32,
        pub colour: Colour,
    }
);

impl Statue {
    pub fn new(position: IVec3, height: i32, colour: Colour) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            height,
            colour,
        }
    }
}

impl Sprite for Statue {
    fn hits(&self, cell: IVec3) -> bool {
        let base = self.position();
        cell.x == base.x && cell.y == base.y && cell.z >= base.z && cell.z < base.z + self.height
    }

    fn is_platform(&self, cell: IVec3) -> bool {
        cell == self.position() + IVec3::Z * self.height
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        false
    }

    fn draw(&self, list: &mut DrawList) {
        let base = self.position();
        for z in 0..self.height {
            list.push_block(base + IVec3::Z * z, self.colour);
        }
    }
}

sprite_struct!(
    /// A two cell high door. Solid while closed.
    pub struct Door {
        closed: bool,
        pub colour: Colour,
    }
);

impl Door {
    pub fn new(position: IVec3, closed: bool, colour: Colour) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            closed,
            colour,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }
}

impl Sprite for Door {
    fn hits(&self, cell: IVec3) -> bool {
        let base = self.position();
        self.closed && (cell == base || cell == base + IVec3::Z)
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        false
    }

    fn draw(&self, list: &mut DrawList) {
        if self.closed {
            list.push_block(self.position(), self.colour);
            list.push_block(self.position() + IVec3::Z, self.colour);
        }
    }
}

sprite_struct!(
    /// What is left of an enemy. Fades after a while.
    pub struct Splatter {
        timer: u32,
    }
);

impl Splatter {
    pub fn new(position: IVec3) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            timer: SPLATTER_TICKS,
        }
    }
}

impl Sprite for Splatter {
    fn advance(&self, _world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        if self.timer == 0 {
            ctx.remove(self.id());
        } else {
            next.timer = self.timer - 1;
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_sprite(self.position(), ',', (self.timer * 3 / (SPLATTER_TICKS + 1)) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision;
    use crate::sprite::palette;

    #[test]
    fn statues_make_stairs() {
        let mut manager = SpriteManager::new();
        manager.add_sprite(BlockArray::slab(IVec3::new(0, 0, -1), 4, 1, palette::GREEN));
        manager.add_sprite(Statue::new(IVec3::new(1, 0, 0), 1, palette::LIGHT_GREY));
        manager.add_sprite(Statue::new(IVec3::new(2, 0, 0), 2, palette::LIGHT_GREY));
        let first = collision::step_target(&manager, IVec3::ZERO, Direction::East, true, 0);
        assert_eq!(first, Some(IVec3::new(1, 0, 1)));
        let second = collision::step_target(&manager, IVec3::new(1, 0, 1), Direction::East, true, 0);
        assert_eq!(second, Some(IVec3::new(2, 0, 2)));
        assert!(collision::step_target(&manager, IVec3::ZERO, Direction::East, false, 0).is_none());
    }

    #[test]
    fn open_doors_let_walkers_through() {
        let mut door = Door::new(IVec3::new(5, 10, 0), true, palette::BROWN);
        assert!(door.hits(IVec3::new(5, 10, 1)));
        door.set_closed(false);
        assert!(!door.hits(IVec3::new(5, 10, 0)));
    }

    #[test]
    fn fences_run_along_their_axis() {
        let fence = Fence::new(IVec3::new(1, 1, 0), Direction::North, 3, 1, palette::BROWN);
        assert!(fence.hits(IVec3::new(1, 3, 0)));
        assert!(!fence.hits(IVec3::new(1, 4, 0)));
        assert!(!fence.hits(IVec3::new(1, 2, 1)));
    }
}
