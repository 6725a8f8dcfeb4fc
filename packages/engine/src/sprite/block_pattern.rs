use bevy_math::IVec3;

use crate::prelude::*;

/// One whole cell in the fixed point units of a pattern's pointers.
pub const FIXED_ONE: i32 = 256;

sprite_struct!(
    /// An ordered run of cells of which only a window is solid. Moving the
    /// window's ends animates bridges extending, walls sliding and
    /// conveyors.
    pub struct BlockPattern {
        cells: Vec<IVec3>,
        colour: Colour,
        start: i32,
        end: i32,
        start_rate: i32,
        end_rate: i32,
    }
);

impl BlockPattern {
    pub fn new(cells: Vec<IVec3>, colour: Colour) -> Self {
        assert!(!cells.is_empty(), "a block pattern needs at least one cell");
        Self {
            state: BaseSpriteState::at(cells[0]),
            cells,
            colour,
            start: 0,
            end: 0,
            start_rate: 0,
            end_rate: 0,
        }
    }

    /// Cells visited walking from `start` along compass moves, with `U`
    /// and `D` for up and down. The start cell is included.
    pub fn from_path(start: IVec3, moves: &str, colour: Colour) -> Self {
        let mut cell = start;
        let mut cells = vec![start];
        for c in moves.chars() {
            let delta = match c {
                'U' | 'u' => IVec3::Z,
                'D' | 'd' => IVec3::NEG_Z,
                _ => Direction::from_char(c)
                    .map(|d| d.delta())
                    .unwrap_or_else(|| panic!("invalid pattern move '{c}'")),
            };
            cell += delta;
            cells.push(cell);
        }
        Self::new(cells, colour)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn max_pointer(&self) -> i32 {
        self.cells.len() as i32 * FIXED_ONE
    }

    /// Set how far each end of the window moves per tick, in fixed point.
    pub fn set_rates(&mut self, start_rate: i32, end_rate: i32) {
        self.start_rate = start_rate;
        self.end_rate = end_rate;
    }

    /// Place the window directly, in whole cells. Clamped to the pattern.
    pub fn set_window(&mut self, start: usize, end: usize) {
        let len = self.cells.len();
        let end = end.min(len);
        let start = start.min(end);
        self.start = start as i32 * FIXED_ONE;
        self.end = end as i32 * FIXED_ONE;
    }

    /// The solid cells as a half open range of indices.
    pub fn window(&self) -> (usize, usize) {
        (
            (self.start / FIXED_ONE) as usize,
            (self.end / FIXED_ONE) as usize,
        )
    }

    pub fn visible_cells(&self) -> &[IVec3] {
        let (start, end) = self.window();
        &self.cells[start..end]
    }

    /// Whether another tick would move either end of the window.
    pub fn is_moving(&self) -> bool {
        let max = self.max_pointer();
        let start_moves = (self.start_rate > 0 && self.start < self.end)
            || (self.start_rate < 0 && self.start > 0);
        let end_moves =
            (self.end_rate > 0 && self.end < max) || (self.end_rate < 0 && self.end > self.start);
        start_moves || end_moves
    }
}

impl Sprite for BlockPattern {
    fn hits(&self, cell: IVec3) -> bool {
        self.visible_cells().contains(&cell)
    }

    fn is_platform(&self, cell: IVec3) -> bool {
        self.visible_cells().contains(&(cell - IVec3::Z))
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        self.is_moving()
    }

    fn advance(&self, _world: &SpriteManager, next: &mut Self, _ctx: &mut TickContext) {
        let max = self.max_pointer();
        next.end = (self.end + self.end_rate).clamp(0, max);
        next.start = (self.start + self.start_rate).clamp(0, max).min(next.end);
    }

    fn draw(&self, list: &mut DrawList) {
        for cell in self.visible_cells() {
            list.push_block(*cell, self.colour);
        }
    }
}
