use bevy_math::IVec2;
use bevy_math::IVec3;

use crate::sprite::Colour;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawItem {
    Block { cell: IVec3, colour: Colour },
    Sprite { cell: IVec3, glyph: char, frame: u8 },
}

impl DrawItem {
    pub fn cell(&self) -> IVec3 {
        match self {
            DrawItem::Block { cell, .. } | DrawItem::Sprite { cell, .. } => *cell,
        }
    }
}

/// Everything the sprites asked to have drawn this tick, in painter's
/// order. A renderer draws items front to back as listed.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_block(&mut self, cell: IVec3, colour: Colour) {
        self.items.push(DrawItem::Block { cell, colour });
    }

    pub fn push_sprite(&mut self, cell: IVec3, glyph: char, frame: u8) {
        self.items.push(DrawItem::Sprite { cell, glyph, frame });
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A top down character view of the cells in `[min, min + size)`.
    /// The highest item in each column wins, later items win ties.
    /// Blocks below the walking level render as `.`, the rest as `#`.
    pub fn ascii_top_down(&self, min: IVec2, size: IVec2) -> String {
        let width = size.x.max(0) as usize;
        let height = size.y.max(0) as usize;
        let mut top: Vec<Option<(i32, char)>> = vec![None; width * height];
        for item in &self.items {
            let cell = item.cell();
            let x = cell.x - min.x;
            let y = cell.y - min.y;
            if x < 0 || y < 0 || x >= size.x || y >= size.y {
                continue;
            }
            let glyph = match item {
                DrawItem::Block { cell, .. } if cell.z < 0 => '.',
                DrawItem::Block { .. } => '#',
                DrawItem::Sprite { glyph, .. } => *glyph,
            };
            let slot = &mut top[y as usize * width + x as usize];
            if slot.is_none_or(|(z, _)| cell.z >= z) {
                *slot = Some((cell.z, glyph));
            }
        }
        let mut out = String::with_capacity((width + 1) * height);
        // north at the top
        for y in (0..height).rev() {
            for x in 0..width {
                out.push(top[y * width + x].map(|(_, c)| c).unwrap_or(' '));
            }
            out.push('\n');
        }
        out
    }
}
