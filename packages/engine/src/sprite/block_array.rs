use anyhow::anyhow;
use anyhow::bail;
use bevy_math::IVec3;
use serde::Deserialize;
use serde::Serialize;

use crate::prelude::*;

/// Block array geometry as authored in data files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockArrayData {
    pub layers: Vec<Vec<String>>,
    pub palette: Vec<u8>,
    #[serde(default)]
    pub origin: [i32; 3],
}

sprite_struct!(
    /// A dense box of coloured blocks, the bulk of every room's geometry.
    ///
    /// Layers are listed bottom up, rows north to south, characters west
    /// to east. A space is empty, any other character is a base 36 index
    /// into the palette.
    pub struct BlockArray {
        size: IVec3,
        cells: Vec<Option<Colour>>,
        palette: Vec<Colour>,
        visible: bool,
    }
);

impl BlockArray {
    /// Build from authored layers. Malformed layers are a programming
    /// error in room code and panic.
    pub fn new<L, S>(layers: &[L], palette: &[Colour], origin: IVec3) -> Self
    where
        L: AsRef<[S]>,
        S: AsRef<str>,
    {
        match Self::parse(layers, palette, origin) {
            Ok(array) => array,
            Err(e) => panic!("malformed block array: {e}"),
        }
    }

    pub fn from_data(data: &BlockArrayData) -> anyhow::Result<Self> {
        let palette: Vec<Colour> = data.palette.iter().map(|&c| Colour(c)).collect();
        let [x, y, z] = data.origin;
        Self::parse(&data.layers, &palette, IVec3::new(x, y, z))
    }

    /// A box of `size` cells whose contents come from `f`, called with
    /// each cell's offset from `origin`.
    pub fn from_fn(origin: IVec3, size: IVec3, f: impl Fn(IVec3) -> Option<Colour>) -> Self {
        assert!(size.min_element() >= 0, "negative block array size {size}");
        let mut cells = Vec::with_capacity((size.x * size.y * size.z) as usize);
        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    cells.push(f(IVec3::new(x, y, z)));
                }
            }
        }
        let mut palette: Vec<Colour> = Vec::new();
        for colour in cells.iter().flatten() {
            if !palette.contains(colour) {
                palette.push(*colour);
            }
        }
        Self {
            state: BaseSpriteState::at(origin),
            size,
            cells,
            palette,
            visible: true,
        }
    }

    /// A single solid layer at height `z`.
    pub fn slab(min: IVec3, width: i32, depth: i32, colour: Colour) -> Self {
        Self::from_fn(min, IVec3::new(width, depth, 1), |_| Some(colour))
    }

    fn parse<L, S>(layers: &[L], palette: &[Colour], origin: IVec3) -> anyhow::Result<Self>
    where
        L: AsRef<[S]>,
        S: AsRef<str>,
    {
        let Some(first) = layers.first() else {
            bail!("no layers");
        };
        let ny = first.as_ref().len();
        let nx = first
            .as_ref()
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        let nz = layers.len();
        let mut cells = vec![None; nx * ny * nz];
        for (iz, layer) in layers.iter().enumerate() {
            let rows = layer.as_ref();
            if rows.len() != ny {
                bail!("layer {iz} has {} rows, expected {ny}", rows.len());
            }
            for (row, text) in rows.iter().enumerate() {
                let text = text.as_ref();
                if text.chars().count() != nx {
                    bail!("layer {iz} row {row} is not {nx} characters wide");
                }
                let iy = ny - 1 - row;
                for (ix, c) in text.chars().enumerate() {
                    if c == ' ' {
                        continue;
                    }
                    let index = c
                        .to_digit(36)
                        .ok_or_else(|| anyhow!("layer {iz} row {row}: '{c}' is not a palette index"))?;
                    let colour = palette.get(index as usize).ok_or_else(|| {
                        anyhow!("layer {iz} row {row}: palette has no entry {index}")
                    })?;
                    cells[(iz * ny + iy) * nx + ix] = Some(*colour);
                }
            }
        }
        Ok(Self {
            state: BaseSpriteState::at(origin),
            size: IVec3::new(nx as i32, ny as i32, nz as i32),
            cells,
            palette: palette.to_vec(),
            visible: true,
        })
    }

    pub fn origin(&self) -> IVec3 {
        self.position()
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    fn index(&self, cell: IVec3) -> Option<usize> {
        let local = cell - self.origin();
        if local.min_element() < 0 || local.cmpge(self.size).any() {
            return None;
        }
        Some(((local.z * self.size.y + local.y) * self.size.x + local.x) as usize)
    }

    pub fn colour_at(&self, cell: IVec3) -> Option<Colour> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Whether `cell` holds a block. Cells outside the array never do.
    pub fn occupied(&self, cell: IVec3) -> bool {
        self.colour_at(cell).is_some()
    }

    /// World heights of the occupied cells in the column at `x, y`,
    /// lowest first.
    pub fn column(&self, x: i32, y: i32) -> Vec<i32> {
        let origin = self.origin();
        (origin.z..origin.z + self.size.z)
            .filter(|&z| self.occupied(IVec3::new(x, y, z)))
            .collect()
    }

    /// The top occupied height of the column at `x, y`.
    pub fn height(&self, x: i32, y: i32) -> Option<i32> {
        self.column(x, y).last().copied()
    }

    /// Move the whole array. Contents are stored relative to the origin
    /// so this costs nothing per block.
    pub fn shift_pos(&mut self, delta: IVec3) {
        let origin = self.origin();
        self.set_position(origin + delta);
    }

    /// Recolour occupied cells from a sub image in the same layout as
    /// the constructor's rows, anchored with its south west corner at
    /// `min`. Empty cells stay empty.
    pub fn paint<S: AsRef<str>>(&mut self, rows: &[S], min: IVec3) {
        let height = rows.len() as i32;
        for (row, text) in rows.iter().enumerate() {
            let y = min.y + height - 1 - row as i32;
            for (ix, c) in text.as_ref().chars().enumerate() {
                if c == ' ' {
                    continue;
                }
                let colour = c
                    .to_digit(36)
                    .and_then(|index| self.palette.get(index as usize))
                    .copied()
                    .unwrap_or_else(|| panic!("paint: '{c}' is not a palette index"));
                let cell = IVec3::new(min.x + ix as i32, y, min.z);
                if let Some(index) = self.index(cell)
                    && self.cells[index].is_some()
                {
                    self.cells[index] = Some(colour);
                }
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hidden arrays still collide, they are only skipped when drawing.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Sprite for BlockArray {
    fn hits(&self, cell: IVec3) -> bool {
        self.occupied(cell)
    }

    fn is_platform(&self, cell: IVec3) -> bool {
        self.occupied(cell - IVec3::Z)
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        false
    }

    fn draw(&self, list: &mut DrawList) {
        if !self.visible {
            return;
        }
        let origin = self.origin();
        for z in 0..self.size.z {
            for y in (0..self.size.y).rev() {
                for x in 0..self.size.x {
                    let cell = origin + IVec3::new(x, y, z);
                    if let Some(colour) = self.colour_at(cell) {
                        list.push_block(cell, colour);
                    }
                }
            }
        }
    }
}
