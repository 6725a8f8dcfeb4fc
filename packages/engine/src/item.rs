use serde::Deserialize;
use serde::Serialize;

/// Collected quest items packed as a bit mask. Item numbering belongs to
/// the story, the engine only stores membership.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ItemSet(u32);

impl ItemSet {
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn insert(&mut self, item: u8) {
        assert!(item < 32, "item {item} does not fit an ItemSet");
        self.0 |= 1 << item;
    }

    pub fn contains(&self, item: u8) -> bool {
        item < 32 && self.0 & (1 << item) != 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
}
