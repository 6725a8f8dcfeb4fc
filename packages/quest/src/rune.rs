use mq_engine::ItemSet;
use strum::EnumCount;
use strum::EnumIter;
use strum::IntoEnumIterator;
use strum::IntoStaticStr;

/// The three runes of the quest. Collecting all of them opens the way
/// out of the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
pub enum Rune {
    Earth,
    Water,
    Fire,
}

impl Rune {
    pub fn item(self) -> u8 {
        self as u8
    }

    pub fn from_item(item: u8) -> Option<Self> {
        Rune::iter().find(|rune| rune.item() == item)
    }

    pub fn all_collected(items: ItemSet) -> bool {
        Rune::iter().all(|rune| items.contains(rune.item()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_runes_needed() {
        let mut items = ItemSet::default();
        items.insert(Rune::Earth.item());
        items.insert(Rune::Fire.item());
        assert!(!Rune::all_collected(items));
        items.insert(Rune::Water.item());
        assert!(Rune::all_collected(items));
        assert_eq!(Rune::COUNT, 3);
        assert_eq!(Rune::from_item(2), Some(Rune::Fire));
        assert_eq!(<&'static str>::from(Rune::Water), "Water");
    }
}
