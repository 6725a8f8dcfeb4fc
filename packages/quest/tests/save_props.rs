//! Save strings from outside the game must never take it down.

use mq_engine::BitBuffer;
use mq_quest::GameConfig;
use mq_quest::GameManager;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,64}") {
        let mut manager = GameManager::new(GameConfig::default()).unwrap();
        let before = manager.save_string();
        if !manager.restore(&text) {
            prop_assert_eq!(manager.save_string(), before);
        }
    }

    #[test]
    fn arbitrary_bits_never_panic(bits in prop::collection::vec(any::<bool>(), 0..256)) {
        let mut buffer = BitBuffer::new();
        for bit in bits {
            buffer.write_bit(bit);
        }
        let mut manager = GameManager::new(GameConfig::default()).unwrap();
        manager.restore(&buffer.to_string());
        manager.advance(Default::default());
        prop_assert!(manager.story().sprites().player().is_some());
    }
}
