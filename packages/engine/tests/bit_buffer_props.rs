//! Property tests for the save bit buffer: every written field reads
//! back exactly, and the printable form preserves the bit sequence.

use mq_engine::BitBuffer;
use proptest::prelude::*;

fn field_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=32).prop_flat_map(|bits| {
        let max = if bits == 32 { u32::MAX } else { (1u32 << bits).wrapping_sub(1) };
        (0..=max, Just(bits))
    })
}

fn write_fields(fields: &[(u32, u32)]) -> BitBuffer {
    let mut buffer = BitBuffer::new();
    for &(value, bits) in fields {
        buffer.write(value, bits);
    }
    buffer
}

proptest! {
    #[test]
    fn fields_read_back_in_order(fields in prop::collection::vec(field_strategy(), 0..40)) {
        let mut buffer = write_fields(&fields);
        let total: usize = fields.iter().map(|&(_, bits)| bits as usize).sum();
        prop_assert_eq!(buffer.len(), total);
        for &(value, bits) in &fields {
            let before = buffer.num_bits_to_read();
            prop_assert_eq!(buffer.read(bits), Some(value));
            prop_assert_eq!(buffer.num_bits_to_read(), before - bits as usize);
        }
        prop_assert_eq!(buffer.read_bit(), None);
    }

    #[test]
    fn string_form_preserves_bits(fields in prop::collection::vec(field_strategy(), 0..40)) {
        let buffer = write_fields(&fields);
        let text = buffer.to_string();
        let mut decoded: BitBuffer = text.parse().unwrap();
        prop_assert_eq!(&decoded, &buffer);
        for &(value, bits) in &fields {
            prop_assert_eq!(decoded.read(bits), Some(value));
        }
        prop_assert_eq!(decoded.num_bits_to_read(), 0);
    }

    #[test]
    fn over_reads_fail_without_consuming(bits in 1u32..=32, written in 0u32..32) {
        prop_assume!(written < bits);
        let mut buffer = BitBuffer::new();
        for _ in 0..written {
            buffer.write_bit(true);
        }
        prop_assert_eq!(buffer.read(bits), None);
        prop_assert_eq!(buffer.num_bits_to_read(), written as usize);
    }
}
