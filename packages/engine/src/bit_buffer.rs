use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::bail;

/// Characters used by the printable save string. Each one carries six
/// bits, the first character records how many padding bits were added.
const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";
const BITS_PER_CHAR: usize = 6;

/// A growable sequence of bits read and written most significant bit
/// first. Writes append at the end, reads consume from a cursor that
/// starts at the beginning.
#[derive(Clone, Debug, Default)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
    cursor: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of bits written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_bits_to_read(&self) -> usize {
        self.len - self.cursor
    }

    /// Move the read cursor back to the first bit.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn write_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[self.len / 8] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Append the low `bits` bits of `value`. Widths above 32 and values
    /// that do not fit the width are caller errors.
    pub fn write(&mut self, value: u32, bits: u32) {
        assert!(bits <= 32, "cannot write {bits} bits from a u32");
        assert!(
            bits == 32 || value >> bits == 0,
            "value {value} does not fit in {bits} bits"
        );
        for i in (0..bits).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_bit(value);
    }

    /// Append every bit of `other`, independent of its read cursor.
    pub fn append(&mut self, other: &BitBuffer) {
        for i in 0..other.len {
            self.write_bit(other.bit_at(i));
        }
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        if self.cursor >= self.len {
            return None;
        }
        let bit = self.bit_at(self.cursor);
        self.cursor += 1;
        Some(bit)
    }

    /// Read `bits` bits as an unsigned value. None, with the cursor left
    /// in place, if fewer than `bits` remain.
    pub fn read(&mut self, bits: u32) -> Option<u32> {
        if bits > 32 || self.num_bits_to_read() < bits as usize {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..bits {
            value = (value << 1) | self.bit_at(self.cursor) as u32;
            self.cursor += 1;
        }
        Some(value)
    }

    pub fn read_bool(&mut self) -> Option<bool> {
        self.read_bit()
    }

    /// Consume the next `bits` bits into a buffer of their own.
    pub fn sub_buffer(&mut self, bits: usize) -> Option<BitBuffer> {
        if self.num_bits_to_read() < bits {
            return None;
        }
        let mut out = BitBuffer::new();
        for _ in 0..bits {
            out.write_bit(self.bit_at(self.cursor));
            self.cursor += 1;
        }
        Some(out)
    }

    fn bit_at(&self, index: usize) -> bool {
        self.bytes[index / 8] & (0x80 >> (index % 8)) != 0
    }

    fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.len = len;
        self.cursor = self.cursor.min(len);
        self.bytes.truncate(len.div_ceil(8));
        if len % 8 != 0 {
            let keep = 0xffu8 << (8 - len % 8);
            if let Some(last) = self.bytes.last_mut() {
                *last &= keep;
            }
        }
    }
}

impl PartialEq for BitBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes == other.bytes
    }
}

impl Eq for BitBuffer {}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padding = (BITS_PER_CHAR - self.len % BITS_PER_CHAR) % BITS_PER_CHAR;
        let mut out = String::with_capacity(1 + self.len.div_ceil(BITS_PER_CHAR));
        out.push(ALPHABET[padding] as char);
        let mut index = 0;
        while index < self.len {
            let mut value = 0usize;
            for offset in 0..BITS_PER_CHAR {
                let bit = index + offset < self.len && self.bit_at(index + offset);
                value = (value << 1) | bit as usize;
            }
            out.push(ALPHABET[value] as char);
            index += BITS_PER_CHAR;
        }
        f.write_str(&out)
    }
}

impl FromStr for BitBuffer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut chars = s.trim().chars();
        let header = chars.next().ok_or_else(|| anyhow!("empty save string"))?;
        let padding = decode_char(header)? as usize;
        if padding >= BITS_PER_CHAR {
            bail!("invalid padding marker '{header}'");
        }
        let mut out = BitBuffer::new();
        for c in chars {
            out.write(decode_char(c)?, BITS_PER_CHAR as u32);
        }
        if out.len < padding {
            bail!("padding marker '{header}' without payload");
        }
        let len = out.len - padding;
        out.truncate(len);
        Ok(out)
    }
}

fn decode_char(c: char) -> anyhow::Result<u32> {
    ALPHABET
        .iter()
        .position(|&a| a as char == c)
        .map(|v| v as u32)
        .ok_or_else(|| anyhow!("invalid save character '{c}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_mixed_widths() {
        let mut buffer = BitBuffer::new();
        buffer.write(5, 3);
        buffer.write_bit(true);
        buffer.write(0xdead_beef, 32);
        buffer.write(0, 0);
        buffer.write(1023, 10);
        assert_eq!(buffer.len(), 46);

        assert_eq!(buffer.read(3), Some(5));
        assert_eq!(buffer.read_bit(), Some(true));
        assert_eq!(buffer.read(32), Some(0xdead_beef));
        assert_eq!(buffer.read(0), Some(0));
        assert_eq!(buffer.num_bits_to_read(), 10);
        assert_eq!(buffer.read(11), None);
        assert_eq!(buffer.read(10), Some(1023));
        assert_eq!(buffer.read_bit(), None);
        assert_eq!(buffer.num_bits_to_read(), 0);
    }

    #[test]
    #[should_panic]
    fn rejects_oversized_values() {
        BitBuffer::new().write(8, 3);
    }

    #[test]
    fn sub_buffer_consumes_bits() {
        let mut buffer = BitBuffer::new();
        buffer.write(0b1011, 4);
        buffer.write(0b01, 2);
        let mut sub = buffer.sub_buffer(4).unwrap();
        assert_eq!(buffer.num_bits_to_read(), 2);
        assert_eq!(sub.read(4), Some(0b1011));
        assert_eq!(buffer.read(2), Some(0b01));
        assert!(buffer.sub_buffer(1).is_none());
    }

    #[test]
    fn string_form_round_trips() {
        let mut buffer = BitBuffer::new();
        buffer.write(1, 8);
        buffer.write(0x2a, 7);
        let text = buffer.to_string();
        // 15 bits pad to 18, three padding bits recorded up front
        assert_eq!(text.len(), 4);
        assert!(text.starts_with('3'));
        let mut decoded: BitBuffer = text.parse().unwrap();
        assert_eq!(decoded, buffer);
        assert_eq!(decoded.read(8), Some(1));
        assert_eq!(decoded.read(7), Some(0x2a));
        assert_eq!(decoded.read_bit(), None);
    }

    #[test]
    fn empty_buffer_has_header_only() {
        let text = BitBuffer::new().to_string();
        assert_eq!(text, "0");
        let decoded: BitBuffer = text.parse().unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn rejects_corrupt_strings() {
        assert!("".parse::<BitBuffer>().is_err());
        assert!("0a*".parse::<BitBuffer>().is_err());
        assert!("9AA".parse::<BitBuffer>().is_err());
        assert!("5".parse::<BitBuffer>().is_err());
    }
}
