use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use anyhow::anyhow;
use anyhow::bail;
use mq_engine::BitBuffer;
use mq_engine::ItemSet;
use mq_engine::room::Entry;
use strum::EnumCount;

use crate::Rune;

pub const SAVE_VERSION: u32 = 1;

const VERSION_BITS: u32 = 8;
const ROOM_INDEX_BITS: u32 = 6;
const ENTRY_BITS: u32 = 4;
/// Entry field value for a game started from the room's own position.
const ENTRY_GAME_START: u32 = (1 << ENTRY_BITS) - 1;
const DEATH_BITS: u32 = 16;
const ROOM_COUNT_BITS: u32 = 6;
const RECORD_LEN_BITS: u32 = 12;

/// Everything needed to resume a game: where the player is, global
/// progress and one durable record per room in registry order.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveState {
    pub version: u32,
    pub room_index: usize,
    pub entry: Entry,
    pub items: ItemSet,
    pub deaths: u16,
    pub records: Vec<BitBuffer>,
}

fn read_field(buffer: &mut BitBuffer, bits: u32, what: &str) -> anyhow::Result<u32> {
    buffer
        .read(bits)
        .ok_or_else(|| anyhow!("save data ends before the {what}"))
}

impl SaveState {
    pub fn to_buffer(&self) -> BitBuffer {
        let mut buffer = BitBuffer::new();
        buffer.write(self.version, VERSION_BITS);
        buffer.write(self.room_index as u32, ROOM_INDEX_BITS);
        let entry = match self.entry {
            Entry::GameStart => ENTRY_GAME_START,
            Entry::Door(index) => {
                assert!(
                    (index as u32) < ENTRY_GAME_START,
                    "entry {index} does not fit a save"
                );
                index as u32
            }
        };
        buffer.write(entry, ENTRY_BITS);
        let item_mask = (1u32 << Rune::COUNT) - 1;
        buffer.write(self.items.bits() & item_mask, Rune::COUNT as u32);
        buffer.write(self.deaths as u32, DEATH_BITS);
        buffer.write(self.records.len() as u32, ROOM_COUNT_BITS);
        for record in &self.records {
            buffer.write(record.len() as u32, RECORD_LEN_BITS);
            buffer.append(record);
        }
        buffer
    }

    /// Parse the header and split out the room records. Room records are
    /// not interpreted here, each room validates its own.
    pub fn from_buffer(buffer: &mut BitBuffer) -> anyhow::Result<Self> {
        let version = read_field(buffer, VERSION_BITS, "version")?;
        if version == 0 || version > SAVE_VERSION {
            bail!("unsupported save version {version}");
        }
        let room_index = read_field(buffer, ROOM_INDEX_BITS, "room index")? as usize;
        let entry = match read_field(buffer, ENTRY_BITS, "entry")? {
            ENTRY_GAME_START => Entry::GameStart,
            index => Entry::Door(index as usize),
        };
        let items = ItemSet::from_bits(read_field(buffer, Rune::COUNT as u32, "items")?);
        let deaths = read_field(buffer, DEATH_BITS, "death count")? as u16;
        let count = read_field(buffer, ROOM_COUNT_BITS, "room count")?;
        let mut records = Vec::with_capacity(count as usize);
        for index in 0..count {
            let len = read_field(buffer, RECORD_LEN_BITS, "record length")?;
            let record = buffer
                .sub_buffer(len as usize)
                .ok_or_else(|| anyhow!("room record {index} is truncated"))?;
            records.push(record);
        }
        Ok(Self {
            version,
            room_index,
            entry,
            items,
            deaths,
            records,
        })
    }
}

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_buffer())
    }
}

impl FromStr for SaveState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut buffer: BitBuffer = s.trim().parse().context("decoding save string")?;
        Self::from_buffer(&mut buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SaveState {
        let mut a = BitBuffer::new();
        a.write_bool(true);
        let mut b = BitBuffer::new();
        b.write(2, 2);
        b.write_bool(false);
        let mut items = ItemSet::default();
        items.insert(Rune::Water.item());
        SaveState {
            version: SAVE_VERSION,
            room_index: 3,
            entry: Entry::Door(1),
            items,
            deaths: 7,
            records: vec![a, BitBuffer::new(), b],
        }
    }

    #[test]
    fn string_form_keeps_every_field() {
        let state = sample();
        let decoded: SaveState = state.to_string().parse().unwrap();
        assert_eq!(decoded.room_index, 3);
        assert_eq!(decoded.entry, Entry::Door(1));
        assert_eq!(decoded.items, state.items);
        assert_eq!(decoded.deaths, 7);
        assert_eq!(decoded.records, state.records);
    }

    #[test]
    fn game_start_entry_survives() {
        let mut state = sample();
        state.entry = Entry::GameStart;
        let decoded: SaveState = state.to_string().parse().unwrap();
        assert_eq!(decoded.entry, Entry::GameStart);
    }

    #[test]
    fn rejects_unknown_versions() {
        let mut state = sample();
        state.version = SAVE_VERSION + 1;
        assert!(state.to_string().parse::<SaveState>().is_err());
        state.version = 0;
        assert!(state.to_string().parse::<SaveState>().is_err());
    }

    #[test]
    fn rejects_truncated_records() {
        let mut buffer = sample().to_buffer();
        let mut cut = buffer.sub_buffer(buffer.len() - 2).unwrap();
        assert!(SaveState::from_buffer(&mut cut).is_err());
        buffer.rewind();
        assert!(SaveState::from_buffer(&mut buffer).is_ok());
    }

    #[test]
    fn rejects_garbage_strings() {
        assert!("".parse::<SaveState>().is_err());
        assert!("not a save!".parse::<SaveState>().is_err());
        assert!("0".parse::<SaveState>().is_err());
    }
}
