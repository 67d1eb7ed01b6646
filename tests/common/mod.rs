// Shared helpers: slot-level invariants checked from the raw region bytes

use refbuf::RefBuffer;
use refbuf::layout::{HEADER_SIZE, INLINE_CAPACITY, POINTER_SIZE, SLOT_SIZE};

/// A slot decoded straight from the region, without going through the crate.
struct RawSlot {
    used: usize,
    direct: bool,
    zeroed: bool,
}

impl RawSlot {
    fn parse(region: &[u8], index: usize) -> Self {
        let start = HEADER_SIZE + index * SLOT_SIZE;
        let bytes = &region[start..start + SLOT_SIZE];
        let trailer = bytes[SLOT_SIZE - 1];
        let direct = trailer & 0x80 != 0;
        let used = if direct {
            (trailer & 0x7F) as usize
        } else {
            let len = i32::from_le_bytes(bytes[POINTER_SIZE..].try_into().unwrap());
            assert!(len >= 0, "slot {index}: negative reference length");
            len as usize
        };
        RawSlot {
            used,
            direct,
            zeroed: bytes.iter().all(|&b| b == 0),
        }
    }

    fn sealed(&self) -> bool {
        self.used > 0 && (!self.direct || self.used == INLINE_CAPACITY)
    }
}

/// Checks the header and slots of `buffer` against the ring invariants:
///
/// 1. the read slot holds unread data unless the buffer is empty;
/// 2. the write slot has free space unless the buffer is full;
/// 3. if some slot is completely empty, so is the write slot or the one
///    after it;
///
/// plus: every slot outside the read..=write span is zeroed, and
/// `is_empty`/`is_full` agree with the raw bytes.
pub fn check_slot_invariants(buffer: &RefBuffer<'_, '_>) -> Result<(), String> {
    let n = buffer.slot_count();
    if n == 0 {
        return Ok(());
    }

    let region = buffer.region();
    let read_pos = u32::from_le_bytes(region[0..4].try_into().unwrap()) as usize;
    let r = u16::from_le_bytes(region[4..6].try_into().unwrap()) as usize;
    let w = u16::from_le_bytes(region[6..8].try_into().unwrap()) as usize;
    if r >= n || w >= n {
        return Err(format!("indices out of range: r={r} w={w} n={n}"));
    }

    let slots: Vec<RawSlot> = (0..n).map(|i| RawSlot::parse(region, i)).collect();
    let next_w = (w + 1) % n;
    let empty = r == w && slots[r].used == 0;
    let full = slots[w].sealed() && next_w == r;

    if buffer.is_empty() != empty {
        return Err(format!("is_empty() = {} but region says {empty}", buffer.is_empty()));
    }
    if buffer.is_full() != full {
        return Err(format!("is_full() = {} but region says {full}", buffer.is_full()));
    }

    if !empty && slots[r].used <= read_pos {
        return Err(format!(
            "read slot {r} has no unread data (used {}, read_pos {read_pos})",
            slots[r].used
        ));
    }
    if empty && read_pos != 0 {
        return Err(format!("empty buffer with read_pos {read_pos}"));
    }

    if !full && slots[w].sealed() {
        return Err(format!("write slot {w} is sealed but the buffer is not full (r={r})"));
    }

    let any_empty = slots.iter().any(|slot| slot.used == 0);
    if any_empty && slots[w].used != 0 && slots[next_w].used != 0 {
        return Err(format!("an empty slot exists but neither slot {w} nor {next_w} is empty"));
    }

    let span = if empty { 0 } else { (w + n - r) % n + 1 };
    for step in span..n {
        let index = (r + step) % n;
        if !slots[index].zeroed {
            return Err(format!("slot {index} lies outside the occupied span but is not zeroed"));
        }
    }

    Ok(())
}
