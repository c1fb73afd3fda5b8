use crate::misc::IsEven;

use bytemuck::cast_slice_mut;

pub const UPPER_LANE: u16 = 0xff00;
pub const LOWER_LANE: u16 = 0x00ff;
pub const BOTH_LANES: u16 = UPPER_LANE | LOWER_LANE;

// Byte lane a byte address is carried on. The bus is big-endian, so even
// addresses travel on D15..D8.
pub fn byte_lane(addr: u32) -> u16 {
    if addr.is_even() { UPPER_LANE } else { LOWER_LANE }
}

// Moves a byte onto its lane within a bus word.
pub fn byte_to_lane(addr: u32, val: u8) -> u16 {
    if addr.is_even() { (val as u16) << u8::BITS } else { val as u16 }
}

pub fn byte_from_lane(addr: u32, word: u16) -> u8 {
    if addr.is_even() { (word >> u8::BITS) as u8 } else { word as u8 }
}

// View a byte buffer as (upper, lower) pairs. None if the length is odd.
pub fn as_lane_pairs_mut(input: &mut [u8]) -> Option<&mut [[u8; 2]]> {
    if input.len() % 2 != 0 {
        return None;
    }
    Some(cast_slice_mut(input))
}

////////////////////////////////////////////////////////////////////////////////

pub fn read_be_word(mem: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([mem[offset], mem[offset + 1]])
}

// Only the lanes set in `mask` are stored.
pub fn write_be_word(mem: &mut [u8], offset: usize, val: u16, mask: u16) {
    let [upper, lower] = val.to_be_bytes();
    if mask & UPPER_LANE != 0 {
        mem[offset] = upper;
    }
    if mask & LOWER_LANE != 0 {
        mem[offset + 1] = lower;
    }
}
