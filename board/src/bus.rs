use common::mem::{BOTH_LANES, byte_lane};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Byte,
    Word,
}

impl Size {
    // Data lines (UDS/LDS) an access of this size drives at `addr`.
    pub fn lanes(self, addr: u32) -> u16 {
        match self {
            Size::Byte => byte_lane(addr),
            Size::Word => BOTH_LANES,
        }
    }
}

// What a window's device looks like from the data bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceWidth {
    Bits8,
    Bits16,
}
