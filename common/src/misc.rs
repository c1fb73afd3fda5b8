use crate::constants::ADDR_MASK;

pub trait IsEven: Copy {
    #[allow(clippy::wrong_self_convention)]
    fn is_even(self) -> bool;
}

impl IsEven for u32 {
    fn is_even(self) -> bool {
        self & 0x1 != 1
    }
}

////////////////////////////////////////////////////////////////////////////////

// What the address decoder actually sees of a CPU address.
pub trait ToBusAddr {
    fn to_bus_addr(self) -> u32;
}

impl ToBusAddr for u32 {
    fn to_bus_addr(self) -> u32 {
        self & ADDR_MASK
    }
}

// Word cycles have no A0.
pub fn word_align(addr: u32) -> u32 {
    addr & !0x1
}
