// The 68000 drives A1..A23; everything above is ignored.
pub const ADDR_BITS: u32 = 24;
pub const ADDR_MASK: u32 = (1 << ADDR_BITS) - 1;
pub const ADDR_SPACE: u32 = 1 << ADDR_BITS; // Exclusive, note type

pub const RAM_START: u32 = 0x00_0000;
pub const RAM_SIZE: u32 = 0x20_0000;

pub const ROM0_START: u32 = 0x20_0000;
pub const ROM1_START: u32 = 0x40_0000;
pub const ROM_BANK_SIZE: u32 = 0x2000;
pub const ROM_REGION_SIZE: u32 = 2 * ROM_BANK_SIZE;

pub const SERIAL_START: u32 = 0x60_0000;
pub const SERIAL_SIZE: u32 = 0x8;
pub const TIMER_START: u32 = 0x80_0000;
pub const TIMER_SIZE: u32 = 0x4;
// Both chips are only partially decoded and repeat across their whole slot.
pub const IO_SLOT_SIZE: u32 = 0x20_0000;

pub const PAGE_MAP_START: u32 = 0xa0_0000;
pub const SEGMENT_MAP_START: u32 = 0xc0_0000;
pub const MAP_STUB_SIZE: u32 = 0x20_0000;

pub const SWITCHES_START: u32 = 0xe0_0000;
pub const SWITCHES_SIZE: u32 = 0x20_0000;
// Bypasses the power-on self test.
pub const SWITCHES_VALUE: u16 = 0x7c00;

// Initial SSP and PC.
pub const BOOT_SHADOW_LEN: usize = 8;

pub const PROM_REGION_SIZE: usize = 0x700;

// Unconnected data lines float high.
pub const OPEN_BUS: u16 = 0xffff;

pub const XTAL_HZ: u32 = 19_660_800;
pub const CPU_CLOCK_HZ: u32 = XTAL_HZ / 2;
pub const TIMER_CLOCK_HZ: u32 = XTAL_HZ / 8;
