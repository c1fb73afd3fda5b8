use std::fmt;

use common::constants::*;
use common::mem::{BOTH_LANES, UPPER_LANE};
use common::misc::{ToBusAddr, word_align};

use crate::bus::{DeviceWidth, Size};
use crate::error::{BoardError, WireError};

use derive_more::IsVariant;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceId {
    Ram,
    Rom0,
    Rom1,
    Serial,
    Timer,
    PageMap,
    SegmentMap,
    Switches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Access {
    ReadWrite,
    // Writes are dropped before they reach the device.
    ReadOnly,
}

// A device's slot in the address space. The device itself occupies `size`
// bytes; partial decoding repeats it every `mirror` bytes across `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow {
    pub name: &'static str,
    pub base: u32,
    pub size: u32,
    pub mirror: u32,
    pub span: u32,
    pub width: DeviceWidth,
    pub data_mask: u16,
    pub access: Access,
    pub device: DeviceId,
}

impl AddressWindow {
    pub const fn new(name: &'static str, base: u32, size: u32, device: DeviceId) -> Self {
        AddressWindow {
            name,
            base,
            size,
            mirror: size,
            span: size,
            width: DeviceWidth::Bits16,
            data_mask: BOTH_LANES,
            access: Access::ReadWrite,
            device,
        }
    }

    pub const fn mirrored(mut self, period: u32, span: u32) -> Self {
        self.mirror = period;
        self.span = span;
        self
    }

    // Device only connected to some of the data lines.
    pub const fn on_lanes(mut self, data_mask: u16, width: DeviceWidth) -> Self {
        self.data_mask = data_mask;
        self.width = width;
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    // Exclusive.
    pub fn end(&self) -> u32 {
        self.base + self.span
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base && addr < self.end()
    }

    pub fn offset_of(&self, addr: u32) -> Option<u32> {
        if !self.contains(addr) {
            return None;
        }
        let offset = (addr - self.base) % self.mirror;
        (offset < self.size).then_some(offset)
    }

    fn validate(&self) -> Result<(), WireError> {
        if self.size == 0 || self.span == 0 {
            return Err(WireError::EmptyWindow(self.name));
        }
        if self.mirror < self.size || self.span % self.mirror != 0 {
            return Err(WireError::BadMirror(self.name));
        }
        if (self.base as u64) + (self.span as u64) > ADDR_SPACE as u64 {
            return Err(WireError::OutOfRange(self.name));
        }
        Ok(())
    }
}

impl fmt::Display for AddressWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:06x}-{:06x} {:<12}", self.base, self.end() - 1, self.name)?;
        if self.mirror != self.span {
            write!(f, " {:#x} bytes every {:#x}", self.size, self.mirror)?;
        }
        if self.width == DeviceWidth::Bits8 {
            write!(f, " 8 bit")?;
        }
        if self.data_mask != BOTH_LANES {
            write!(f, " lanes {:#06x}", self.data_mask)?;
        }
        if self.access.is_read_only() {
            write!(f, " (ro)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub window: AddressWindow,
    pub offset: u32,
}

////////////////////////////////////////////////////////////////////////////////

// Ordered, non-overlapping window table.
#[derive(Debug, Clone)]
pub struct AddressMap {
    windows: Vec<AddressWindow>,
}

impl AddressMap {
    pub fn new(mut windows: Vec<AddressWindow>) -> Result<AddressMap, WireError> {
        for window in &windows {
            window.validate()?;
        }
        windows.sort_by_key(|w| w.base);
        for pair in windows.windows(2) {
            if pair[0].end() > pair[1].base {
                return Err(WireError::Overlap(pair[0].name, pair[1].name));
            }
        }
        debug!("AddressMap: {} windows", windows.len());
        Ok(AddressMap { windows })
    }

    pub fn ft68m() -> Result<AddressMap, WireError> {
        AddressMap::new(vec![
            AddressWindow::new("ram", RAM_START, RAM_SIZE, DeviceId::Ram),
            AddressWindow::new("rom0", ROM0_START, ROM_BANK_SIZE, DeviceId::Rom0).read_only(),
            AddressWindow::new("rom1", ROM1_START, ROM_BANK_SIZE, DeviceId::Rom1).read_only(),
            AddressWindow::new("mpsc", SERIAL_START, SERIAL_SIZE, DeviceId::Serial)
                .mirrored(SERIAL_SIZE, IO_SLOT_SIZE)
                .on_lanes(UPPER_LANE, DeviceWidth::Bits8),
            AddressWindow::new("stc", TIMER_START, TIMER_SIZE, DeviceId::Timer).mirrored(TIMER_SIZE, IO_SLOT_SIZE),
            AddressWindow::new("page map", PAGE_MAP_START, MAP_STUB_SIZE, DeviceId::PageMap),
            AddressWindow::new("segment map", SEGMENT_MAP_START, MAP_STUB_SIZE, DeviceId::SegmentMap),
            AddressWindow::new("switches", SWITCHES_START, SWITCHES_SIZE, DeviceId::Switches).read_only(),
        ])
    }

    pub fn windows(&self) -> &[AddressWindow] {
        &self.windows
    }

    pub fn window(&self, device: DeviceId) -> Option<&AddressWindow> {
        self.windows.iter().find(|w| w.device == device)
    }

    pub fn resolve(&self, addr: u32, size: Size) -> Result<Resolved, BoardError> {
        let mut addr = addr.to_bus_addr();
        if size == Size::Word {
            addr = word_align(addr);
        }

        let idx = self.windows.partition_point(|w| w.end() <= addr);
        if let Some(window) = self.windows.get(idx) {
            if let Some(offset) = window.offset_of(addr) {
                trace!("AddressMap: {addr:06x} -> {} + {offset:#x}", window.name);
                return Ok(Resolved { window: *window, offset });
            }
        }
        Err(BoardError::UnmappedAccess { addr })
    }
}
