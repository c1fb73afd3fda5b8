use common::mem::{read_be_word, write_be_word};

use log::trace;
use rom::RomImage;

// Word-addressed big-endian storage. Backs main memory and the two MMU map
// windows, which are never consulted by the decoder.
pub struct Ram {
    name: &'static str,
    mem: Vec<u8>,
}

impl Ram {
    pub fn new(name: &'static str, size: u32) -> Ram {
        Ram { name, mem: vec![0; size as usize] }
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    // Offsets come from the decoder and are always inside the window.
    pub(crate) fn read(&self, offset: u32) -> u16 {
        read_be_word(&self.mem, offset as usize)
    }

    pub(crate) fn write(&mut self, offset: u32, val: u16, mask: u16) {
        trace!("{}: writing {val:#06x} to {offset:#x} (mask {mask:#06x})", self.name);
        write_be_word(&mut self.mem, offset as usize, val, mask);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mem
    }

    // Used by the boot shadow copy; not a bus cycle.
    pub(crate) fn load(&mut self, offset: usize, data: &[u8]) {
        self.mem[offset..offset + data.len()].copy_from_slice(data);
    }
}

////////////////////////////////////////////////////////////////////////////////

// One bank of the program ROM region.
pub struct RomBank {
    index: usize,
}

impl RomBank {
    pub fn new(index: usize) -> RomBank {
        RomBank { index }
    }

    // Locations a short image doesn't cover read as erased EPROM.
    pub fn read(&self, image: &RomImage, offset: u32) -> u16 {
        let bank = image.bank(self.index);
        let offset = offset as usize;
        let at = |i: usize| bank.get(i).copied().unwrap_or(0xff);
        u16::from_be_bytes([at(offset), at(offset + 1)])
    }
}
