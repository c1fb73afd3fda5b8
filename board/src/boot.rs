use common::constants::BOOT_SHADOW_LEN;
use rom::RomImage;

use crate::error::BoardError;
use crate::interrupt::Processor;
use crate::memory::Ram;

use log::debug;

fn be_long(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, b| (acc << u8::BITS) | *b as u32)
}

// The 68000 fetches its initial SSP and PC from address 0, which is RAM on
// this board. On real hardware glue logic overlays the ROM there for the
// first few cycles after reset; copying the vectors has the same effect.
pub struct BootSequencer {
    len: usize,
}

impl BootSequencer {
    pub fn new(rom: &RomImage) -> Result<BootSequencer, BoardError> {
        if rom.len() < BOOT_SHADOW_LEN {
            return Err(BoardError::MalformedRomImage {
                len: rom.len(),
                reason: "too short to hold the reset vectors",
            });
        }
        Ok(BootSequencer { len: BOOT_SHADOW_LEN })
    }

    pub fn reset(&self, rom: &RomImage, ram: &mut Ram, cpu: &dyn Processor) {
        let vectors = &rom.bytes()[..self.len];
        ram.load(0, vectors);
        debug!("Boot: SSP {:#08x}, PC {:#08x}", be_long(&vectors[0..4]), be_long(&vectors[4..8]));
        cpu.reset();
    }
}
