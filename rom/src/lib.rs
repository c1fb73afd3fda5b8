use std::fmt;
use std::path::Path;

use common::constants::{PROM_REGION_SIZE, ROM_BANK_SIZE, ROM_REGION_SIZE};
use common::mem::as_lane_pairs_mut;

use log::{debug, trace};
use sha1::{Digest, Sha1};
use thiserror::Error;

pub type Checksum = [u8; 20];

#[derive(Debug, Error)]
pub enum RomError {
    #[error("Unable to read {name}: {source}")]
    Io {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is {actual} bytes, expected {expected}")]
    WrongSize {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{name} checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: &'static str,
        expected: String,
        actual: String,
    },

    #[error("Interleaved halves differ in length ({even} even, {odd} odd)")]
    LaneMismatch { even: usize, odd: usize },

    #[error("{name} doesn't fit in a {region:#x} byte region at {offset:#x}")]
    Overflow {
        name: &'static str,
        offset: usize,
        region: usize,
    },
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

////////////////////////////////////////////////////////////////////////////////

// Immutable once built. The checksum covers the assembled bytes, not the
// individual blobs.
#[derive(Clone, PartialEq, Eq)]
pub struct RomImage {
    bytes: Box<[u8]>,
    checksum: Checksum,
}

impl RomImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> RomImage {
        let bytes = bytes.into().into_boxed_slice();
        let checksum = Sha1::digest(&bytes).into();
        RomImage { bytes, checksum }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn checksum_hex(&self) -> String {
        hex(&self.checksum)
    }

    // Whatever part of the bank the image actually covers; may be short or
    // empty for a truncated image.
    pub fn bank(&self, index: usize) -> &[u8] {
        let bank_size = ROM_BANK_SIZE as usize;
        let start = (index * bank_size).min(self.bytes.len());
        let end = (start + bank_size).min(self.bytes.len());
        &self.bytes[start..end]
    }
}

impl fmt::Debug for RomImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RomImage")
            .field("len", &self.bytes.len())
            .field("sha1", &self.checksum_hex())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////

// How a blob lands in its region. Even/Odd blobs each supply one byte of
// every 16-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    Even,
    Odd,
    Linear,
}

#[derive(Debug, Clone, Copy)]
pub struct RomBlob {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
    pub load: Load,
    pub sha1: &'static str,
}

impl RomBlob {
    const fn new(name: &'static str, offset: usize, len: usize, load: Load, sha1: &'static str) -> Self {
        RomBlob { name, offset, len, load, sha1 }
    }

    fn footprint(&self) -> usize {
        match self.load {
            Load::Even | Load::Odd => 2 * self.len,
            Load::Linear => self.len,
        }
    }
}

pub const PROGRAM_BLOBS: [RomBlob; 4] = [
    RomBlob::new("23-0009-01c.a4", 0x0000, 0x1000, Load::Even, "59587cb1c151bfd0d69e708716ed3b0a78aa85ea"),
    RomBlob::new("23-0008-01c.a1", 0x0000, 0x1000, Load::Odd, "05e10f1c594e2acd369949b873a524a9cc37829f"),
    RomBlob::new("33-01.a6", 0x2000, 0x1000, Load::Even, "ad15c74cd8edef9d9716ad0d16f7a95ff2af901f"),
    RomBlob::new("33-00.a3", 0x2000, 0x1000, Load::Odd, "12e3314e92f800b3c4ebdf55dcd5351230224788"),
];

// Lookup tables for the glue logic; not visible on the CPU bus.
pub const PROM_BLOBS: [RomBlob; 6] = [
    RomBlob::new("23-0010-00.a15", 0x000, 0x020, Load::Linear, "9b268792b28d858d6b6a1b6c4148af88a8d6b735"),
    RomBlob::new("23-0011-00.a14", 0x100, 0x200, Load::Linear, "fca99f9c5afc630ac67cbd4e5ba4e5242b826848"),
    RomBlob::new("23-0012-00.a16", 0x300, 0x020, Load::Linear, "0d3346cb3b647fa2475bd7b4fa36ea6ecfdaf805"),
    RomBlob::new("23-0034-00.e4", 0x400, 0x100, Load::Linear, "459bd2d8dc8c4b1c0a529984ae8e38d0c81a084c"),
    RomBlob::new("23-0037-00.e7", 0x500, 0x100, Load::Linear, "136a74567094d8462c3a4de1b7e6eb8f30fe71ca"),
    RomBlob::new("23-0038-00.f1", 0x600, 0x100, Load::Linear, "f30a8d5d744bfc25493cd1e92961bbb75f9e0d05"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verify {
    Checksums,
    Skip,
}

////////////////////////////////////////////////////////////////////////////////

pub fn interleave(even: &[u8], odd: &[u8]) -> Result<Vec<u8>, RomError> {
    if even.len() != odd.len() {
        return Err(RomError::LaneMismatch { even: even.len(), odd: odd.len() });
    }
    let mut out = vec![0u8; even.len() * 2];
    let pairs =
        as_lane_pairs_mut(&mut out).ok_or_else(|| RomError::LaneMismatch { even: even.len(), odd: odd.len() })?;
    for (pair, (e, o)) in pairs.iter_mut().zip(even.iter().zip(odd.iter())) {
        *pair = [*e, *o];
    }
    Ok(out)
}

fn place(region: &mut [u8], blob: &RomBlob, data: &[u8]) -> Result<(), RomError> {
    let region_len = region.len();
    let overflow = || RomError::Overflow { name: blob.name, offset: blob.offset, region: region_len };

    let end = blob.offset + blob.footprint();
    if end > region_len {
        return Err(overflow());
    }
    let dest = &mut region[blob.offset..end];
    match blob.load {
        Load::Linear => dest.copy_from_slice(data),
        Load::Even | Load::Odd => {
            let lane = if blob.load == Load::Even { 0 } else { 1 };
            let pairs = as_lane_pairs_mut(dest).ok_or_else(overflow)?;
            for (pair, byte) in pairs.iter_mut().zip(data.iter()) {
                pair[lane] = *byte;
            }
        }
    }
    Ok(())
}

fn check(blob: &RomBlob, data: &[u8], verify: Verify) -> Result<(), RomError> {
    if data.len() != blob.len {
        return Err(RomError::WrongSize { name: blob.name, expected: blob.len, actual: data.len() });
    }
    if verify == Verify::Checksums {
        let actual = hex(&Sha1::digest(data));
        if actual != blob.sha1 {
            return Err(RomError::ChecksumMismatch {
                name: blob.name,
                expected: blob.sha1.to_string(),
                actual,
            });
        }
    }
    Ok(())
}

fn build_region<F>(size: usize, blobs: &[RomBlob], fetch: &mut F, verify: Verify) -> Result<RomImage, RomError>
where
    F: FnMut(&RomBlob) -> Result<Vec<u8>, RomError>,
{
    let mut region = vec![0u8; size];
    for blob in blobs {
        let data = fetch(blob)?;
        check(blob, &data, verify)?;
        place(&mut region, blob, &data)?;
        trace!("Rom: placed {} at {:#06x} ({:?})", blob.name, blob.offset, blob.load);
    }
    Ok(RomImage::new(region))
}

pub struct RomSet {
    pub program: RomImage,
    pub proms: RomImage,
}

impl RomSet {
    pub fn from_blobs<F>(mut fetch: F, verify: Verify) -> Result<RomSet, RomError>
    where
        F: FnMut(&RomBlob) -> Result<Vec<u8>, RomError>,
    {
        let program = build_region(ROM_REGION_SIZE as usize, &PROGRAM_BLOBS, &mut fetch, verify)?;
        let proms = build_region(PROM_REGION_SIZE, &PROM_BLOBS, &mut fetch, verify)?;
        debug!("Rom: program {}, proms {}", program.checksum_hex(), proms.checksum_hex());
        Ok(RomSet { program, proms })
    }

    pub fn load_dir(dir: &Path, verify: Verify) -> Result<RomSet, RomError> {
        Self::from_blobs(
            |blob| std::fs::read(dir.join(blob.name)).map_err(|source| RomError::Io { name: blob.name, source }),
            verify,
        )
    }
}
