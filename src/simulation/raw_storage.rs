//! Binary I/O for per-trial success counts.
//!
//! Format: 32-byte little-endian header + u16[trials], one success count per
//! trial in trial order. Enough to rebuild the full histogram offline.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0  | 4 | magic `"PRSN"` |
//! | 4  | 4 | version |
//! | 8  | 4 | prisoners |
//! | 12 | 4 | max_opens |
//! | 16 | 4 | trials |
//! | 20 | 1 | strategy tag |
//! | 21 | 3 | reserved |
//! | 24 | 8 | seed |

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use memmap2::Mmap;

use crate::types::{SimulationConfig, StrategyKind};

use super::engine::TrialResult;

/// Magic number: "PRSN" in little-endian.
pub const SUCCESS_COUNTS_MAGIC: u32 = 0x4E535250;
pub const SUCCESS_COUNTS_VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 32;

/// Decoded file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuccessCountsHeader {
    pub magic: u32,
    pub version: u32,
    pub prisoners: u32,
    pub max_opens: u32,
    pub trials: u32,
    pub strategy: StrategyKind,
    pub seed: u64,
}

impl SuccessCountsHeader {
    fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.prisoners.to_le_bytes());
        buf[12..16].copy_from_slice(&self.max_opens.to_le_bytes());
        buf[16..20].copy_from_slice(&self.trials.to_le_bytes());
        buf[20] = self.strategy.tag();
        buf[24..32].copy_from_slice(&self.seed.to_le_bytes());
        buf
    }

    fn decode(buf: &[u8]) -> Option<Self> {
        let u32_at = |off: usize| -> Option<u32> {
            Some(u32::from_le_bytes(buf.get(off..off + 4)?.try_into().ok()?))
        };
        let header = Self {
            magic: u32_at(0)?,
            version: u32_at(4)?,
            prisoners: u32_at(8)?,
            max_opens: u32_at(12)?,
            trials: u32_at(16)?,
            strategy: StrategyKind::from_tag(*buf.get(20)?)?,
            seed: u64::from_le_bytes(buf.get(24..32)?.try_into().ok()?),
        };
        if header.magic != SUCCESS_COUNTS_MAGIC || header.version != SUCCESS_COUNTS_VERSION {
            return None;
        }
        Some(header)
    }

    /// Configuration the counts were produced with.
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            prisoners: self.prisoners as usize,
            max_opens: self.max_opens as usize,
            trials: self.trials as usize,
            seed: self.seed,
        }
    }
}

fn too_large(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} does not fit the success-count format", what),
    )
}

/// Save per-trial success counts: 32-byte header + u16[trials].
pub fn save_success_counts(
    records: &[TrialResult],
    kind: StrategyKind,
    config: &SimulationConfig,
    path: &Path,
) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let header = SuccessCountsHeader {
        magic: SUCCESS_COUNTS_MAGIC,
        version: SUCCESS_COUNTS_VERSION,
        prisoners: u32::try_from(config.prisoners).map_err(|_| too_large("prisoners"))?,
        max_opens: u32::try_from(config.max_opens).map_err(|_| too_large("max_opens"))?,
        trials: u32::try_from(records.len()).map_err(|_| too_large("trial count"))?,
        strategy: kind,
        seed: config.seed,
    };

    let mut data = Vec::with_capacity(HEADER_SIZE + records.len() * 2);
    data.extend_from_slice(&header.encode());
    for record in records {
        let count = u16::try_from(record.successes).map_err(|_| too_large("success count"))?;
        data.extend_from_slice(&count.to_le_bytes());
    }

    let mut f = File::create(path)?;
    f.write_all(&data)
}

/// Load success counts. Returns None on a missing file, bad magic/version,
/// or a length that disagrees with the header.
pub fn load_success_counts(path: &Path) -> Option<(SuccessCountsHeader, Vec<u16>)> {
    let file = File::open(path).ok()?;
    let file_size = file.metadata().ok()?.len() as usize;
    if file_size < HEADER_SIZE {
        return None;
    }

    // Safety: the file is only read, and the map is dropped before returning.
    let mmap = unsafe { Mmap::map(&file).ok()? };
    let header = SuccessCountsHeader::decode(&mmap[..HEADER_SIZE])?;

    let body = &mmap[HEADER_SIZE..];
    if body.len() != header.trials as usize * 2 {
        return None;
    }

    let counts = body
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    Some((header, counts))
}
