//! File I/O for player progress.
//!
//! Binary format for `progress.bin` (little endian):
//! - u32: highest level cleared (0 when none)
//! - u32: current level index
//!
//! A missing or truncated file reads as no progress.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::levels::FIRST_LEVEL;

const PROGRESS_BIN: &str = "progress.bin";

/// Saved player progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub max_level_cleared: u32,
    pub current_level: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            max_level_cleared: 0,
            current_level: FIRST_LEVEL,
        }
    }
}

/// Records a cleared level, raising the high-water mark if needed.
pub fn save_level_completed(level: u32) -> std::io::Result<()> {
    save_level_completed_at(Path::new(PROGRESS_BIN), level)
}

/// The highest level cleared so far, or `None` before the first clear.
pub fn max_level_cleared() -> Option<u32> {
    let progress = load_from(Path::new(PROGRESS_BIN))?;
    (progress.max_level_cleared > 0).then_some(progress.max_level_cleared)
}

/// Persists the level the player is currently on.
pub fn set_current_level(level: u32) -> std::io::Result<()> {
    set_current_level_at(Path::new(PROGRESS_BIN), level)
}

/// The level the player is currently on, defaulting to the first level.
pub fn current_level() -> u32 {
    load_from(Path::new(PROGRESS_BIN))
        .unwrap_or_default()
        .current_level
}

/// Deletes all saved progress.
pub fn reset() -> std::io::Result<()> {
    match std::fs::remove_file(PROGRESS_BIN) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn save_level_completed_at(path: &Path, level: u32) -> std::io::Result<()> {
    let mut progress = load_from(path).unwrap_or_default();
    if level > progress.max_level_cleared {
        progress.max_level_cleared = level;
        save_to(path, progress)?;
    }
    Ok(())
}

fn set_current_level_at(path: &Path, level: u32) -> std::io::Result<()> {
    let mut progress = load_from(path).unwrap_or_default();
    progress.current_level = level;
    save_to(path, progress)
}

fn save_to(path: &Path, progress: Progress) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&progress.max_level_cleared.to_le_bytes())?;
    file.write_all(&progress.current_level.to_le_bytes())?;
    Ok(())
}

fn load_from(path: &Path) -> Option<Progress> {
    let mut file = File::open(path).ok()?;
    let mut u32_buffer = [0u8; 4];

    file.read_exact(&mut u32_buffer).ok()?;
    let max_level_cleared = u32::from_le_bytes(u32_buffer);

    file.read_exact(&mut u32_buffer).ok()?;
    let current_level = u32::from_le_bytes(u32_buffer);

    Some(Progress {
        max_level_cleared,
        current_level,
    })
}
