//! ROM and save-state file I/O. The interpreter itself never touches a
//! filesystem — this module is the thin host-owned loader spec.md scopes
//! out of the core, kept here only because `main` needs somewhere to call it.

use std::fs;
use std::path::Path;

use crate::cpu::{CpuState, ROM_SIZE};
use crate::error::FatalError;

pub fn load_rom(path: &str) -> Result<[u8; ROM_SIZE], FatalError> {
    let bytes = fs::read(path).map_err(|source| FatalError::RomNotFound {
        path: path.to_string(),
        source,
    })?;
    if bytes.len() != ROM_SIZE {
        return Err(FatalError::RomSize {
            expected: ROM_SIZE,
            found: bytes.len(),
        });
    }
    let mut rom = [0u8; ROM_SIZE];
    rom.copy_from_slice(&bytes);
    Ok(rom)
}

/// Loads a save file if the path is non-empty and the file exists; an
/// absent file (first run) yields a fresh zero-initialized state, matching
/// the reference `main`'s `if (f) { ... }` guard around `fopen`.
pub fn load_save(path: &str) -> Result<CpuState, FatalError> {
    if path.is_empty() || !Path::new(path).exists() {
        return Ok(CpuState::new());
    }
    let bytes = fs::read(path).map_err(|source| FatalError::SaveNotReadable {
        path: path.to_string(),
        source,
    })?;
    CpuState::from_save_bytes(&bytes)
}

pub fn write_save(path: &str, state: &CpuState) -> std::io::Result<()> {
    if path.is_empty() {
        return Ok(());
    }
    fs::write(path, state.to_save_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_save_path_yields_fresh_state() {
        let state = load_save("").unwrap();
        assert_eq!(state, CpuState::new());
    }

    #[test]
    fn rom_of_wrong_size_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("brickcore_test_short_rom.bin");
        std::fs::write(&path, vec![0u8; 10]).unwrap();
        let err = load_rom(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FatalError::RomSize { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_round_trips_through_disk() {
        let dir = std::env::temp_dir();
        let path = dir.join("brickcore_test_save.bin");
        let mut state = CpuState::new();
        state.a = 9;
        state.tmr = 0x55;
        write_save(path.to_str().unwrap(), &state).unwrap();
        let restored = load_save(path.to_str().unwrap()).unwrap();
        assert_eq!(restored, state);
        let _ = std::fs::remove_file(&path);
    }
}
