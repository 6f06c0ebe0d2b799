//! Slot integrity checksum.
//!
//! Rotate-and-add over every byte of the snapshot image except the
//! trailing checksum word. Order- and layout-sensitive by construction.
//! This catches partial writes and stale layouts; it is not tamper-proof.

use crate::snapshot::Snapshot;
use std::mem::offset_of;

/// Checksum an arbitrary byte image.
pub fn rolling_checksum(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &byte| {
        acc.wrapping_add(u32::from(byte)).rotate_left(1)
    })
}

/// Checksum a snapshot, excluding its own checksum field.
pub fn snapshot_checksum(snapshot: &Snapshot) -> u32 {
    let covered = offset_of!(Snapshot, checksum);
    rolling_checksum(&snapshot.as_bytes()[..covered])
}

/// Recompute and compare. Returns the recomputed value on mismatch.
pub fn verify(snapshot: &Snapshot) -> Result<(), u32> {
    let computed = snapshot_checksum(snapshot);
    if computed == snapshot.checksum {
        Ok(())
    } else {
        Err(computed)
    }
}
