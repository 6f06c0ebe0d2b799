//! Slot corruption must never be restored into the host.

mod common;

use common::MockHost;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use savestate_core::{
    checksum::{rolling_checksum, snapshot_checksum},
    engine::SavestateEngine,
    error::SavestateError,
    snapshot::Snapshot,
    store::SLOT_SINGLE,
};
use std::mem::{offset_of, size_of};

fn saved_engine(host: &mut MockHost) -> SavestateEngine {
    let mut engine = SavestateEngine::default();
    let goomba = host.goomba;
    host.spawn(2, goomba, [300.0, 0.0, -50.0]);
    engine.capture(host, SLOT_SINGLE, 600).expect("capture");
    engine
}

#[test]
fn stored_checksum_matches_recomputed_image() {
    let mut host = MockHost::new();
    let engine = saved_engine(&mut host);
    let snapshot = engine.store().get(SLOT_SINGLE).expect("slot in range");

    let covered = &snapshot.as_bytes()[..size_of::<Snapshot>() - 4];
    assert_eq!(snapshot.checksum, rolling_checksum(covered));
    assert_eq!(snapshot.checksum, snapshot_checksum(snapshot));
}

#[test]
fn single_byte_flip_is_detected_and_consumes_the_slot() {
    let mut host = MockHost::new();
    let mut engine = saved_engine(&mut host);

    let image = engine.store_mut().get_mut(SLOT_SINGLE).expect("slot in range").as_bytes_mut();
    image[8] ^= 0x01;

    host.player_state_mut().pos = [0.0; 3];
    let err = engine.restore(&mut host, SLOT_SINGLE).unwrap_err();
    assert!(matches!(err, SavestateError::CorruptSlot { slot: SLOT_SINGLE, .. }), "{err}");

    // Nothing was written, and the slot cannot be retried.
    assert_eq!(host.player_state().pos, [0.0; 3]);
    assert!(host.cues.len() == 1, "only the save cue should have played");
    assert!(!engine.is_valid(&host, SLOT_SINGLE));
    assert_eq!(
        engine.restore(&mut host, SLOT_SINGLE),
        Err(SavestateError::EmptySlot { slot: SLOT_SINGLE })
    );
}

#[test]
fn corrupt_slot_still_reports_valid_until_loaded() {
    let mut host = MockHost::new();
    let mut engine = saved_engine(&mut host);

    engine.store_mut().get_mut(SLOT_SINGLE).expect("slot in range").actor.health = 99;
    assert!(engine.is_valid(&host, SLOT_SINGLE));

    assert!(engine.restore(&mut host, SLOT_SINGLE).is_err());
    assert!(!engine.is_valid(&host, SLOT_SINGLE));
}

#[test]
fn any_flipped_byte_outside_checksum_is_detected() {
    let mut host = MockHost::new();
    let reference = saved_engine(&mut host);
    let pristine = *reference.store().get(SLOT_SINGLE).expect("slot in range");
    let covered = offset_of!(Snapshot, checksum);

    let mut rng = Pcg64Mcg::seed_from_u64(0x5AFE_57A7E);
    for _ in 0..200 {
        let offset = rng.gen_range(0..covered);
        let bit = 1u8 << rng.gen_range(0..8);

        let mut engine = SavestateEngine::default();
        *engine.store_mut().get_mut(SLOT_SINGLE).expect("slot in range") = pristine;
        engine.store_mut().get_mut(SLOT_SINGLE).expect("slot in range").as_bytes_mut()[offset] ^= bit;

        let result = engine.restore(&mut host, SLOT_SINGLE);
        let detected = match result {
            Err(SavestateError::CorruptSlot { .. }) => true,
            // The flip landed on the valid flag itself and cleared it.
            Err(SavestateError::EmptySlot { .. }) => offset >= offset_of!(Snapshot, is_valid),
            _ => false,
        };
        assert!(detected, "flip of bit {bit:#04x} at offset {offset} went unnoticed: {result:?}");
    }
}

#[test]
fn flipping_the_checksum_field_is_detected() {
    let mut host = MockHost::new();
    let mut engine = saved_engine(&mut host);

    engine.store_mut().get_mut(SLOT_SINGLE).expect("slot in range").checksum ^= 0x8000_0000;
    assert!(matches!(
        engine.restore(&mut host, SLOT_SINGLE),
        Err(SavestateError::CorruptSlot { .. })
    ));
}
