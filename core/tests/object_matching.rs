mod common;

use common::{MockHost, NUM_LISTS};
use savestate_core::{
    config::SavestateSettings,
    engine::SavestateEngine,
    matcher::MatchReport,
    snapshot::MAX_SAVED_OBJECTS,
    store::SLOT_SINGLE,
};

// ── Capture ──────────────────────────────────────────────────────────────────

#[test]
fn capture_skips_excluded_inactive_and_classless_objects() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let (decoration, goomba) = (host.decoration, host.goomba);

    host.spawn(2, decoration, [0.0; 3]);
    let sleeping = host.spawn(2, goomba, [10.0, 0.0, 10.0]);
    host.object_mut(sleeping).active = false;
    let classless = host.spawn(3, goomba, [20.0, 0.0, 20.0]);
    host.object_mut(classless).behavior = None;
    host.spawn(3, goomba, [30.0, 0.0, 30.0]);

    let report = engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    assert_eq!(report.objects_saved, 1);
    let snapshot = engine.store().get(SLOT_SINGLE).expect("slot in range");
    let saved = snapshot.objects();
    assert_eq!(saved[0].behavior(), goomba);
    assert_eq!(saved[0].pos, [30.0, 0.0, 30.0]);
    assert_eq!(saved[0].active, 1);
}

#[test]
fn capture_follows_list_order() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let (goomba, bobomb) = (host.goomba, host.bobomb);

    host.spawn(3, bobomb, [3.0, 0.0, 0.0]);
    host.spawn(2, goomba, [2.0, 0.0, 0.0]);
    host.spawn(2, goomba, [2.5, 0.0, 0.0]);

    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    let xs: Vec<f32> = engine
        .store()
        .get(SLOT_SINGLE)
        .expect("slot in range")
        .objects()
        .iter()
        .map(|o| o.pos[0])
        .collect();
    assert_eq!(xs, vec![2.0, 2.5, 3.0]);
}

#[test]
fn capture_silently_truncates_at_capacity() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let goomba = host.goomba;
    let extra = 37;

    for i in 0..MAX_SAVED_OBJECTS + extra {
        host.spawn(i % NUM_LISTS, goomba, [i as f32 * 1000.0, 0.0, 0.0]);
    }

    let report = engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    assert_eq!(report.objects_saved, MAX_SAVED_OBJECTS);
    assert_eq!(report.objects_dropped, extra);
    assert!(engine.is_valid(&host, SLOT_SINGLE));
    assert_eq!(engine.store().get(SLOT_SINGLE).expect("slot in range").num_objects as usize, MAX_SAVED_OBJECTS);
}

#[test]
fn object_saving_can_be_disabled() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::new(SavestateSettings {
        save_objects: false,
        ..SavestateSettings::default()
    });
    let goomba = host.goomba;
    let at = host.spawn(2, goomba, [0.0; 3]);

    let report = engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");
    assert_eq!(report.objects_saved, 0);

    host.object_mut(at).health = 0;
    let restored = engine.restore(&mut host, SLOT_SINGLE).expect("restore");
    assert_eq!(restored.objects, None);
    assert_eq!(host.object(at).health, 0);
}

// ── Restore ──────────────────────────────────────────────────────────────────

#[test]
fn matched_objects_get_position_rotation_action_and_health_back() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let bobomb = host.bobomb;
    let at = host.spawn(2, bobomb, [1000.0, 50.0, -400.0]);
    {
        let object = host.object_mut(at);
        object.angle = [0, 0x4000, 0];
        object.action = 2;
        object.health = 3;
    }
    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    {
        let object = host.object_mut(at);
        object.pos = [1060.0, 400.0, -350.0];
        object.angle = [0, -0x1000, 0];
        object.action = 5;
        object.health = 0;
        object.flags = 0xFF;
    }
    let report = engine.restore(&mut host, SLOT_SINGLE).expect("restore");

    assert_eq!(report.objects.expect("objects restored").matched, 1);
    let object = host.object(at);
    assert_eq!(object.pos, [1000.0, 50.0, -400.0]);
    assert_eq!(object.angle, [0, 0x4000, 0]);
    assert_eq!(object.action, 2);
    assert_eq!(object.health, 3);
    assert_eq!(object.flags, 0xFF, "flags are not restored");
}

#[test]
fn objects_that_wandered_off_keep_running() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let goomba = host.goomba;
    let at = host.spawn(2, goomba, [0.0, 0.0, 0.0]);
    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    host.object_mut(at).pos = [0.0, 0.0, 100.0];
    host.object_mut(at).action = 9;
    let report = engine.restore(&mut host, SLOT_SINGLE).expect("restore");

    assert_eq!(
        report.objects,
        Some(MatchReport { matched: 0, unmatched: 1, unused: 1 })
    );
    assert_eq!(host.object(at).pos, [0.0, 0.0, 100.0]);
    assert_eq!(host.object(at).action, 9);
}

#[test]
fn each_record_restores_at_most_one_actor() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let goomba = host.goomba;
    let first = host.spawn(2, goomba, [0.0, 0.0, 0.0]);
    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    // A second goomba spawns next to the first after the save.
    let second = host.spawn(2, goomba, [10.0, 0.0, 10.0]);
    host.object_mut(first).health = 0;
    host.object_mut(second).health = 0;

    let report = engine.restore(&mut host, SLOT_SINGLE).expect("restore").objects.expect("objects restored");

    assert_eq!(report.matched, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(host.object(first).health, 1);
    assert_eq!(host.object(second).health, 0);
}

#[test]
fn nearby_same_class_actors_take_records_in_scan_order() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let goomba = host.goomba;
    let a = host.spawn(2, goomba, [0.0, 0.0, 0.0]);
    let b = host.spawn(2, goomba, [50.0, 0.0, 0.0]);
    host.object_mut(a).action = 1;
    host.object_mut(b).action = 2;
    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    // Both stay within tolerance of both records. First scanned actor
    // takes the first record, even though it now sits closer to the second.
    host.object_mut(a).pos = [45.0, 0.0, 0.0];
    host.object_mut(b).pos = [5.0, 0.0, 0.0];
    engine.restore(&mut host, SLOT_SINGLE).expect("restore");

    assert_eq!(host.object(a).action, 1);
    assert_eq!(host.object(a).pos, [0.0, 0.0, 0.0]);
    assert_eq!(host.object(b).action, 2);
    assert_eq!(host.object(b).pos, [50.0, 0.0, 0.0]);
}

#[test]
fn records_match_across_lists_by_class_not_position_in_list() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let (goomba, bobomb) = (host.goomba, host.bobomb);
    let g = host.spawn(2, goomba, [0.0, 0.0, 0.0]);
    let b = host.spawn(3, bobomb, [0.0, 0.0, 0.0]);
    host.object_mut(g).health = 4;
    host.object_mut(b).health = 6;
    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");

    host.object_mut(g).health = 0;
    host.object_mut(b).health = 0;
    engine.restore(&mut host, SLOT_SINGLE).expect("restore");

    assert_eq!(host.object(g).health, 4);
    assert_eq!(host.object(b).health, 6);
}

#[test]
fn restore_does_not_consume_records_in_the_slot() {
    let mut host = MockHost::new();
    let mut engine = SavestateEngine::default();
    let goomba = host.goomba;
    let at = host.spawn(2, goomba, [0.0; 3]);
    engine.capture(&mut host, SLOT_SINGLE, 0).expect("capture");
    let before = *engine.store().get(SLOT_SINGLE).expect("slot in range");

    for _ in 0..2 {
        host.object_mut(at).health = 0;
        engine.restore(&mut host, SLOT_SINGLE).expect("restore");
        assert_eq!(host.object(at).health, 1);
    }
    assert_eq!(*engine.store().get(SLOT_SINGLE).expect("slot in range"), before);
}
