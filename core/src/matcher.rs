//! Object re-identification.
//!
//! Live actors carry no identity that survives between capture and
//! restore, so saved records are matched back to live actors by
//! behavior class plus horizontal proximity.
//!
//! RULES:
//!   - A record matches a live actor when the behavior ids are equal and
//!     the saved X and Z both lie strictly within `MATCH_TOLERANCE` of the
//!     actor's current X and Z. Height is ignored.
//!   - Records are scanned in capture order; the first unconsumed match
//!     wins. There is no nearest-match search.
//!   - A record is consumed by its first match and never matches again.
//!   - Inactive, classless and excluded actors are never captured and
//!     never matched.
//!
//! KNOWN LIMITATION: two same-class actors within tolerance of each other
//! can swap records, and an actor that moved further than the tolerance
//! since capture is not restored at all.

use crate::{
    behavior::BehaviorRegistry,
    host::{LiveObject, SimulationHandle},
    snapshot::{ObjectRecord, Snapshot, MAX_SAVED_OBJECTS},
    types::BehaviorId,
};

/// Per-axis horizontal distance, in simulation units.
pub const MATCH_TOLERANCE: f32 = 100.0;

/// Walks the saved records for one restore. Consumption is tracked here,
/// so the snapshot itself stays untouched.
#[derive(Debug)]
pub struct ObjectMatcher<'a> {
    records:  &'a [ObjectRecord],
    consumed: Vec<bool>,
}

impl<'a> ObjectMatcher<'a> {
    pub fn new(records: &'a [ObjectRecord]) -> Self {
        let consumed = records.iter().map(|r| r.active == 0).collect();
        Self { records, consumed }
    }

    /// Find and consume the first record matching a live actor.
    pub fn claim(&mut self, behavior: BehaviorId, pos: [f32; 3]) -> Option<&'a ObjectRecord> {
        let records = self.records;
        let index = records.iter().enumerate().position(|(i, record)| {
            !self.consumed[i]
                && record.behavior() == behavior
                && (record.pos[0] - pos[0]).abs() < MATCH_TOLERANCE
                && (record.pos[2] - pos[2]).abs() < MATCH_TOLERANCE
        })?;
        self.consumed[index] = true;
        Some(&records[index])
    }

    pub fn unclaimed(&self) -> usize {
        self.consumed.iter().filter(|c| !**c).count()
    }
}

/// Counts from one object restore pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub matched:   usize,
    /// Live actors left running their current state.
    pub unmatched: usize,
    /// Saved records with no live counterpart.
    pub unused:    usize,
}

fn capture_key(object: &LiveObject, registry: &BehaviorRegistry) -> Option<BehaviorId> {
    let behavior = object.behavior?;
    (object.active && !registry.is_excluded(behavior)).then_some(behavior)
}

/// Record every eligible live actor into `snapshot`, list by list, until
/// the snapshot is full. Returns how many eligible actors were dropped.
pub fn capture_objects<H: SimulationHandle + ?Sized>(host: &H, snapshot: &mut Snapshot) -> usize {
    let registry = host.behaviors();
    let mut dropped = 0;

    for list in 0..host.object_list_count() {
        for object in host.object_list(list) {
            let Some(behavior) = capture_key(object, registry) else {
                continue;
            };
            if snapshot.is_full() {
                dropped += 1;
                continue;
            }
            snapshot.push_object(ObjectRecord::capture(object, behavior));
        }
    }
    if dropped > 0 {
        log::debug!("snapshot full at {MAX_SAVED_OBJECTS} objects; {dropped} dropped");
    }
    dropped
}

/// Re-walk the live lists and write matched records back. Eligibility is
/// the same as for capture.
pub fn restore_objects<H: SimulationHandle + ?Sized>(host: &mut H, snapshot: &Snapshot) -> MatchReport {
    let mut matcher = ObjectMatcher::new(snapshot.objects());
    let mut report = MatchReport::default();

    for list in 0..host.object_list_count() {
        let keys: Vec<Option<BehaviorId>> = host
            .object_list(list)
            .iter()
            .map(|object| capture_key(object, host.behaviors()))
            .collect();

        for (object, key) in host.object_list_mut(list).iter_mut().zip(keys) {
            let Some(behavior) = key else {
                continue;
            };
            match matcher.claim(behavior, object.pos) {
                Some(record) => {
                    record.apply_to(object);
                    report.matched += 1;
                }
                None => report.unmatched += 1,
            }
        }
    }

    report.unused = matcher.unclaimed();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(behavior: u32, x: f32, z: f32) -> ObjectRecord {
        ObjectRecord {
            behavior,
            pos: [x, 0.0, z],
            active: 1,
            ..ObjectRecord::default()
        }
    }

    #[test]
    fn tolerance_is_strict_and_per_axis() {
        let records = [record(1, 0.0, 0.0)];

        let mut matcher = ObjectMatcher::new(&records);
        assert!(matcher.claim(BehaviorId(1), [100.0, 0.0, 0.0]).is_none());
        assert!(matcher.claim(BehaviorId(1), [99.9, 5000.0, -99.9]).is_some());
    }

    #[test]
    fn height_is_ignored() {
        let records = [record(1, 0.0, 0.0)];
        let mut matcher = ObjectMatcher::new(&records);
        assert!(matcher.claim(BehaviorId(1), [0.0, -9000.0, 0.0]).is_some());
    }

    #[test]
    fn first_record_wins_even_when_a_later_one_is_closer() {
        let records = [record(1, 90.0, 0.0), record(1, 1.0, 0.0)];
        let mut matcher = ObjectMatcher::new(&records);

        let claimed = matcher.claim(BehaviorId(1), [0.0, 0.0, 0.0]).expect("first record claimable");
        assert_eq!(claimed.pos[0], 90.0);
    }

    #[test]
    fn consumed_records_do_not_match_twice() {
        let records = [record(1, 0.0, 0.0)];
        let mut matcher = ObjectMatcher::new(&records);

        assert!(matcher.claim(BehaviorId(1), [0.0; 3]).is_some());
        assert!(matcher.claim(BehaviorId(1), [0.0; 3]).is_none());
        assert_eq!(matcher.unclaimed(), 0);
    }

    #[test]
    fn behavior_must_match() {
        let records = [record(1, 0.0, 0.0)];
        let mut matcher = ObjectMatcher::new(&records);
        assert!(matcher.claim(BehaviorId(2), [0.0; 3]).is_none());
        assert_eq!(matcher.unclaimed(), 1);
    }
}
