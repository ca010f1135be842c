mod common;

use common::{Harness, routine};
use onerep::config::PhaseDurations;
use onerep::exercise::{ExerciseSpec, ExerciseStatus, ProfileId, WorkingValue};
use onerep::partner::Partner;
use onerep::phase::PhaseKind;
use onerep::session::StageKind;
use onerep::store::{LogEntry, LogStore};

const ALICE: ProfileId = ProfileId(1);
const BOB: ProfileId = ProfileId(2);

fn pair() -> Harness {
    let mut h = Harness::with_profiles(
        &[
            (
                ALICE,
                routine(vec![
                    ExerciseSpec::weighted("Leg Press", Some(200.0)),
                    ExerciseSpec::weighted("Chest Press", Some(150.0)),
                ]),
            ),
            (
                BOB,
                routine(vec![
                    ExerciseSpec::weighted("Leg Press", Some(120.0)),
                    ExerciseSpec::weighted("Chest Press", Some(90.0)),
                ]),
            ),
        ],
        PhaseDurations::default(),
    );
    assert!(h.engine.start_partner_mode(ALICE, BOB));
    h
}

fn partner(h: &Harness) -> Partner {
    h.engine.snapshot().partner.unwrap().current_partner
}

/// Start the current profile's first exercise and commit it.
fn commit_set(h: &mut Harness, weight: f64) {
    h.start("Leg Press");
    h.engine.complete_exercise();
    h.engine.log_set_and_finish(weight, true).unwrap();
}

#[test]
fn commits_alternate_partners() {
    let mut h = pair();
    assert_eq!(partner(&h), Partner::One);
    assert_eq!(h.engine.current_profile(), ALICE);

    commit_set(&mut h, 200.0);
    assert_eq!(partner(&h), Partner::Two);
    assert_eq!(h.engine.current_profile(), BOB);
    assert_eq!(h.engine.snapshot().profile, BOB);

    commit_set(&mut h, 125.0);
    assert_eq!(partner(&h), Partner::One);
}

#[test]
fn aborted_sets_do_not_pass_the_turn() {
    let mut h = pair();
    h.start("Leg Press");
    h.ticks(4);
    h.engine.stop_timer();
    assert_eq!(partner(&h), Partner::One);

    h.start("Leg Press");
    h.engine.complete_exercise();
    assert!(h.engine.start_rest());
    assert_eq!(partner(&h), Partner::One);
}

#[test]
fn seeding_and_records_follow_current_profile() {
    let mut h = pair();
    h.store
        .append(&LogEntry::new(
            ALICE,
            "Leg Press",
            WorkingValue::Weighted(300.0),
            true,
            "workout",
        ))
        .unwrap();

    commit_set(&mut h, 200.0);
    h.start("Leg Press");
    assert_eq!(
        h.engine.snapshot().working_value,
        Some(WorkingValue::Weighted(120.0))
    );
    h.engine.complete_exercise();
    let report = h.engine.log_set_and_finish(125.0, true).unwrap();
    assert_eq!(report.entry.profile, BOB);
    assert!(report.personal_record);

    assert_eq!(h.store.max_weight(ALICE, "Leg Press").unwrap(), Some(300.0));
    assert_eq!(h.store.max_weight(BOB, "Leg Press").unwrap(), Some(125.0));
}

#[test]
fn rest_hands_next_exercise_to_new_current_profile() {
    let mut h = pair();
    h.start("Leg Press");
    h.engine.complete_exercise();
    h.engine.log_set_to_history(200.0, true).unwrap();

    let snap = h.engine.snapshot();
    assert_eq!(snap.stage, StageKind::Rest);
    assert_eq!(snap.profile, BOB);
    assert_eq!(
        snap.next_exercise.map(|e| e.working_value()),
        Some(WorkingValue::Weighted(120.0))
    );

    assert!(h.engine.skip_rest());
    let snap = h.engine.snapshot();
    assert_eq!(snap.phase, Some(PhaseKind::Prep));
    assert_eq!(snap.profile, BOB);
    assert_eq!(snap.working_value, Some(WorkingValue::Weighted(120.0)));
}

#[test]
fn manual_switch_is_refused_mid_set() {
    let mut h = pair();
    assert!(h.engine.switch_partner());
    assert_eq!(partner(&h), Partner::Two);

    h.start("Leg Press");
    assert!(!h.engine.switch_partner());
    assert!(!h.engine.end_partner_mode());
    h.engine.complete_exercise();
    assert!(!h.engine.switch_partner());

    h.engine.start_rest();
    assert!(h.engine.switch_partner());
    assert_eq!(h.engine.current_profile(), ALICE);
}

#[test]
fn switch_during_rest_routes_next_start() {
    let mut h = pair();
    h.start("Leg Press");
    h.engine.complete_exercise();
    h.engine.log_set_to_history(200.0, true).unwrap();
    assert_eq!(h.engine.current_profile(), BOB);

    assert!(h.engine.switch_partner());
    assert!(h.engine.skip_rest());
    let snap = h.engine.snapshot();
    assert_eq!(snap.profile, ALICE);
    assert_eq!(
        snap.current_exercise.map(|e| e.name),
        Some("Chest Press".to_string())
    );
    assert_eq!(snap.working_value, Some(WorkingValue::Weighted(150.0)));
}

#[test]
fn end_partner_mode_keeps_both_histories() {
    let mut h = pair();
    commit_set(&mut h, 200.0);
    commit_set(&mut h, 125.0);
    commit_set(&mut h, 205.0);
    assert_eq!(h.engine.current_profile(), BOB);

    assert!(h.engine.end_partner_mode());
    assert!(!h.engine.end_partner_mode());
    assert_eq!(h.engine.snapshot().partner, None);
    assert_eq!(h.engine.current_profile(), BOB);

    assert_eq!(h.store.history(ALICE, None, 10).unwrap().len(), 2);
    assert_eq!(h.store.history(BOB, None, 10).unwrap().len(), 1);
    let alice = h.engine.session(ALICE).unwrap();
    assert_eq!(alice.entries[0].status, ExerciseStatus::Logged);
}

#[test]
fn start_partner_mode_validation() {
    let mut h = Harness::with_profiles(
        &[
            (ALICE, routine(vec![ExerciseSpec::weighted("Leg Press", None)])),
            (BOB, routine(vec![ExerciseSpec::weighted("Leg Press", None)])),
        ],
        PhaseDurations::default(),
    );
    assert!(!h.engine.start_partner_mode(ALICE, ALICE));
    assert!(!h.engine.switch_partner());

    h.start("Leg Press");
    assert!(!h.engine.start_partner_mode(ALICE, BOB));
    h.engine.stop_timer();

    assert!(h.engine.start_partner_mode(ALICE, BOB));
    assert!(!h.engine.start_partner_mode(ALICE, BOB));
    assert!(h.engine.session(BOB).is_some());
}

#[test]
fn partner_mode_waits_for_both_lists() {
    let mut h = Harness::with_profiles(
        &[
            (ALICE, routine(vec![ExerciseSpec::weighted("Leg Press", None)])),
            (BOB, routine(vec![ExerciseSpec::weighted("Leg Press", None)])),
        ],
        PhaseDurations::default(),
    );
    h.store.set_fail_loads(true);
    assert!(!h.engine.start_partner_mode(ALICE, BOB));
    assert!(h.engine.session(BOB).is_none());

    h.store.set_fail_loads(false);
    assert!(h.engine.start_partner_mode(ALICE, BOB));
    assert_eq!(h.engine.session(BOB).map(|s| s.entries.len()), Some(1));
}

#[test]
fn partner_snapshot_keeps_finished_set_after_turn_passes() {
    let mut h = pair();
    h.start("Leg Press");
    h.engine.complete_exercise();
    h.engine.log_set_to_history(200.0, true).unwrap();

    let snap = h.engine.snapshot();
    assert_eq!(snap.profile, BOB);
    assert!(snap.is_logged());
    let alice_press = h.engine.session(ALICE).unwrap().entries[0].spec.id;
    assert_eq!(snap.current_exercise.map(|e| e.id), Some(alice_press));
}
