use rewind_snapshot::{
    AnimatorParamDesc, AnimatorSnapshot, AnimatorTarget, ComponentSnapshot, FrameContext,
    LayerState, ParamKind, SnapshotConfig, SnapshotError, StateId,
};
use rewind_test_fixtures::{controllers, MockAnimator};

const IDLE: StateId = 101;
const WALK: StateId = 102;
const WAVE: StateId = 201;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn loco() -> MockAnimator {
    controllers::animator("locomotion").expect("locomotion fixture")
}

fn at(state: StateId, normalized_time: f32) -> MockAnimator {
    let mut a = loco();
    a.play(0, state, normalized_time);
    a
}

fn capture(a: &mut MockAnimator) -> AnimatorSnapshot {
    AnimatorSnapshot::capture(a, &SnapshotConfig::default())
}

/// Idle at 0.6s, fading into Walk for 0.1s of a 0.3s transition.
fn mid_fade() -> MockAnimator {
    let mut a = at(IDLE, 0.5);
    a.begin_transition(0, WALK, 0.3);
    a.update(0.1);
    a
}

#[test]
fn steady_round_trip() {
    let cfg = SnapshotConfig::default();
    let mut src = at(WALK, 0.25);
    src.set_float("Speed", 0.75);
    src.set_bool("Grounded", true);
    src.set_int("Combo", 3);
    src.set_bool("Jump", true);
    src.update(0.1);
    let snap = capture(&mut src);
    assert!(!snap.sleeping);
    assert_eq!(snap.params.len(), 4);
    assert_eq!(snap.layers.len(), 2);
    // triggers always capture as 0
    assert_eq!(snap.params[3].slot, 0);

    let mut dst = loco();
    snap.apply(&mut dst, &cfg).unwrap();
    assert_eq!(dst.get_float("Speed"), 0.75);
    assert!(dst.get_bool("Grounded"));
    assert_eq!(dst.get_int("Combo"), 3);
    assert!(!dst.get_bool("Jump"));
    assert_eq!(dst.current_state(0).id, WALK);
    approx(dst.state_time(0), 0.3, 1e-5);
    assert_eq!(dst.current_state(1).id, WAVE);
    approx(dst.state_time(1), 0.1, 1e-5);
    approx(dst.layer_weight(1), 0.5, 1e-6);
    assert!(dst.transition(0).is_none());
}

#[test]
fn transition_round_trip() {
    let cfg = SnapshotConfig::default();
    let mut src = mid_fade();
    let snap = capture(&mut src);
    let tr = snap.layers[0].transition().expect("layer 0 fading");
    assert_eq!(tr.next_state, WALK);
    approx(tr.elapsed, 0.1, 1e-5);
    approx(tr.total_length, 0.3, 1e-4);
    approx(snap.layers[0].current().time, 0.6, 1e-5);

    let mut dst = loco();
    snap.apply(&mut dst, &cfg).unwrap();
    assert_eq!(dst.current_state(0).id, IDLE);
    approx(dst.state_time(0), 0.6, 1e-5);
    let (next, elapsed, total) = dst.fade_progress(0).expect("fade restored");
    assert_eq!(next, WALK);
    approx(elapsed, 0.1, 1e-4);
    approx(total, 0.3, 1e-4);

    let again = capture(&mut dst);
    let tr2 = again.layers[0].transition().expect("still fading");
    approx(tr2.elapsed, tr.elapsed, 1e-4);
    approx(tr2.total_length, tr.total_length, 1e-4);
}

#[test]
fn zero_progress_transition_is_nudged() {
    let mut src = at(IDLE, 0.2);
    src.begin_transition(0, WALK, 0.25);
    assert_eq!(src.transition(0).unwrap().normalized_time, 0.0);

    let snap = capture(&mut src);
    approx(src.updated_for, 0.001, 1e-7);
    let tr = snap.layers[0].transition().expect("transition kept");
    assert!(tr.total_length > 0.0);
    approx(tr.total_length, 0.25, 1e-3);
    approx(tr.elapsed, 0.0, 1e-6);
    // the current state was read before the nudge
    approx(snap.layers[0].current().time, 0.2, 1e-6);
}

#[test]
fn nudge_leaves_other_layers_at_capture_instant() {
    let cfg = SnapshotConfig::default();
    let mut src = at(IDLE, 0.2);
    src.play(1, WAVE, 0.2);
    src.begin_transition(0, WALK, 0.25);
    approx(src.state_time(1), 0.3, 1e-6);

    let snap = capture(&mut src);
    approx(src.updated_for, 0.001, 1e-7);
    approx(snap.layers[0].current().time, 0.2, 1e-6);
    approx(snap.layers[1].current().time, 0.3, 1e-6);

    let mut dst = loco();
    snap.apply(&mut dst, &cfg).unwrap();
    approx(dst.state_time(0), 0.2, 1e-5);
    approx(dst.state_time(1), 0.3, 1e-5);
    let (next, _, total) = dst.fade_progress(0).expect("fade restored");
    assert_eq!(next, WALK);
    approx(total, 0.25, 1e-3);
}

#[test]
fn both_layers_at_zero_progress_share_one_nudge() {
    let mut src = at(IDLE, 0.0);
    src.begin_transition(0, WALK, 0.25);
    src.begin_transition(1, 202, 0.5);

    let snap = capture(&mut src);
    approx(src.updated_for, 0.001, 1e-7);
    let base = snap.layers[0].transition().unwrap();
    let upper = snap.layers[1].transition().unwrap();
    approx(base.total_length, 0.25, 1e-3);
    approx(upper.total_length, 0.5, 1e-3);
    approx(upper.elapsed, 0.0, 1e-6);
}

#[test]
fn transition_finishing_during_nudge_is_steady() {
    let mut src = at(IDLE, 0.0);
    src.begin_transition(0, WALK, 0.0005);
    let snap = capture(&mut src);
    assert!(snap.layers[0].transition().is_none());
    assert_eq!(snap.layers[0].current().state, IDLE);
}

#[test]
fn self_transition_is_steady() {
    let mut src = at(IDLE, 0.0);
    src.begin_transition(0, IDLE, 0.3);
    src.update(0.1);
    let snap = capture(&mut src);
    assert!(matches!(snap.layers[0], LayerState::Steady { .. }));
}

#[test]
fn uninferable_length_falls_back() {
    let cfg = SnapshotConfig::default();
    let mut src = at(IDLE, 0.0);
    // unknown destination reports zero length, so no destination progress
    src.begin_transition(0, 999, 0.4);
    src.update(0.1);
    let snap = capture(&mut src);
    let tr = snap.layers[0].transition().unwrap();
    assert_eq!(tr.total_length, cfg.fallback_transition_length);
    assert_eq!(tr.elapsed, 0.0);
}

#[test]
fn same_state_time_and_params_blend() {
    let cfg = SnapshotConfig::default();
    let mut left = at(WALK, 0.25);
    left.set_int("Combo", 1);
    let mut right = at(WALK, 0.75);
    right.set_float("Speed", 1.0);
    right.set_int("Combo", 5);
    let l = capture(&mut left);
    let r = capture(&mut right);

    let frame = FrameContext::from_stamps(0.0, 0.4, 0.16);
    let mut dst = loco();
    l.interpolate(&r, frame.factor(), &frame, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, WALK);
    approx(dst.state_time(0), 0.36, 1e-5);
    approx(dst.get_float("Speed"), 0.4, 1e-5);
    assert_eq!(dst.get_int("Combo"), 1);

    let late = FrameContext::from_stamps(0.0, 0.4, 0.3);
    l.interpolate(&r, late.factor(), &late, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.get_int("Combo"), 5);
}

#[test]
fn different_states_cut_at_right_start() {
    let cfg = SnapshotConfig::default();
    let l = capture(&mut at(IDLE, 0.5));
    let r = capture(&mut at(WALK, 0.0625));

    let early = FrameContext::from_stamps(0.0, 0.1, 0.02);
    let mut dst = loco();
    l.interpolate(&r, early.factor(), &early, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, IDLE);
    approx(dst.state_time(0), 0.52, 1e-5);

    let late = FrameContext::from_stamps(0.0, 0.1, 0.07);
    l.interpolate(&r, late.factor(), &late, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, WALK);
    approx(dst.state_time(0), 0.02, 1e-5);
}

#[test]
fn right_transition_rebuilt_once_started() {
    let cfg = SnapshotConfig::default();
    let l = capture(&mut at(IDLE, 0.5));
    let r = capture(&mut mid_fade());

    let frame = FrameContext::from_stamps(0.0, 0.1, 0.05);
    let mut dst = loco();
    l.interpolate(&r, frame.factor(), &frame, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, IDLE);
    approx(dst.state_time(0), 0.55, 1e-5);
    let (next, elapsed, total) = dst.fade_progress(0).expect("fade rebuilt");
    assert_eq!(next, WALK);
    approx(elapsed, 0.05, 1e-4);
    approx(total, 0.3, 1e-4);
}

#[test]
fn left_transition_kept_until_finished() {
    let cfg = SnapshotConfig::default();
    let mut src = mid_fade();
    let l = capture(&mut src);
    src.update(0.4);
    assert!(src.transition(0).is_none());
    let r = capture(&mut src);
    assert_eq!(r.layers[0].current().state, WALK);

    let frame = FrameContext::from_stamps(0.0, 0.4, 0.1);
    let mut dst = loco();
    l.interpolate(&r, frame.factor(), &frame, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, IDLE);
    let (next, elapsed, _) = dst.fade_progress(0).expect("left fade continued");
    assert_eq!(next, WALK);
    approx(elapsed, 0.2, 1e-4);

    let done = FrameContext::from_stamps(0.0, 0.4, 0.3);
    l.interpolate(&r, done.factor(), &done, &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, WALK);
    approx(dst.state_time(0), 0.4, 1e-4);
    assert!(dst.fade_progress(0).is_none());
}

#[test]
fn endpoints_match_apply() {
    let cfg = SnapshotConfig::default();
    let mut left = at(IDLE, 0.5);
    left.set_int("Combo", 2);
    let mut right = mid_fade();
    right.set_float("Speed", 2.0);
    right.set_int("Combo", 7);
    let a = capture(&mut left);
    let b = capture(&mut right);

    let mut applied = loco();
    a.apply(&mut applied, &cfg).unwrap();
    let mut blended = loco();
    let start = FrameContext::from_stamps(0.0, 0.2, 0.0);
    a.interpolate(&b, 0.0, &start, &mut blended, &cfg).unwrap();
    assert_eq!(blended.current_state(0).id, applied.current_state(0).id);
    approx(blended.state_time(0), applied.state_time(0), 1e-5);
    assert_eq!(blended.fade_progress(0), None);
    assert_eq!(blended.get_int("Combo"), 2);

    let mut applied = loco();
    b.apply(&mut applied, &cfg).unwrap();
    let end = FrameContext::from_stamps(0.0, 0.2, 0.2);
    a.interpolate(&b, 1.0, &end, &mut blended, &cfg).unwrap();
    approx(blended.state_time(0), applied.state_time(0), 1e-5);
    let (n1, e1, t1) = blended.fade_progress(0).unwrap();
    let (n2, e2, t2) = applied.fade_progress(0).unwrap();
    assert_eq!(n1, n2);
    approx(e1, e2, 1e-5);
    approx(t1, t2, 1e-5);
    assert_eq!(blended.get_float("Speed"), 2.0);
    assert_eq!(blended.get_int("Combo"), 7);
}

#[test]
fn self_interpolation_matches_apply() {
    let cfg = SnapshotConfig::default();
    let snap = capture(&mut mid_fade());
    let mut applied = loco();
    snap.apply(&mut applied, &cfg).unwrap();

    let frame = FrameContext::from_stamps(0.0, 0.2, 0.15);
    let mut blended = loco();
    snap.interpolate(&snap, frame.factor(), &frame, &mut blended, &cfg)
        .unwrap();
    approx(blended.state_time(0), applied.state_time(0), 1e-5);
    let (_, e1, t1) = blended.fade_progress(0).unwrap();
    let (_, e2, t2) = applied.fade_progress(0).unwrap();
    approx(e1, e2, 1e-5);
    approx(t1, t2, 1e-5);
    approx(blended.state_time(1), applied.state_time(1), 1e-5);
}

#[test]
fn sleeping_side_is_not_blended() {
    let cfg = SnapshotConfig::default();
    let mut idle = loco();
    idle.active = false;
    let asleep = capture(&mut idle);
    assert!(asleep.sleeping);
    assert!(asleep.params.is_empty() && asleep.layers.is_empty());
    assert!(asleep.to_string().starts_with("Animator: sleeping"));

    let awake = capture(&mut at(WALK, 0.5));
    let mut dst = loco();
    asleep
        .interpolate(&awake, 0.2, &FrameContext::default(), &mut dst, &cfg)
        .unwrap();
    assert_eq!(dst.current_state(0).id, WALK);
    approx(dst.state_time(0), 0.4, 1e-5);

    let mut untouched = at(IDLE, 0.3);
    asleep
        .interpolate(&asleep, 0.5, &FrameContext::default(), &mut untouched, &cfg)
        .unwrap();
    approx(untouched.state_time(0), 0.3, 1e-6);
    assert_eq!(untouched.updated_for, 0.0);
}

#[test]
fn shape_mismatches_fail_fast() {
    let cfg = SnapshotConfig::default();
    let snap = capture(&mut loco());

    let mut single = controllers::animator("single-layer").unwrap();
    assert_eq!(
        snap.apply(&mut single, &cfg),
        Err(SnapshotError::ParameterCountMismatch {
            snapshot: 4,
            target: 1
        })
    );

    let mut def = controllers::load("locomotion").unwrap();
    def.parameters[2] = AnimatorParamDesc::new("Combo", ParamKind::Float);
    let mut retyped = MockAnimator::new(def);
    assert_eq!(
        snap.interpolate(&snap, 0.5, &FrameContext::default(), &mut retyped, &cfg),
        Err(SnapshotError::ParameterKindMismatch {
            index: 2,
            snapshot: ParamKind::Int,
            target: ParamKind::Float
        })
    );

    let mut def = controllers::load("locomotion").unwrap();
    def.layers.truncate(1);
    let mut one_layer = MockAnimator::new(def);
    assert_eq!(
        snap.apply(&mut one_layer, &cfg),
        Err(SnapshotError::LayerCountMismatch {
            snapshot: 2,
            target: 1
        })
    );
}

#[test]
fn parameters_export_to_named_set() {
    let mut src = loco();
    src.set_float("Speed", 0.75);
    src.set_bool("Grounded", true);
    src.set_int("Combo", 3);
    let snap = capture(&mut src);
    let set = snap.parameter_set(&src.parameters());
    assert_eq!(set.len(), 4);
    assert_eq!(set.get_float("speed"), 0.75);
    assert!(set.get_bool("GROUNDED"));
    assert_eq!(set.get_int("combo"), 3);
    assert!(!set.get_bool("Jump"));
}
