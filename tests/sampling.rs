//! Frame-count estimation, sample planning, and the sampling loop.

mod common;

use chromashot::{
    ChromashotError, Color, FailureStage, SamplePlan, estimate_frame_count, sample_colors,
};
use common::SyntheticSource;

// ── estimate_frame_count ─────────────────────────────────────────

#[test]
fn estimate_rounds_half_up() {
    assert_eq!(estimate_frame_count(10.0, 1.0).unwrap(), 10);
    assert_eq!(estimate_frame_count(2.5, 1.0).unwrap(), 3);
    assert_eq!(estimate_frame_count(10.0, 29.97).unwrap(), 300);
    assert_eq!(estimate_frame_count(7200.0, 24.0).unwrap(), 172_800);
}

#[test]
fn estimate_rejects_missing_inputs() {
    for (duration, fps) in [
        (0.0, 25.0),
        (10.0, 0.0),
        (-1.0, 25.0),
        (10.0, -30.0),
        (f64::NAN, 25.0),
        (10.0, f64::INFINITY),
    ] {
        let error = estimate_frame_count(duration, fps).unwrap_err();
        assert!(
            matches!(error, ChromashotError::FrameCountUnavailable { .. }),
            "expected FrameCountUnavailable for ({duration}, {fps}), got {error:?}",
        );
        assert_eq!(error.stage(), FailureStage::Estimation);
    }
}

#[test]
fn estimate_rejects_sub_frame_duration() {
    // 0.2s at 2 fps rounds to zero frames.
    assert!(estimate_frame_count(0.2, 2.0).is_err());
}

// ── SamplePlan ──────────────────────────────────────────────────

#[test]
fn plan_is_capped_by_stripe_budget() {
    let plan = SamplePlan::new(100_000, 1920);
    assert_eq!(plan.len(), 1920);
    assert_eq!(plan.estimated_frames(), 100_000);
    assert_eq!(plan.max_stripes(), 1920);
}

#[test]
fn short_video_keeps_every_frame() {
    let plan = SamplePlan::new(10, 1920);
    assert_eq!(plan.targets(), (0..10).collect::<Vec<u64>>().as_slice());
}

#[test]
fn plan_rounds_targets_half_up() {
    // step = 3000 / 1920 = 1.5625
    let plan = SamplePlan::new(3000, 1920);
    assert_eq!(&plan.targets()[..4], &[0, 2, 3, 5]);

    // step = 2.5
    let plan = SamplePlan::new(10, 4);
    assert_eq!(plan.targets(), &[0, 3, 5, 8]);
}

#[test]
fn plan_covers_the_whole_stream() {
    for (estimated, budget) in [(1, 1920), (7, 3), (1921, 1920), (57_600, 1920), (999, 1000)] {
        let plan = SamplePlan::new(estimated, budget);
        let targets = plan.targets();

        assert_eq!(plan.len() as u64, estimated.min(u64::from(budget)));
        assert_eq!(targets[0], 0);
        assert!(targets.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(targets.iter().all(|&target| target < estimated));
    }
}

#[test]
fn explicit_targets_must_not_decrease() {
    let plan = SamplePlan::from_targets(vec![0, 2, 2, 5]).unwrap();
    assert_eq!(plan.targets(), &[0, 2, 2, 5]);
    assert_eq!(plan.estimated_frames(), 6);
    assert_eq!(plan.max_stripes(), 4);

    let error = SamplePlan::from_targets(vec![0, 5, 4]).unwrap_err();
    assert!(matches!(error, ChromashotError::InvalidOption(_)));
    assert!(SamplePlan::from_targets(Vec::new()).unwrap().is_empty());
}

#[test]
fn empty_plans() {
    assert!(SamplePlan::new(0, 1920).is_empty());
    assert!(SamplePlan::new(500, 0).is_empty());
}

// ── sample_colors ───────────────────────────────────────────────

#[test]
fn samples_only_planned_frames() {
    let mut source = SyntheticSource::numbered(100);
    let plan = SamplePlan::new(100, 10);

    let timeline = sample_colors(&mut source, &plan).unwrap();

    let expected: Vec<Color> = (0..10).map(|index| Color::new(index * 10, 0, 0)).collect();
    assert_eq!(timeline.colors(), expected.as_slice());
    assert_eq!(source.converted, 10);
    assert!(timeline.is_complete());
}

#[test]
fn repeated_targets_reuse_one_frame() {
    let mut source = SyntheticSource::numbered(10);
    let plan = SamplePlan::from_targets(vec![0, 2, 2, 2, 5]).unwrap();

    let timeline = sample_colors(&mut source, &plan).unwrap();

    let expected: Vec<Color> = [0, 2, 2, 2, 5]
        .into_iter()
        .map(|index| Color::new(index, 0, 0))
        .collect();
    assert_eq!(timeline.colors(), expected.as_slice());
    assert!(timeline.is_complete());
    assert_eq!(source.converted, 3);
    assert_eq!(source.decoded, 6);
}

#[test]
fn stops_pulling_after_last_target() {
    let mut source = SyntheticSource::numbered(100);
    let plan = SamplePlan::new(100, 10);

    let timeline = sample_colors(&mut source, &plan).unwrap();

    // Last target is frame 90; frames 91..100 are never decoded.
    assert_eq!(source.decoded, 91);
    assert_eq!(timeline.decoded_frames(), 91);
}

#[test]
fn stream_ending_early_gives_shorter_timeline() {
    let mut source = SyntheticSource::numbered(5);
    let plan = SamplePlan::new(20, 20);

    let timeline = sample_colors(&mut source, &plan).unwrap();

    assert_eq!(timeline.len(), 5);
    assert_eq!(timeline.planned_stripes(), 20);
    assert!(!timeline.is_complete());
    assert_eq!(timeline.decoded_frames(), 5);
}

#[test]
fn empty_stream_gives_empty_timeline() {
    let mut source = SyntheticSource::numbered(0);
    let plan = SamplePlan::new(10, 10);

    let timeline = sample_colors(&mut source, &plan).unwrap();
    assert!(timeline.is_empty());
    assert_eq!(source.converted, 0);
}

#[test]
fn empty_plan_decodes_nothing() {
    let mut source = SyntheticSource::numbered(10);
    let plan = SamplePlan::new(10, 0);

    let timeline = sample_colors(&mut source, &plan).unwrap();
    assert!(timeline.is_empty());
    assert_eq!(source.decoded, 0);
}
