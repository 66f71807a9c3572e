// Integration tests for the metrics aggregation core: distance
// integration, the goal latch, the velocity/range monitors, and the
// aggregator's frozen-after-goal contract.

use std::time::{Duration, Instant};

use argus::{
    DistanceAccumulator, GoalMonitor, GoalPoint, GoalState, MetricsAggregator, MetricsConfig,
    MetricsError, Pose2D, RangeMonitor, VelocityMonitor, GOAL_TOLERANCE,
};
use rstest::rstest;

fn pose(x: f64, y: f64) -> Pose2D {
    Pose2D { x, y }
}

fn test_config(goal_x: f64, goal_y: f64) -> MetricsConfig {
    MetricsConfig {
        goal: GoalPoint {
            x: goal_x,
            y: goal_y,
        },
        base_frame: "base_link".to_string(),
        global_frame: "map".to_string(),
        output_file: "metrics.txt".to_string(),
        max_lin: 0.5,
        max_ang: 1.0,
        scan_topic: "/scan".to_string(),
        cmd_vel_topic: "/cmd_vel".to_string(),
    }
}

#[rstest]
#[case(vec![(3.0, 4.0)], 5.0)]
#[case(vec![(1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], 4.0)]
#[case(vec![(0.0, 2.5), (0.0, 0.5)], 4.5)]
fn traveled_distance_sums_consecutive_steps(
    #[case] path: Vec<(f64, f64)>,
    #[case] expected: f64,
) {
    let mut accumulator = DistanceAccumulator::new(pose(0.0, 0.0));
    for (x, y) in path {
        accumulator.accumulate(pose(x, y));
    }
    assert!((accumulator.total() - expected).abs() < 1e-9);
}

#[test]
fn traveled_distance_is_independent_of_sampling_rate() {
    let mut coarse = DistanceAccumulator::new(pose(0.0, 0.0));
    coarse.accumulate(pose(3.0, 4.0));

    let mut fine = DistanceAccumulator::new(pose(0.0, 0.0));
    for i in 1..=10 {
        let t = f64::from(i) / 10.0;
        fine.accumulate(pose(3.0 * t, 4.0 * t));
    }

    assert!((coarse.total() - fine.total()).abs() < 1e-9);
    assert_eq!(*fine.last_pose(), pose(3.0, 4.0));
}

#[test]
fn traveled_distance_grows_when_backtracking() {
    let mut accumulator = DistanceAccumulator::new(pose(0.0, 0.0));
    accumulator.accumulate(pose(2.0, 0.0));
    accumulator.accumulate(pose(0.0, 0.0));
    assert!((accumulator.total() - 4.0).abs() < 1e-9);
}

#[test]
fn goal_latch_fires_once_and_freezes_elapsed_time() {
    let mut monitor = GoalMonitor::new(pose(5.0, 5.0), GOAL_TOLERANCE);
    let start = Instant::now();

    monitor.evaluate(&pose(0.0, 0.0), start, start + Duration::from_secs(1));
    assert_eq!(monitor.state(), GoalState::Running);
    assert_eq!(monitor.elapsed_time(), None);

    // (4.9, 4.9) is ~0.1414 m from the goal, inside the 0.25 m tolerance.
    monitor.evaluate(&pose(4.9, 4.9), start, start + Duration::from_secs(7));
    assert_eq!(monitor.state(), GoalState::Reached);
    let first = monitor.elapsed_time().expect("goal should be reached");
    assert!((first - 7.0).abs() < 1e-9);

    // Moving away afterwards neither un-latches nor changes the time.
    monitor.evaluate(&pose(20.0, 20.0), start, start + Duration::from_secs(30));
    monitor.evaluate(&pose(5.0, 5.0), start, start + Duration::from_secs(45));
    assert_eq!(monitor.state(), GoalState::Reached);
    assert_eq!(monitor.elapsed_time(), Some(first));
}

#[test]
fn goal_is_not_declared_at_exactly_the_tolerance() {
    let mut monitor = GoalMonitor::new(pose(5.0, 5.0), GOAL_TOLERANCE);
    let start = Instant::now();

    // Distance is exactly 0.25; arrival requires strictly less.
    monitor.evaluate(&pose(5.0, 4.75), start, start + Duration::from_secs(1));
    assert_eq!(monitor.state(), GoalState::Running);
    assert_eq!(monitor.elapsed_time(), None);
}

#[rstest]
#[case(0.8, 0.0, true, false)]
#[case(-0.8, 0.0, true, false)]
#[case(0.0, 2.0, false, true)]
#[case(0.0, -2.0, false, true)]
#[case(0.4, 0.9, false, false)]
fn velocity_limits_latch_independently(
    #[case] linear: f64,
    #[case] angular: f64,
    #[case] linear_flag: bool,
    #[case] angular_flag: bool,
) {
    let mut monitor = VelocityMonitor::new(0.5, 1.0);
    monitor.record(linear, angular);
    assert_eq!(monitor.linear_violation(), linear_flag);
    assert_eq!(monitor.angular_violation(), angular_flag);
    assert_eq!(monitor.history(), &[(linear, angular)]);
}

#[test]
fn velocity_violation_survives_later_in_bound_samples() {
    let mut monitor = VelocityMonitor::new(0.5, 1.0);
    monitor.record(0.8, 0.0);
    assert!(monitor.linear_violation());

    monitor.record(0.1, 0.0);
    assert!(monitor.linear_violation());
    assert!(!monitor.angular_violation());
    assert_eq!(monitor.history(), &[(0.8, 0.0), (0.1, 0.0)]);
}

#[test]
fn range_monitor_records_per_scan_minimum() {
    let mut monitor = RangeMonitor::new();
    monitor.record(&[2.0, 0.7, 1.4]).unwrap();
    monitor.record(&[3.0, 5.0]).unwrap();
    assert_eq!(monitor.history(), &[0.7, 3.0]);
    assert_eq!(monitor.min_range(), Some(0.7));
}

#[test]
fn empty_scan_is_rejected_not_recorded() {
    let mut monitor = RangeMonitor::new();
    let err = monitor.record(&[]).unwrap_err();
    assert!(matches!(err, MetricsError::InvalidSample(_)));
    assert!(monitor.history().is_empty());
    assert_eq!(monitor.min_range(), None);
}

#[test]
fn tick_freezes_distance_and_time_after_goal_arrival() {
    let config = test_config(5.0, 5.0);
    let start = Instant::now();
    let mut aggregator = MetricsAggregator::new(pose(0.0, 0.0), &config, start);

    aggregator.tick(pose(3.0, 4.0), start + Duration::from_secs(1));
    aggregator.tick(pose(5.0, 5.0), start + Duration::from_secs(2));
    // Ignored: the goal latch froze the run.
    aggregator.tick(pose(50.0, 50.0), start + Duration::from_secs(3));

    let report = aggregator.finalize(None, start + Duration::from_secs(4));
    assert_eq!(report.elapsed_time, Some(2.0));
    let expected = 5.0 + pose(3.0, 4.0).distance_to(&pose(5.0, 5.0));
    assert!((report.traveled_distance - expected).abs() < 1e-9);
}

#[test]
fn velocity_and_range_keep_recording_after_goal_arrival() {
    let config = test_config(0.0, 0.0);
    let start = Instant::now();
    let mut aggregator = MetricsAggregator::new(pose(0.0, 0.0), &config, start);
    aggregator.tick(pose(0.0, 0.0), start + Duration::from_secs(1));

    aggregator.on_velocity(0.3, 0.1);
    aggregator.on_range(&[1.0, 0.4]).unwrap();

    let report = aggregator.finalize(None, start + Duration::from_secs(5));
    assert_eq!(report.elapsed_time, Some(1.0));
    assert_eq!(report.linear_history, vec![0.3]);
    assert_eq!(report.angular_history, vec![0.1]);
    assert_eq!(report.range_history, vec![0.4]);
    assert_eq!(report.min_range, Some(0.4));
}

#[test]
fn finalize_folds_in_a_final_best_effort_pose() {
    let config = test_config(100.0, 100.0);
    let start = Instant::now();
    let mut aggregator = MetricsAggregator::new(pose(0.0, 0.0), &config, start);
    aggregator.tick(pose(1.0, 0.0), start + Duration::from_secs(1));

    let report = aggregator.finalize(Some(pose(1.0, 2.0)), start + Duration::from_secs(2));
    assert!((report.traveled_distance - 3.0).abs() < 1e-9);
    assert_eq!(report.elapsed_time, None);
}

#[test]
fn finalize_without_a_last_pose_still_reports() {
    let config = test_config(100.0, 100.0);
    let start = Instant::now();
    let mut aggregator = MetricsAggregator::new(pose(0.0, 0.0), &config, start);
    aggregator.tick(pose(3.0, 4.0), start + Duration::from_secs(1));

    let report = aggregator.finalize(None, start + Duration::from_secs(2));
    assert!((report.traveled_distance - 5.0).abs() < 1e-9);
    assert_eq!(report.elapsed_time, None);
    assert_eq!(report.min_range, None);
    assert!(report.range_history.is_empty());
    assert!(report.linear_history.is_empty());
    assert!(report.angular_history.is_empty());
}
