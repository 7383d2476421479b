//! Behavioral tests for time-range subsetting.

use chrono::Duration;
use crs_common::TimeWindow;
use crs_subset::subset;
use test_utils::{flight_start, minute_times, radar_file, radar_file_without_velocity};

#[test]
fn test_open_window_selects_whole_file() {
    let file = radar_file(5, 3);
    let result = subset(&file, &TimeWindow::all());

    assert_eq!(result.times, file.times);
    assert_eq!(result.heights_km, file.heights_km);
    assert_eq!(result.reflectivity, file.reflectivity);
    assert_eq!(result.doppler_velocity.as_ref(), file.doppler_velocity.as_ref());
}

#[test]
fn test_times_are_ordered_subsequence_within_bounds() {
    let file = radar_file(10, 2);
    let start = flight_start() + Duration::minutes(3);
    let end = flight_start() + Duration::minutes(7);
    let result = subset(&file, &TimeWindow::between(start, end));

    assert!(result.times.windows(2).all(|w| w[0] < w[1]));
    assert!(result.times.iter().all(|t| *t >= start && *t <= end));
    assert!(result.times.iter().all(|t| file.times.contains(t)));
    assert_eq!(result.num_times(), 5);
}

#[test]
fn test_rows_follow_selected_times() {
    let file = radar_file(4, 3);
    let start = flight_start() + Duration::minutes(2);
    let result = subset(&file, &TimeWindow::new(Some(start), None));

    // Rows 2 and 3 of the deterministic cell matrix.
    assert_eq!(result.reflectivity.dim(), (2, 3));
    assert_eq!(result.reflectivity[[0, 0]], 6.0);
    assert_eq!(result.reflectivity[[1, 2]], 11.0);
    let velocity = result.doppler_velocity.expect("fixture has velocity");
    assert_eq!(velocity[[0, 0]], 106.0);
}

#[test]
fn test_exact_boundary_matches_one_row() {
    let file = radar_file(5, 2);
    let exact = minute_times(5)[2];
    let result = subset(&file, &TimeWindow::between(exact, exact));

    assert_eq!(result.times, vec![exact]);
    assert_eq!(result.reflectivity.dim(), (1, 2));
}

#[test]
fn test_window_outside_span_is_empty_not_error() {
    let file = radar_file(3, 2);
    let start = flight_start() + Duration::hours(5);
    let end = flight_start() + Duration::hours(6);
    let result = subset(&file, &TimeWindow::between(start, end));

    assert!(result.is_empty());
    assert_eq!(result.reflectivity.dim(), (0, 2));
    assert_eq!(result.heights_km, file.heights_km);
    assert!(result.time_span().is_none());
}

#[test]
fn test_idempotence() {
    let file = radar_file(8, 4);
    let window = TimeWindow::between(
        flight_start() + Duration::minutes(1),
        flight_start() + Duration::minutes(6),
    );

    let first = subset(&file, &window);
    let second = subset(&file, &window);

    assert_eq!(first.times, second.times);
    assert_eq!(first.reflectivity, second.reflectivity);
    assert_eq!(first.doppler_velocity, second.doppler_velocity);
}

#[test]
fn test_missing_velocity_stays_missing() {
    let file = radar_file_without_velocity(4, 2);
    let result = subset(&file, &TimeWindow::all());

    assert!(result.doppler_velocity.is_none());
    assert_eq!(result.reflectivity.dim(), (4, 2));
}

#[test]
fn test_subset_owns_its_data() {
    let file = radar_file(3, 2);
    let result = subset(&file, &TimeWindow::all());
    drop(file);

    // Still fully usable after the source file is gone.
    assert_eq!(result.num_times(), 3);
    assert_eq!(result.reflectivity[[2, 1]], 5.0);
}

#[test]
fn test_time_span() {
    let file = radar_file(5, 2);
    let result = subset(&file, &TimeWindow::all());
    let (start, end) = result.time_span().unwrap();
    assert_eq!(start, flight_start());
    assert_eq!(end, flight_start() + Duration::minutes(4));
}
