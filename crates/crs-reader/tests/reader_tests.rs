//! Reader integration tests over synthetic archives.

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use crs_common::Campaign;
use crs_reader::{
    range_query, read_archive, read_impacts, QueryConfig, ReaderError,
};
use test_utils::{
    write_impacts_archive, write_malformed_archive, write_netcdf_archive, ImpactsArchiveSpec,
};

fn query_config(dir: &std::path::Path) -> QueryConfig {
    QueryConfig {
        data_dir: dir.to_path_buf(),
        ..QueryConfig::default()
    }
}

#[test]
fn test_impacts_epoch_times_and_km_heights() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMPACTS_CRS_L1B_19700101_P3B.h5");
    write_impacts_archive(&path, &ImpactsArchiveSpec::default()).unwrap();

    let file = read_impacts(&path).unwrap();

    assert_eq!(
        file.times,
        vec![
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 1, 0).unwrap(),
        ]
    );
    assert_eq!(file.heights_km, vec![1.0, 2.0]);
    assert_eq!(file.reflectivity.dim(), (2, 2));
    let velocity = file.doppler_velocity.as_ref().expect("velocity present");
    assert_eq!(velocity.dim(), (2, 2));
    assert_eq!(file.reflectivity[[1, 0]], 2.0);
    assert_eq!(velocity[[1, 1]], 103.0);
}

#[test]
fn test_impacts_metadata_attributes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMPACTS_CRS_L1B_20200207_P3B.h5");
    let spec = ImpactsArchiveSpec {
        attrs: vec![
            ("Aircraft".to_string(), "P-3B".to_string()),
            ("ProcessingLevel".to_string(), "L1B".to_string()),
            ("Quality".to_string(), "Provisional".to_string()),
            ("FlightDate".to_string(), "2020-02-07".to_string()),
            ("Mission".to_string(), "IMPACTS".to_string()),
        ],
        ..ImpactsArchiveSpec::default()
    };
    write_impacts_archive(&path, &spec).unwrap();

    let file = read_impacts(&path).unwrap();
    let meta = &file.metadata;
    assert_eq!(meta.flight_info, "P-3B");
    assert_eq!(meta.quality, "Provisional");
    assert_eq!(
        meta.flight_date,
        chrono::NaiveDate::from_ymd_opt(2020, 2, 7)
    );
    assert_eq!(meta.extra.get("mission").map(String::as_str), Some("IMPACTS"));
    // Placeholders survive when the file does not override them.
    assert_eq!(meta.instrument, "CRS");
}

#[test]
fn test_impacts_metadata_defaults_without_attrs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMPACTS_CRS_L1B_20200207_P3B.h5");
    write_impacts_archive(&path, &ImpactsArchiveSpec::default()).unwrap();

    let file = read_impacts(&path).unwrap();
    assert_eq!(file.metadata.processing_level, "L1B");
    assert_eq!(file.metadata.quality, "Good");
    assert_eq!(file.metadata.latitude, 0.0);
}

#[test]
fn test_impacts_without_velocity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMPACTS_CRS_L1B_20200207_P3B.h5");
    let spec = ImpactsArchiveSpec {
        with_velocity: false,
        ..ImpactsArchiveSpec::default()
    };
    write_impacts_archive(&path, &spec).unwrap();

    let file = read_impacts(&path).unwrap();
    assert!(file.doppler_velocity.is_none());
    assert_eq!(file.reflectivity.dim(), (2, 2));
}

#[test]
fn test_impacts_missing_reflectivity_is_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMPACTS_CRS_L1B_20200207_P3B.h5");

    // A structurally valid HDF5 file lacking the Products tree.
    let file = hdf5::File::create(&path).unwrap();
    let time_group = file.create_group("Time").unwrap().create_group("Data").unwrap();
    time_group
        .new_dataset_builder()
        .with_data(&[0.0f64, 60.0])
        .create("TimeUTC")
        .unwrap();
    drop(file);

    let err = read_impacts(&path).unwrap_err();
    assert!(matches!(err, ReaderError::MissingData(_)), "got {err:?}");
}

#[test]
fn test_impacts_unopenable_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMPACTS_CRS_L1B_20200207_P3B.h5");
    write_malformed_archive(&path).unwrap();

    let err = read_impacts(&path).unwrap_err();
    assert!(matches!(err, ReaderError::Archive(_)), "got {err:?}");
}

#[test]
fn test_olympex_hour_offsets() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("olympex_CRS_20151112.nc");
    write_netcdf_archive(
        &path,
        Campaign::Olympex,
        &[14.0, 14.5],
        &[1000.0, 2000.0, 3000.0],
        true,
    )
    .unwrap();

    let base = Utc.with_ymd_and_hms(2015, 11, 12, 0, 0, 0).unwrap();
    let file = read_archive(&path, Campaign::Olympex, Some(base)).unwrap();

    assert_eq!(
        file.times,
        vec![
            Utc.with_ymd_and_hms(2015, 11, 12, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2015, 11, 12, 14, 30, 0).unwrap(),
        ]
    );
    assert_eq!(file.heights_km, vec![1.0, 2.0, 3.0]);
    assert_eq!(file.reflectivity.dim(), (2, 3));
    assert_eq!(file.reflectivity[[1, 2]], 5.0);
    assert_eq!(
        file.metadata.flight_date,
        chrono::NaiveDate::from_ymd_opt(2015, 11, 12)
    );
}

#[test]
fn test_goesrplt_field_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("GOESR_CRS_L1B_20170422_v0.nc");
    write_netcdf_archive(&path, Campaign::GoesRPlt, &[10.25], &[500.0], false).unwrap();

    let base = Utc.with_ymd_and_hms(2017, 4, 22, 0, 0, 0).unwrap();
    let file = read_archive(&path, Campaign::GoesRPlt, Some(base)).unwrap();

    assert_eq!(
        file.times,
        vec![Utc.with_ymd_and_hms(2017, 4, 22, 10, 15, 0).unwrap()]
    );
    assert_eq!(file.heights_km, vec![0.5]);
    assert!(file.doppler_velocity.is_none());
}

#[test]
fn test_netcdf_campaign_requires_base_date() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("olympex_CRS_20151112.nc");
    write_netcdf_archive(&path, Campaign::Olympex, &[14.0], &[1000.0], true).unwrap();

    let err = read_archive(&path, Campaign::Olympex, None).unwrap_err();
    assert!(matches!(err, ReaderError::Conversion(_)), "got {err:?}");
}

#[test]
fn test_range_query_skips_malformed_file() {
    let dir = tempdir().unwrap();

    let first = ImpactsArchiveSpec {
        time_seconds: vec![0.0, 60.0],
        ..ImpactsArchiveSpec::default()
    };
    write_impacts_archive(
        &dir.path().join("IMPACTS_CRS_L1B_20200201_P3B.h5"),
        &first,
    )
    .unwrap();

    write_malformed_archive(&dir.path().join("IMPACTS_CRS_L1B_20200205_P3B.h5")).unwrap();

    let third = ImpactsArchiveSpec {
        time_seconds: vec![120.0, 180.0],
        ..ImpactsArchiveSpec::default()
    };
    write_impacts_archive(
        &dir.path().join("IMPACTS_CRS_L1B_20200207_P3B.h5"),
        &third,
    )
    .unwrap();

    let start = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2020, 2, 7, 23, 59, 59).unwrap();
    let result = range_query(&query_config(dir.path()), Campaign::Impacts, start, end).unwrap();

    assert_eq!(result.files_read, 2);
    assert_eq!(result.files_skipped, 1);
    assert!(!result.is_empty_data());
    // Two files, 2x2 cells each.
    assert_eq!(result.observations.len(), 8);
    // File-date order: the 02-01 file's cells come first.
    assert_eq!(
        result.observations[0].timestamp,
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        result.observations[4].timestamp,
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 2, 0).unwrap()
    );
}

#[test]
fn test_range_query_filters_by_embedded_date() {
    let dir = tempdir().unwrap();
    write_impacts_archive(
        &dir.path().join("IMPACTS_CRS_L1B_20200201_P3B.h5"),
        &ImpactsArchiveSpec::default(),
    )
    .unwrap();
    write_impacts_archive(
        &dir.path().join("IMPACTS_CRS_L1B_20200301_P3B.h5"),
        &ImpactsArchiveSpec::default(),
    )
    .unwrap();

    let start = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2020, 2, 28, 0, 0, 0).unwrap();
    let result = range_query(&query_config(dir.path()), Campaign::Impacts, start, end).unwrap();

    assert_eq!(result.files_read, 1);
    assert_eq!(result.observations.len(), 4);
}

#[test]
fn test_range_query_empty_directory() {
    let dir = tempdir().unwrap();
    let start = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2020, 2, 28, 0, 0, 0).unwrap();
    let result = range_query(&query_config(dir.path()), Campaign::Impacts, start, end).unwrap();

    assert!(result.is_empty_data());
    assert_eq!(result.files_read, 0);
    assert_eq!(result.files_skipped, 0);
    assert!(result.observations.is_empty());
}

#[test]
fn test_range_query_ignores_unconventional_names() {
    let dir = tempdir().unwrap();
    write_impacts_archive(
        &dir.path().join("notes.h5"),
        &ImpactsArchiveSpec::default(),
    )
    .unwrap();

    let start = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2020, 2, 28, 0, 0, 0).unwrap();
    let result = range_query(&query_config(dir.path()), Campaign::Impacts, start, end).unwrap();

    assert!(result.is_empty_data());
}

#[test]
fn test_discover_files_sorted() {
    let dir = tempdir().unwrap();
    for name in [
        "IMPACTS_CRS_L1B_20200207_P3B.h5",
        "IMPACTS_CRS_L1B_20200201_P3B.h5",
        "IMPACTS_CRS_L1B_20200205_P3B.h5",
    ] {
        write_impacts_archive(&dir.path().join(name), &ImpactsArchiveSpec::default()).unwrap();
    }

    let files = crs_reader::discover_files(dir.path(), Campaign::Impacts).unwrap();
    let dates: Vec<_> = files.iter().map(|f| f.date.to_string()).collect();
    assert_eq!(dates, vec!["2020-02-01", "2020-02-05", "2020-02-07"]);
}
