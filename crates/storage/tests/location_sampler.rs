//! Gridded constituent sampling against fixture files.

use storage::{ConstituentSource, LocationGridSampler, StoreError};
use test_utils::{
    assert_approx_eq, axis, constant_grid, field_over, init_test_tracing, nested_dir, temp_test_dir,
    write_complex_grid, write_constituent_grid, GridFixture,
};
use tide_common::Classify;

// ============================================================================
// Helpers
// ============================================================================

/// Global 0–360 grid at 10° spacing.
fn global_axes() -> (Vec<f64>, Vec<f64>) {
    (axis(-80.0, 10.0, 17), axis(0.0, 10.0, 36))
}

// ============================================================================
// Direct amplitude/phase grids
// ============================================================================

#[test]
fn test_combined_file_bilinear_sample() {
    init_test_tracing();
    let dir = temp_test_dir();
    let (lats, lons) = global_axes();
    let amp = field_over(&lats, &lons, |lat, lon| 1.0 + lat / 100.0 + lon / 1000.0);
    let pha = constant_grid(lons.len(), lats.len(), 45.0);
    write_constituent_grid(dir.path(), "m2.nc", lats, lons, amp, pha);

    let sampler = LocationGridSampler::new(dir.path());
    let params = sampler.load_for_location(35.0, 135.0).unwrap();

    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "M2");
    assert_approx_eq!(params[0].amplitude_m, 1.0 + 0.35 + 0.135, 1e-9);
    assert_approx_eq!(params[0].phase_deg, 45.0, 1e-9);
    assert_eq!(params[0].speed_deg_per_hour, 28.9841042);
}

#[test]
fn test_negative_longitude_wraps_onto_360_axis() {
    let dir = temp_test_dir();
    let (lats, lons) = global_axes();
    let amp = field_over(&lats, &lons, |_, lon| lon / 100.0);
    let pha = constant_grid(lons.len(), lats.len(), 10.0);
    write_constituent_grid(dir.path(), "k1.nc", lats, lons, amp, pha);

    let sampler = LocationGridSampler::new(dir.path());
    let west = sampler.load_for_location(0.0, -220.0).unwrap();
    let east = sampler.load_for_location(0.0, 140.0).unwrap();

    assert_approx_eq!(west[0].amplitude_m, 1.4, 1e-9);
    assert_approx_eq!(west[0].amplitude_m, east[0].amplitude_m, 1e-12);
}

#[test]
fn test_split_files_and_priority_order() {
    let dir = temp_test_dir();
    let (lats, lons) = global_axes();
    let n = lats.len() * lons.len();

    for (name, amp) in [("s2", 0.3), ("m2", 0.9)] {
        GridFixture::new(lats.clone(), lons.clone())
            .variable("amplitude", vec![amp; n])
            .write(&dir.path().join(format!("{name}_amplitude.nc")));
        GridFixture::new(lats.clone(), lons.clone())
            .variable("phase", vec![370.0; n])
            .write(&dir.path().join(format!("{name}_phase.nc")));
    }

    let sampler = LocationGridSampler::new(dir.path());
    let params = sampler.load_for_location(12.0, 34.0).unwrap();
    let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["M2", "S2"]);
    assert_approx_eq!(params[0].amplitude_m, 0.9, 1e-12);
    // Phase wrapped into [0, 360)
    assert_approx_eq!(params[0].phase_deg, 10.0, 1e-9);

    assert_eq!(sampler.available_constituents().unwrap(), vec!["M2", "S2"]);
}

// ============================================================================
// Encodings and unit conventions
// ============================================================================

#[test]
fn test_fill_value_is_not_a_physical_amplitude() {
    let dir = temp_test_dir();
    let lats = axis(0.0, 1.0, 2);
    let lons = axis(0.0, 1.0, 2);
    GridFixture::new(lats, lons)
        .variable_with_fill("amplitude", vec![9999.0, 9999.0, 9999.0, 9999.0], 9999.0)
        .variable("phase", vec![0.0; 4])
        .write(&dir.path().join("o1.nc"));

    let params = LocationGridSampler::new(dir.path())
        .load_for_location(0.5, 0.5)
        .unwrap();
    assert_eq!(params[0].amplitude_m, 0.0);
}

#[test]
fn test_ocean_tide_centimetres_become_metres() {
    let dir = temp_test_dir();
    let sub = nested_dir(dir.path(), "fes2014/ocean_tide");
    let (lats, lons) = global_axes();
    let n = lats.len() * lons.len();
    write_constituent_grid(&sub, "m2.nc", lats, lons, vec![100.0; n], vec![0.0; n]);

    let params = LocationGridSampler::new(dir.path())
        .load_for_location(-20.0, 200.0)
        .unwrap();
    assert_approx_eq!(params[0].amplitude_m, 1.0, 1e-12);
}

#[test]
fn test_complex_pair_derives_amplitude_and_phase() {
    let dir = temp_test_dir();
    let sub = nested_dir(dir.path(), "ocean_tide");
    let lats = axis(0.0, 1.0, 3);
    let lons = axis(0.0, 1.0, 3);
    // re = 0, im = -300 cm everywhere: amplitude 3 m, phase 270°
    write_complex_grid(&sub, "n2.nc", lats, lons, vec![0.0; 9], vec![-300.0; 9]);

    let params = LocationGridSampler::new(dir.path())
        .load_for_location(1.5, 0.5)
        .unwrap();
    assert_eq!(params[0].name, "N2");
    assert_approx_eq!(params[0].amplitude_m, 3.0, 1e-9);
    assert_approx_eq!(params[0].phase_deg, 270.0, 1e-9);
}

#[test]
fn test_transposed_grid() {
    let dir = temp_test_dir();
    let lats = axis(30.0, 1.0, 3);
    let lons = axis(130.0, 1.0, 4);
    let amp = field_over(&lats, &lons, |lat, lon| lat + lon / 100.0);
    let pha = constant_grid(4, 3, 5.0);
    GridFixture::new(lats, lons)
        .transposed()
        .variable("amplitude", amp)
        .variable("phase", pha)
        .write(&dir.path().join("q1.nc"));

    let params = LocationGridSampler::new(dir.path())
        .load_for_location(31.5, 132.5)
        .unwrap();
    assert_approx_eq!(params[0].amplitude_m, 31.5 + 1.325, 1e-9);
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_point_outside_coverage_fails_request() {
    let dir = temp_test_dir();
    let lats = axis(30.0, 1.0, 3);
    let lons = axis(130.0, 1.0, 3);
    write_constituent_grid(dir.path(), "m2.nc", lats, lons, vec![1.0; 9], vec![0.0; 9]);

    let err = LocationGridSampler::new(dir.path())
        .load_for_location(10.0, 131.0)
        .unwrap_err();
    assert!(matches!(err, StoreError::OutsideCoverage { ref constituent, .. } if constituent == "M2"));
    assert!(err.is_data_unavailable());
}

#[test]
fn test_unreadable_constituent_is_skipped() {
    let dir = temp_test_dir();
    let (lats, lons) = global_axes();
    let n = lats.len() * lons.len();
    write_constituent_grid(dir.path(), "m2.nc", lats, lons, vec![1.0; n], vec![0.0; n]);
    std::fs::write(dir.path().join("s2.nc"), b"not a netcdf file").unwrap();

    let params = LocationGridSampler::new(dir.path())
        .load_for_location(0.0, 0.0)
        .unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "M2");
}

#[test]
fn test_no_files() {
    let dir = temp_test_dir();
    let err = LocationGridSampler::new(dir.path())
        .load_for_location(0.0, 0.0)
        .unwrap_err();
    assert!(matches!(err, StoreError::NoGridFiles(_)));
}

#[test]
fn test_only_broken_files() {
    let dir = temp_test_dir();
    std::fs::write(dir.path().join("m2.nc"), b"garbage").unwrap();
    let err = LocationGridSampler::new(dir.path())
        .load_for_location(0.0, 0.0)
        .unwrap_err();
    assert!(matches!(err, StoreError::NoConstituents { .. }));
}
