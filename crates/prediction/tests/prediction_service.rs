//! End-to-end predictions against fixture CSV tables and grids.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use grid_processor::GridProcessorConfig;
use harmonics::{
    hours_between, tide_height, AstronomicalNodal, CoefficientTable, ConstituentParam, NodalCorrection,
    PhaseConvention, PredictionParams,
};
use prediction::{
    DatumOffsetEntry, DatumOffsetTable, OutputZone, OverrideConstituent, PredictionError, PredictionRequest,
    PredictionService, SourceKind, StationOverride, StationOverrideTable,
};
use storage::metadata::SOURCE_BOTH;
use storage::{LocationGridSampler, MetadataSampler, StationCsvSource, StoreError};
use test_utils::{
    assert_approx_eq, axis, constant_grid, cosine_heights, init_test_tracing, temp_test_dir, write_constituent_grid,
    write_scalar_grid, write_station_csv,
};
use tide_common::Classify;

const M2_SPEED: f64 = 28.9841042;
const LAT: f64 = 35.5;
const LON: f64 = 135.5;

// ============================================================================
// Fixtures
// ============================================================================

fn unix_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// Station `TEST` with a unit M2 and an M2 grid over lat 30..40, lon 130..140.
fn data_dir() -> tempfile::TempDir {
    let dir = temp_test_dir();
    write_station_csv(dir.path(), "TEST", &[("M2", 1.0, 0.0)]);

    let lats = axis(30.0, 1.0, 11);
    let lons = axis(130.0, 1.0, 11);
    write_constituent_grid(
        dir.path(),
        "M2.nc",
        lats,
        lons,
        constant_grid(11, 11, 0.8),
        constant_grid(11, 11, 30.0),
    );
    dir
}

fn builder(dir: &Path) -> prediction::PredictionServiceBuilder {
    PredictionService::builder(StationCsvSource::new(dir), LocationGridSampler::new(dir))
}

fn service(dir: &Path) -> PredictionService {
    builder(dir).build()
}

/// M2 with `f = 1`, `u = 0` and the given equilibrium argument.
fn flat_m2_table(v0: f64) -> CoefficientTable {
    CoefficientTable::from_json_str(&format!(r#"{{"coeffs":[{{"name":"M2","f0":1.0,"v0":{v0}}}]}}"#)).unwrap()
}

/// Unrounded height the service should produce for a location request.
fn expected_location_height(constituents: Vec<ConstituentParam>, msl_m: f64, t: DateTime<Utc>) -> f64 {
    let epoch = SourceKind::Fes.reference_epoch();
    let params = PredictionParams {
        constituents,
        msl_m,
        longitude_deg: LON,
        nodal: Arc::new(AstronomicalNodal::new(epoch)),
        reference_time: epoch,
        phase_convention: PhaseConvention::Greenwich,
    };
    tide_height(t, &params)
}

fn location_request() -> PredictionRequest {
    PredictionRequest::for_location(LAT, LON, t0(), t0() + Duration::hours(3), Duration::hours(1))
}

// ============================================================================
// Station predictions
// ============================================================================

#[test]
fn test_station_m2_matches_closed_form() {
    init_test_tracing();
    let dir = data_dir();
    let service = builder(dir.path()).coefficients(flat_m2_table(0.0)).build();

    let start = unix_epoch();
    let request = PredictionRequest::for_station("TEST", start, start + Duration::hours(2), Duration::minutes(30));
    let response = service.predict(&request).unwrap();

    assert_eq!(response.source, "csv");
    assert_eq!(response.datum, "MSL");
    assert_eq!(response.timezone, "+00:00");
    assert_eq!(response.constituents, vec!["M2"]);
    assert_eq!(response.predictions.len(), 5);
    assert_eq!(response.predictions[0].time, "1970-01-01T00:00:00Z");
    assert_eq!(response.predictions[4].time, "1970-01-01T02:00:00Z");

    let expected = cosine_heights(1.0, M2_SPEED, 0.0, &[0.0, 0.5, 1.0, 1.5, 2.0]);
    for (point, want) in response.predictions.iter().zip(&expected) {
        assert_approx_eq!(point.height_m, *want, 5e-4);
        assert!(point.depth_m.is_none());
    }

    assert_eq!(response.meta["model"], "harmonic_v0");
    assert_eq!(response.meta["attribution"], SourceKind::Csv.attribution());
    assert!(response.msl_m.is_none());
    assert!(response.seabed_depth_m.is_none());
}

#[test]
fn test_station_uses_astronomical_nodal_factors() {
    let dir = data_dir();
    let service = service(dir.path());

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let request = PredictionRequest::for_station("test", start, start + Duration::hours(6), Duration::hours(1));
    let response = service.predict(&request).unwrap();

    let nodal = AstronomicalNodal::new(unix_epoch());
    for (i, point) in response.predictions.iter().enumerate() {
        let hours = hours_between(start + Duration::hours(i as i64), unix_epoch());
        let factors = nodal.factors("M2", hours);
        let want = factors.f * (M2_SPEED * hours + factors.u_deg).to_radians().cos();
        assert_approx_eq!(point.height_m, want, 5e-4);
    }
}

#[test]
fn test_equilibrium_argument_convention() {
    let dir = data_dir();
    let service = builder(dir.path()).coefficients(flat_m2_table(90.0)).build();

    let start = unix_epoch();
    let greenwich = PredictionRequest::for_station("TEST", start, start + Duration::hours(1), Duration::hours(1));
    let vu = greenwich.clone().with_phase_convention(PhaseConvention::from_selector("vu"));

    // Greenwich ignores V; the equilibrium form shifts M2 by a quarter cycle
    let g = service.predict(&greenwich).unwrap();
    let v = service.predict(&vu).unwrap();
    assert_approx_eq!(g.predictions[0].height_m, 1.0, 1e-9);
    assert_approx_eq!(v.predictions[0].height_m, 0.0, 1e-9);
}

#[test]
fn test_extrema_refined_from_dense_series() {
    let dir = data_dir();
    let service = builder(dir.path()).coefficients(flat_m2_table(0.0)).build();

    let start = unix_epoch();
    let request = PredictionRequest::for_station("TEST", start, start + Duration::hours(48), Duration::hours(3));
    let response = service.predict(&request).unwrap();

    assert_eq!(response.predictions.len(), 17);
    // One M2 cycle is ~12.42 h; the crest at t = 0 is an endpoint, not a local maximum
    assert_eq!(response.extrema.highs.len(), 3);
    assert_eq!(response.extrema.lows.len(), 4);

    for high in &response.extrema.highs {
        assert_approx_eq!(high.height_m, 1.0, 1e-3);
    }
    for low in &response.extrema.lows {
        assert_approx_eq!(low.height_m, -1.0, 1e-3);
    }

    // First low at half a period: 6.21 h ≈ 06:12:36
    assert!(response.extrema.lows[0].time.starts_with("1970-01-01T06:12:"));
}

#[test]
fn test_jst_output() {
    let dir = data_dir();
    let service = service(dir.path());

    let request = PredictionRequest::for_station("TEST", unix_epoch(), unix_epoch() + Duration::hours(1), Duration::hours(1))
        .with_timezone(OutputZone::from_selector("jst"))
        .with_datum("LAT");
    let response = service.predict(&request).unwrap();

    assert_eq!(response.timezone, "+09:00");
    assert_eq!(response.datum, "LAT");
    assert_eq!(response.predictions[0].time, "1970-01-01T09:00:00+09:00");
    assert_eq!(response.predictions[1].time, "1970-01-01T10:00:00+09:00");
}

#[test]
fn test_unknown_station() {
    let dir = data_dir();
    let request = PredictionRequest::for_station("NOPE", t0(), t0() + Duration::hours(1), Duration::hours(1));
    let err = service(dir.path()).predict(&request).unwrap_err();
    assert!(matches!(err, PredictionError::Store(StoreError::StationIo { .. })));
    assert_eq!(err.http_status_code(), 404);
}

// ============================================================================
// Location predictions
// ============================================================================

#[test]
fn test_location_prediction() {
    init_test_tracing();
    let dir = data_dir();
    let response = service(dir.path()).predict(&location_request()).unwrap();

    assert_eq!(response.source, "fes");
    assert_eq!(response.constituents, vec!["M2"]);
    assert_eq!(response.predictions.len(), 4);
    assert_eq!(response.meta["attribution"], SourceKind::Fes.attribution());
    assert!(!response.meta.contains_key("datum_offset_m"));

    let m2 = ConstituentParam::from_catalogue("M2", 0.8, 30.0).unwrap();
    for (i, point) in response.predictions.iter().enumerate() {
        let want = expected_location_height(vec![m2.clone()], 0.0, t0() + Duration::hours(i as i64));
        assert_approx_eq!(point.height_m, want, 5e-4);
    }
}

#[test]
fn test_source_mismatch_rejected() {
    let dir = data_dir();
    let request = location_request().with_source(SourceKind::Csv);
    let err = service(dir.path()).predict(&request).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_outside_grid_coverage() {
    let dir = data_dir();
    let request = PredictionRequest::for_location(10.0, 135.0, t0(), t0() + Duration::hours(1), Duration::hours(1));
    let err = service(dir.path()).predict(&request).unwrap_err();
    assert!(matches!(err, PredictionError::Store(StoreError::OutsideCoverage { .. })));
}

// ============================================================================
// Datum offsets and overrides
// ============================================================================

#[test]
fn test_explicit_datum_offset() {
    let dir = data_dir();
    let service = service(dir.path());

    let base = service.predict(&location_request()).unwrap();
    let shifted = service.predict(&location_request().with_datum_offset(0.25)).unwrap();

    assert_eq!(shifted.meta["datum_offset_m"], "0.250");
    for (a, b) in base.predictions.iter().zip(&shifted.predictions) {
        assert_approx_eq!(b.height_m - a.height_m, 0.25, 1.5e-3);
    }
}

#[test]
fn test_auto_datum_offset() {
    let dir = data_dir();
    let offsets = DatumOffsetTable::new(vec![
        DatumOffsetEntry { name: "near".into(), lat: LAT + 0.2, lon: LON, offset_m: 1.0 },
        DatumOffsetEntry { name: "far".into(), lat: 0.0, lon: 0.0, offset_m: 5.0 },
    ]);
    let base = service(dir.path()).predict(&location_request()).unwrap();
    let service = builder(dir.path()).datum_offsets(offsets).build();

    let auto = service.predict(&location_request()).unwrap();
    for (a, b) in base.predictions.iter().zip(&auto.predictions) {
        assert_approx_eq!(b.height_m - a.height_m, 1.0, 1.5e-3);
    }
    assert!(!auto.meta.contains_key("datum_offset_m"));

    // An explicit offset replaces the automatic one
    let explicit = service.predict(&location_request().with_datum_offset(0.0)).unwrap();
    assert_eq!(explicit.predictions, base.predictions);
    assert_eq!(explicit.meta["datum_offset_m"], "0.000");

    // Out of range: ~220 km north
    let far = PredictionRequest::for_location(LAT + 2.0, LON, t0(), t0() + Duration::hours(3), Duration::hours(1));
    let far_base = builder(dir.path()).build().predict(&far).unwrap();
    assert_eq!(service.predict(&far).unwrap().predictions, far_base.predictions);
}

#[test]
fn test_station_override() {
    let dir = data_dir();
    let overrides = StationOverrideTable::new(vec![StationOverride {
        name: "Harbour".into(),
        station: Some("HB".into()),
        lat: LAT,
        lon: LON + 0.1,
        radius_km: 0.0,
        datum_offset_m: Some(0.2),
        constituents: vec![
            OverrideConstituent { name: "M2".into(), amplitude_m: 0.5, phase_deg: -60.0 },
            OverrideConstituent { name: "K1".into(), amplitude_m: 0.25, phase_deg: 10.0 },
        ],
    }]);
    let service = builder(dir.path()).overrides(overrides).build();

    let response = service.predict(&location_request()).unwrap();
    assert_eq!(response.constituents, vec!["M2", "K1"]);

    let constituents = vec![
        ConstituentParam::from_catalogue("M2", 0.5, 300.0).unwrap(),
        ConstituentParam::from_catalogue("K1", 0.25, 10.0).unwrap(),
    ];
    let want = expected_location_height(constituents, 0.2, t0());
    assert_approx_eq!(response.predictions[0].height_m, want, 5e-4);

    // Station queries never match overrides
    let station = PredictionRequest::for_station("TEST", t0(), t0() + Duration::hours(1), Duration::hours(1));
    assert_eq!(service.predict(&station).unwrap().constituents, vec!["M2"]);
}

// ============================================================================
// Metadata enrichment
// ============================================================================

struct MetadataGrids {
    _dir: tempfile::TempDir,
    sampler_dir: std::path::PathBuf,
}

/// Elevation -50 m and mean sea surface 0.3 m over the constituent grid area.
fn metadata_grids() -> MetadataGrids {
    let dir = temp_test_dir();
    let lats = axis(30.0, 1.0, 11);
    let lons = axis(130.0, 1.0, 11);
    write_scalar_grid(&dir.path().join("gebco.nc"), "elevation", lats.clone(), lons.clone(), constant_grid(11, 11, -50.0));
    write_scalar_grid(&dir.path().join("mss.nc"), "mean_sea_surf_sol2", lats, lons, constant_grid(11, 11, 0.3));
    let sampler_dir = dir.path().to_path_buf();
    MetadataGrids { _dir: dir, sampler_dir }
}

fn metadata_sampler(grids: &MetadataGrids) -> MetadataSampler {
    MetadataSampler::new(
        Some(grids.sampler_dir.join("gebco.nc")),
        Some(grids.sampler_dir.join("mss.nc")),
        None,
        &GridProcessorConfig::default(),
    )
}

#[test]
fn test_metadata_enrichment() {
    let dir = data_dir();
    let grids = metadata_grids();
    let service = builder(dir.path()).metadata(metadata_sampler(&grids)).build();

    let base = builder(dir.path()).build().predict(&location_request()).unwrap();
    let response = service.predict(&location_request()).unwrap();

    assert_approx_eq!(response.msl_m.unwrap(), 0.3, 1e-9);
    assert_approx_eq!(response.seabed_depth_m.unwrap(), 50.0, 1e-9);
    assert_eq!(response.meta["metadata_source"], SOURCE_BOTH);
    assert_eq!(response.meta["datum_name"], "EGM2008");

    for (a, b) in base.predictions.iter().zip(&response.predictions) {
        assert_approx_eq!(b.height_m - a.height_m, 0.3, 1.5e-3);
        assert_approx_eq!(b.depth_m.unwrap(), 50.3 + b.height_m, 1.5e-3);
    }
    for high in &response.extrema.highs {
        assert!(high.depth_m.is_some());
    }
}

#[test]
fn test_metadata_failure_is_not_fatal() {
    let dir = data_dir();
    let sampler = MetadataSampler::new(
        Some(dir.path().join("missing_gebco.nc")),
        None,
        None,
        &GridProcessorConfig::default(),
    );
    let service = builder(dir.path()).metadata(sampler).build();

    let response = service.predict(&location_request()).unwrap();
    assert!(response.msl_m.is_none());
    assert!(response.seabed_depth_m.is_none());
    assert!(!response.meta.contains_key("metadata_source"));
    assert!(response.predictions.iter().all(|p| p.depth_m.is_none()));
}

#[test]
fn test_bathymetry_lookup() {
    let dir = data_dir();
    let grids = metadata_grids();
    let service = builder(dir.path()).metadata(metadata_sampler(&grids)).build();

    let metadata = service.bathymetry(LAT, LON).unwrap();
    assert_eq!(metadata.depth_m, Some(50.0));
    assert_approx_eq!(metadata.msl_m, 0.3, 1e-9);

    let err = service.bathymetry(-45.0, 10.0).unwrap_err();
    assert!(matches!(err, PredictionError::Store(StoreError::NoMetadata { .. })));
    assert!(err.is_data_unavailable());
}

// ============================================================================
// Async entry point
// ============================================================================

#[tokio::test]
async fn test_predict_async() {
    let dir = data_dir();
    let service = service(dir.path());

    let response = service.predict_async(location_request()).await.unwrap();
    assert_eq!(response.predictions.len(), 4);

    let err = service
        .predict_async(PredictionRequest::for_station("NOPE", t0(), t0() + Duration::hours(1), Duration::hours(1)))
        .await
        .unwrap_err();
    assert!(err.is_data_unavailable());
}

#[tokio::test]
async fn test_concurrent_clones_share_state() {
    let dir = data_dir();
    let grids = metadata_grids();
    let service = builder(dir.path()).metadata(metadata_sampler(&grids)).build();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            let request = PredictionRequest::for_location(
                LAT + 0.1 * i as f64,
                LON,
                t0(),
                t0() + Duration::hours(2),
                Duration::hours(1),
            );
            tokio::spawn(async move { service.predict_async(request).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_approx_eq!(response.seabed_depth_m.unwrap(), 50.0, 1e-9);
    }
}
