//! The prediction service.
//!
//! [`PredictionService`] ties the pieces together for one request:
//!
//! ```text
//! PredictionRequest
//!      │ validate
//!      ▼
//! Selector ──► station CSV / location grid ──► Vec<ConstituentParam>
//!      │
//!      ├─► MetadataSampler (location only, degraded on failure)
//!      ├─► datum offset: explicit, else nearest table entry
//!      ├─► station override (location only)
//!      ▼
//! synthesize ──► points at the requested interval
//!            └─► dense series ──► find_extrema ──► refine_extrema
//!      ▼
//! PredictionResponse
//! ```
//!
//! The service keeps no per-request state. Caches live in the samplers.

use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use harmonics::{
    all_constituents, find_extrema, refine_extrema, synthesize, AstronomicalNodal,
    CoefficientTable, Constituent, ConstituentParam, PredictionParams,
};
use storage::{
    ConstituentSource, ConstituentStore, GeoidSampler, LocationGridSampler, LocationMetadata,
    MetadataSampler, StationCsvSource, StoreError,
};
use tracing::{debug, info, warn};

use crate::adjustments::{load_optional_table, DatumOffsetTable, StationOverrideTable};
use crate::config::PredictionConfig;
use crate::error::{PredictionError, Result};
use crate::request::{PredictionRequest, Selector};
use crate::response::{ExtremaResponse, PointFormatter, PredictionResponse, MODEL_NAME};

/// Default datum label.
const DEFAULT_DATUM: &str = "MSL";

/// Tide predictions for stations and arbitrary locations.
///
/// Cheap to clone; clones share the same sources and caches.
#[derive(Debug, Clone)]
pub struct PredictionService {
    inner: Arc<ServiceInner>,
}

#[derive(Debug)]
struct ServiceInner {
    station: ConstituentStore,
    location: ConstituentStore,
    metadata: Option<MetadataSampler>,
    coefficients: Option<Arc<CoefficientTable>>,
    datum_offsets: Option<DatumOffsetTable>,
    overrides: Option<StationOverrideTable>,
}

/// Assembles a [`PredictionService`] from its parts.
#[derive(Debug)]
pub struct PredictionServiceBuilder {
    inner: ServiceInner,
}

impl PredictionServiceBuilder {
    pub fn metadata(mut self, sampler: MetadataSampler) -> Self {
        self.inner.metadata = Some(sampler);
        self
    }

    pub fn coefficients(mut self, table: CoefficientTable) -> Self {
        self.inner.coefficients = Some(Arc::new(table));
        self
    }

    pub fn datum_offsets(mut self, table: DatumOffsetTable) -> Self {
        self.inner.datum_offsets = Some(table);
        self
    }

    pub fn overrides(mut self, table: StationOverrideTable) -> Self {
        self.inner.overrides = Some(table);
        self
    }

    pub fn build(self) -> PredictionService {
        PredictionService {
            inner: Arc::new(self.inner),
        }
    }
}

impl PredictionService {
    /// Start from a station source and a location source with no
    /// metadata, nodal table or adjustments.
    pub fn builder(
        station: impl Into<ConstituentStore>,
        location: impl Into<ConstituentStore>,
    ) -> PredictionServiceBuilder {
        PredictionServiceBuilder {
            inner: ServiceInner {
                station: station.into(),
                location: location.into(),
                metadata: None,
                coefficients: None,
                datum_offsets: None,
                overrides: None,
            },
        }
    }

    /// Build the service described by `config`.
    ///
    /// Optional tables that are missing or unreadable are left out.
    pub fn from_config(config: &PredictionConfig) -> Result<Self> {
        config.validate().map_err(PredictionError::Config)?;

        let mut builder = Self::builder(
            StationCsvSource::new(&config.data_dir),
            LocationGridSampler::new(&config.fes_dir),
        );

        if config.has_metadata() {
            let geoid = config
                .geoid_egm2008_path
                .as_ref()
                .map(|path| GeoidSampler::new(path, &config.grid));
            builder = builder.metadata(MetadataSampler::new(
                config.bathymetry_gebco_path.clone(),
                config.bathymetry_mss_path.clone(),
                geoid,
                &config.grid,
            ));
        }

        if let Some(table) = load_coefficients(&config.astro_coeffs_path) {
            builder = builder.coefficients(table);
        }
        if let Some(table) = load_optional_table("datum offset", &config.datum_offsets_path) {
            builder = builder.datum_offsets(table);
        }
        if let Some(table) = load_optional_table("station override", &config.station_overrides_path) {
            builder = builder.overrides(table);
        }

        let service = builder.build();
        info!(
            data_dir = %config.data_dir.display(),
            fes_dir = %config.fes_dir.display(),
            metadata = service.inner.metadata.is_some(),
            nodal_table = service.inner.coefficients.is_some(),
            datum_offsets = service.inner.datum_offsets.is_some(),
            overrides = service.inner.overrides.is_some(),
            "Prediction service configured"
        );
        Ok(service)
    }

    /// Predict heights and extrema for `request`.
    ///
    /// Constituent source failures fail the request. Metadata failures only
    /// drop the depth and MSL enrichment.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        request.validate()?;
        let selector = request.selector()?;
        let source = selector.source();

        let mut constituents = self.load_constituents(selector)?;
        let location = selector.location();

        let metadata = location.and_then(|(lat, lon)| self.location_metadata(lat, lon));
        let mut msl_m = metadata.as_ref().map_or(0.0, |m| m.msl_m);

        if let Some(offset) = request.datum_offset_m {
            msl_m += offset;
        } else if let Some(offset) = location.and_then(|(lat, lon)| self.auto_datum_offset(lat, lon)) {
            msl_m += offset;
        }

        if let Some((lat, lon)) = location {
            if let Some(entry) = self.inner.overrides.as_ref().and_then(|t| t.matching(lat, lon)) {
                debug!(station = %entry.name, lat, lon, "Applying station override");
                entry.apply(&mut constituents);
                msl_m += entry.datum_offset_m.unwrap_or(0.0);
            }
        }

        let epoch = source.reference_epoch();
        let mut nodal = AstronomicalNodal::new(epoch);
        if let Some(table) = &self.inner.coefficients {
            nodal = nodal.with_coefficients(Arc::clone(table));
        }

        let params = PredictionParams {
            constituents,
            msl_m,
            longitude_deg: location.map_or(0.0, |(_, lon)| lon),
            nodal: Arc::new(nodal),
            reference_time: epoch,
            phase_convention: request.phase_convention,
        };

        let series = synthesize(request.start, request.end, request.interval, &params);

        let dense_step = request.interval.min(Duration::minutes(1));
        let dense = synthesize(request.start, request.end, dense_step, &params);
        let extrema = refine_extrema(&dense, &find_extrema(&dense));

        debug!(
            source = %source,
            constituents = params.constituents.len(),
            points = series.len(),
            highs = extrema.highs.len(),
            lows = extrema.lows.len(),
            msl_m,
            "Prediction complete"
        );

        let formatter = PointFormatter {
            zone: request.timezone,
            seabed_depth_m: metadata.as_ref().and_then(|m| m.depth_m),
            msl_m,
        };

        let mut meta = std::collections::BTreeMap::new();
        meta.insert("model".to_string(), MODEL_NAME.to_string());
        if let Some(m) = &metadata {
            if !m.datum_name.is_empty() {
                meta.insert("datum_name".to_string(), m.datum_name.clone());
            }
            if !m.source_name.is_empty() {
                meta.insert("metadata_source".to_string(), m.source_name.clone());
            }
        }
        meta.insert("attribution".to_string(), source.attribution().to_string());
        if let Some(offset) = request.datum_offset_m {
            meta.insert("datum_offset_m".to_string(), format!("{offset:.3}"));
        }

        Ok(PredictionResponse {
            source: source.as_str().to_string(),
            datum: request
                .datum
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DATUM.to_string()),
            timezone: request.timezone.label().to_string(),
            constituents: params.constituents.iter().map(|c| c.name.clone()).collect(),
            predictions: formatter.points(&series),
            extrema: ExtremaResponse {
                highs: formatter.points(&extrema.highs),
                lows: formatter.points(&extrema.lows),
            },
            msl_m: metadata.as_ref().map(|m| m.msl_m).filter(|msl| *msl != 0.0),
            seabed_depth_m: metadata.as_ref().and_then(|m| m.depth_m),
            meta,
        })
    }

    /// [`predict`](Self::predict) on tokio's blocking pool.
    pub async fn predict_async(&self, request: PredictionRequest) -> Result<PredictionResponse> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.predict(&request))
            .await
            .map_err(|e| PredictionError::Task(e.to_string()))?
    }

    /// The constituent catalogue.
    pub fn constituents(&self) -> &'static [Constituent] {
        all_constituents()
    }

    /// Depth and mean sea level at `(lat, lon)`.
    pub fn bathymetry(&self, lat: f64, lon: f64) -> Result<LocationMetadata> {
        let sampler = self
            .inner
            .metadata
            .as_ref()
            .ok_or(PredictionError::MetadataNotConfigured)?;
        sampler
            .metadata(lat, lon)
            .ok_or_else(|| StoreError::NoMetadata { lat, lon }.into())
    }

    fn load_constituents(&self, selector: Selector<'_>) -> Result<Vec<ConstituentParam>> {
        let constituents = match selector {
            Selector::Station(id) => self.inner.station.load_for_station(id)?,
            Selector::Location { lat, lon } => self.inner.location.load_for_location(lat, lon)?,
        };
        Ok(constituents)
    }

    fn location_metadata(&self, lat: f64, lon: f64) -> Option<LocationMetadata> {
        let sampler = self.inner.metadata.as_ref()?;
        let metadata = sampler.metadata(lat, lon);
        if metadata.is_none() {
            warn!(lat, lon, "No bathymetry metadata for location, continuing without it");
        }
        metadata
    }

    fn auto_datum_offset(&self, lat: f64, lon: f64) -> Option<f64> {
        self.inner.datum_offsets.as_ref()?.offset_at(lat, lon)
    }
}

fn load_coefficients(path: &Path) -> Option<CoefficientTable> {
    match CoefficientTable::load_optional(path) {
        Ok(table) => table,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring unreadable nodal coefficient table");
            None
        }
    }
}
