use crate::core::aggregate::{self, AggregationMode};
use crate::core::dates::{self, DateStrategy};
use crate::core::flood::DEFAULT_FLOOD_THRESHOLD_DB;
use crate::io::listing::list_raster_files;
use crate::types::{ExtractResult, RasterFile, Record, TimeSeries};
use std::path::Path;

/// One extraction campaign: which files to pick up, how to date them,
/// and how to reduce each one.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Filename suffix a file must carry to be considered (e.g. ".tif")
    pub file_filter: String,
    /// How the acquisition date is recovered from each filename
    pub date_strategy: DateStrategy,
    /// How each raster is reduced to scalar metrics
    pub mode: AggregationMode,
}

impl ExtractionConfig {
    /// GeoTIFF extraction with an explicit strategy and mode.
    pub fn new(date_strategy: DateStrategy, mode: AggregationMode) -> Self {
        Self {
            file_filter: ".tif".to_string(),
            date_strategy,
            mode,
        }
    }

    /// Monthly gridded precipitation sampled at one station pixel.
    /// Matches `prefix_YYYY-MM.tif` archives.
    pub fn monthly_precipitation(row: usize, col: usize) -> Self {
        Self::new(
            DateStrategy::monthly_suffix(),
            AggregationMode::PixelValue { row, col },
        )
    }

    /// Daily rainfall averaged over the full scene.
    /// Matches `prefix_YYYY-MM-DD.tif` archives.
    pub fn daily_rainfall() -> Self {
        Self::new(DateStrategy::daily_suffix(), AggregationMode::SpatialMean)
    }

    /// Two-band temperature products (min/max) averaged per band.
    /// Matches any filename embedding a `YYYY-MM-DD` date.
    pub fn temperature_extremes() -> Self {
        Self::new(DateStrategy::embedded_date(), AggregationMode::DualBandMean)
    }

    /// SAR backscatter flood mapping at the given threshold (dB).
    /// Matches filenames embedding an underscored `YYYY_MM_DD` date.
    pub fn sar_flood(threshold_db: f64) -> Self {
        Self::new(
            DateStrategy::embedded_date_underscored(),
            AggregationMode::FloodThreshold { threshold_db },
        )
    }
}

/// Walks a directory of dated rasters and assembles a [`TimeSeries`].
///
/// Per-file failures (unreadable raster, undatable filename, too few
/// bands) are logged and skipped so one bad file never sinks a batch.
/// Configuration errors (missing directory, out-of-bounds pixel) abort
/// immediately instead, since every remaining file would fail the same way.
pub struct TimeSeriesBuilder {
    config: ExtractionConfig,
}

impl TimeSeriesBuilder {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract one record per readable file in `directory`, sorted by date.
    pub fn build<P: AsRef<Path>>(&self, directory: P) -> ExtractResult<TimeSeries> {
        let directory = directory.as_ref();
        log::info!(
            "Extracting time series from {} ({:?})",
            directory.display(),
            self.config.mode
        );

        let files = list_raster_files(directory, &self.config.file_filter)?;
        log::info!("Found {} candidate file(s)", files.len());

        let mut records = Vec::with_capacity(files.len());
        for file in &files {
            match self.process_file(file) {
                Ok(record) => records.push(record),
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping {}: {}", file.filename, e);
                }
                Err(e) => return Err(e),
            }
        }

        log::info!("Extracted {} of {} file(s)", records.len(), files.len());
        Ok(TimeSeries::from_records(records))
    }

    fn process_file(&self, file: &RasterFile) -> ExtractResult<Record> {
        let date = dates::parse_date(&file.filename, &self.config.date_strategy)?;
        let metrics = aggregate::aggregate(&file.path, self.config.mode)?;
        Ok(Record { date, metrics })
    }
}

/// Flood mapping with the conventional threshold.
impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::sar_flood(DEFAULT_FLOOD_THRESHOLD_DB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractError;

    #[test]
    fn test_monthly_precipitation_preset() {
        let config = ExtractionConfig::monthly_precipitation(40, 40);
        assert_eq!(config.file_filter, ".tif");
        assert!(matches!(
            config.mode,
            AggregationMode::PixelValue { row: 40, col: 40 }
        ));
        assert!(matches!(
            config.date_strategy,
            DateStrategy::TokenSplit { .. }
        ));
    }

    #[test]
    fn test_daily_rainfall_preset() {
        let config = ExtractionConfig::daily_rainfall();
        assert!(matches!(config.mode, AggregationMode::SpatialMean));
    }

    #[test]
    fn test_temperature_preset_uses_two_bands() {
        let config = ExtractionConfig::temperature_extremes();
        assert!(matches!(config.mode, AggregationMode::DualBandMean));
        assert!(matches!(
            config.date_strategy,
            DateStrategy::PatternSearch { .. }
        ));
    }

    #[test]
    fn test_sar_flood_preset_carries_threshold() {
        let config = ExtractionConfig::sar_flood(-17.5);
        match config.mode {
            AggregationMode::FloodThreshold { threshold_db } => {
                assert_eq!(threshold_db, -17.5);
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_flood_mapping() {
        let config = ExtractionConfig::default();
        assert!(matches!(
            config.mode,
            AggregationMode::FloodThreshold { threshold_db } if threshold_db == DEFAULT_FLOOD_THRESHOLD_DB
        ));
    }

    #[test]
    fn test_missing_directory_aborts_build() {
        let builder = TimeSeriesBuilder::new(ExtractionConfig::daily_rainfall());
        let err = builder
            .build("/nonexistent/rainfall/archive")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Directory { .. }));
        assert!(!err.is_recoverable());
    }
}
