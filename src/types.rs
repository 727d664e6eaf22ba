use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A candidate raster file discovered by the directory listing.
///
/// Identity is the filesystem path. The acquisition date is recovered from
/// `filename` by the date parser and travels with the resulting [`Record`];
/// the listing entry itself is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterFile {
    pub path: PathBuf,
    pub filename: String,
}

/// Flood classification of one SAR backscatter band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloodMetrics {
    /// Mean backscatter over non-missing cells, in dB (NaN if none).
    pub mean_backscatter_db: f64,
    /// Non-missing cells strictly below the threshold.
    pub flooded_pixel_count: usize,
    /// Flooded pixel count converted to km² via the pixel resolution.
    pub flooded_area_km2: f64,
}

/// Scalar metrics derived from one raster file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Metrics {
    /// Raw band-1 value at a fixed (row, col) pixel.
    PixelValue { value: f64 },
    /// Nodata-aware arithmetic mean over band 1.
    SpatialMean { mean: f64 },
    /// Independent nodata-aware means over bands 1 and 2.
    DualBandMean { band1_mean: f64, band2_mean: f64 },
    /// Threshold-based flood classification of band 1.
    Flood(FloodMetrics),
}

impl Metrics {
    /// Named-column view of the metrics for tabular consumers.
    pub fn columns(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Metrics::PixelValue { value } => vec![("value", value)],
            Metrics::SpatialMean { mean } => vec![("mean", mean)],
            Metrics::DualBandMean {
                band1_mean,
                band2_mean,
            } => vec![("band1_mean", band1_mean), ("band2_mean", band2_mean)],
            Metrics::Flood(flood) => vec![
                ("mean_backscatter_db", flood.mean_backscatter_db),
                ("flooded_pixel_count", flood.flooded_pixel_count as f64),
                ("flooded_area_km2", flood.flooded_area_km2),
            ],
        }
    }
}

/// One row of the output table: an acquisition date plus the metrics
/// derived from that file. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub metrics: Metrics,
}

/// An ordered sequence of records, sorted ascending by acquisition date.
///
/// Duplicate dates pass through untouched; ties keep the original
/// file-listing order (the sort is stable). [`TimeSeries::from_records`]
/// is the only constructor, so the ordering invariant holds for every
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    records: Vec<Record>,
}

impl TimeSeries {
    /// Stable-sort the records ascending by date and wrap them.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// All records in date order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

/// Error types for time-series extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("no date in filename '{filename}': {reason}")]
    DateParse { filename: String, reason: String },

    #[error("invalid raster data: {0}")]
    InvalidFormat(String),

    #[error("{path}: found {found} band(s), need at least {required}")]
    BandCount {
        path: String,
        required: usize,
        found: usize,
    },

    #[error("pixel ({row}, {col}) is outside the {height}x{width} raster extent")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("cannot read directory '{path}': {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid date pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ExtractError {
    /// Whether the batch may skip the offending file and continue.
    ///
    /// Out-of-bounds pixel coordinates and unreadable directories indicate
    /// a configuration problem rather than a per-file data anomaly, so
    /// they abort the whole batch; the same goes for an invalid date
    /// pattern. Everything else is a per-file condition.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ExtractError::OutOfBounds { .. }
                | ExtractError::Directory { .. }
                | ExtractError::InvalidPattern { .. }
        )
    }
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, value: f64) -> Record {
        Record {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            metrics: Metrics::PixelValue { value },
        }
    }

    #[test]
    fn test_from_records_sorts_by_date() {
        let series = TimeSeries::from_records(vec![
            record("2020-03-01", 8.0),
            record("2020-01-01", 12.0),
            record("2020-02-01", 15.0),
        ]);

        let dates: Vec<_> = series.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2020-01-01", "2020-02-01", "2020-03-01"]);
    }

    #[test]
    fn test_duplicate_dates_keep_insertion_order() {
        // Stable sort: ties stay in listing order, duplicates are kept.
        let series = TimeSeries::from_records(vec![
            record("2020-01-01", 1.0),
            record("2020-01-01", 2.0),
            record("2019-12-01", 3.0),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.records()[0].metrics, Metrics::PixelValue { value: 3.0 });
        assert_eq!(series.records()[1].metrics, Metrics::PixelValue { value: 1.0 });
        assert_eq!(series.records()[2].metrics, Metrics::PixelValue { value: 2.0 });
    }

    #[test]
    fn test_metrics_columns() {
        let flood = Metrics::Flood(FloodMetrics {
            mean_backscatter_db: -12.75,
            flooded_pixel_count: 2,
            flooded_area_km2: 0.02,
        });
        let columns = flood.columns();

        assert_eq!(columns[0], ("mean_backscatter_db", -12.75));
        assert_eq!(columns[1], ("flooded_pixel_count", 2.0));
        assert_eq!(columns[2], ("flooded_area_km2", 0.02));

        let dual = Metrics::DualBandMean {
            band1_mean: 30.0,
            band2_mean: 18.5,
        };
        assert_eq!(
            dual.columns(),
            vec![("band1_mean", 30.0), ("band2_mean", 18.5)]
        );
    }

    #[test]
    fn test_error_recoverability() {
        let skip = ExtractError::DateParse {
            filename: "scene.tif".to_string(),
            reason: "no match".to_string(),
        };
        assert!(skip.is_recoverable());

        let fatal = ExtractError::OutOfBounds {
            row: 40,
            col: 40,
            height: 4,
            width: 4,
        };
        assert!(!fatal.is_recoverable());

        let fatal = ExtractError::Directory {
            path: "/missing".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(!fatal.is_recoverable());
    }
}
