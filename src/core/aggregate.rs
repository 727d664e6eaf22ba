use crate::core::flood;
use crate::io::raster::{BandData, RasterReader};
use crate::types::{ExtractError, ExtractResult, Metrics};
use ndarray::Array2;
use std::path::Path;

/// How one raster file is reduced to scalar metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregationMode {
    /// Raw band-1 value at a fixed (row, col) pixel. Out-of-bounds
    /// coordinates are a configuration error and abort the batch.
    PixelValue { row: usize, col: usize },
    /// Nodata-aware arithmetic mean over band 1.
    SpatialMean,
    /// Independent nodata-aware means over bands 1 and 2.
    DualBandMean,
    /// Flood classification of band 1 against a backscatter threshold (dB).
    FloodThreshold { threshold_db: f64 },
}

/// Open `path` and reduce it to metrics under `mode`.
///
/// The GDAL handle is scoped to this call and released on every exit
/// path. Any I/O or format error identifies the offending file and is
/// recoverable at the batch level; only an out-of-bounds pixel coordinate
/// is fatal.
pub fn aggregate(path: &Path, mode: AggregationMode) -> ExtractResult<Metrics> {
    log::debug!("Aggregating {} ({:?})", path.display(), mode);
    let reader = RasterReader::open(path)?;

    match mode {
        AggregationMode::PixelValue { row, col } => {
            let band = reader.read_band(1)?;
            let value = pixel_value(&band, row, col)?;
            Ok(Metrics::PixelValue { value })
        }
        AggregationMode::SpatialMean => {
            let band = reader.read_band(1)?;
            let mean = masked_mean(&mask_nodata(&band.grid, band.nodata));
            Ok(Metrics::SpatialMean { mean })
        }
        AggregationMode::DualBandMean => {
            let found = reader.band_count();
            if found < 2 {
                return Err(ExtractError::BandCount {
                    path: path.display().to_string(),
                    required: 2,
                    found,
                });
            }
            let band1 = reader.read_band(1)?;
            let band2 = reader.read_band(2)?;
            Ok(Metrics::DualBandMean {
                band1_mean: masked_mean(&mask_nodata(&band1.grid, band1.nodata)),
                band2_mean: masked_mean(&mask_nodata(&band2.grid, band2.nodata)),
            })
        }
        AggregationMode::FloodThreshold { threshold_db } => {
            let band = reader.read_band(1)?;
            Ok(Metrics::Flood(flood::classify(&band, threshold_db)))
        }
    }
}

/// Raw value at (row, col) of a band, with an explicit bounds check.
///
/// No clamping: a coordinate outside the raster extent fails loudly with
/// [`ExtractError::OutOfBounds`] instead of being wrapped or skipped.
pub fn pixel_value(band: &BandData, row: usize, col: usize) -> ExtractResult<f64> {
    let (height, width) = band.dim();
    if row >= height || col >= width {
        return Err(ExtractError::OutOfBounds {
            row,
            col,
            height,
            width,
        });
    }
    Ok(band.grid[[row, col]])
}

/// Replace nodata sentinel cells with `None`.
///
/// The sentinel is matched exactly; a NaN sentinel matches NaN cells.
/// Without a declared sentinel every cell is kept, so "missing" stays
/// unambiguous against legitimately NaN-producing computations downstream.
pub fn mask_nodata(grid: &Array2<f64>, nodata: Option<f64>) -> Array2<Option<f64>> {
    grid.map(|&value| match nodata {
        Some(sentinel) if sentinel.is_nan() && value.is_nan() => None,
        Some(sentinel) if value == sentinel => None,
        _ => Some(value),
    })
}

/// Arithmetic mean over present cells; NaN when every cell is missing.
pub fn masked_mean(masked: &Array2<Option<f64>>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for &value in masked.iter().flatten() {
        sum += value;
        count += 1;
    }

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
