use crate::core::aggregate::{mask_nodata, masked_mean};
use crate::io::raster::BandData;
use crate::types::FloodMetrics;

/// Backscatter threshold (dB) below which a pixel counts as open water.
///
/// Calibrated Sentinel-1 sigma0 over smooth open water typically sits
/// well under land returns; -15 dB is the conventional cutoff for
/// flood mapping over mixed terrain.
pub const DEFAULT_FLOOD_THRESHOLD_DB: f64 = -15.0;

/// Footprint of one pixel in km^2 from its (x, y) resolution.
///
/// Resolutions must be in meters; geographic (degree) rasters need
/// reprojection before their pixel counts mean anything as area.
pub fn pixel_area_km2(pixel_resolution: (f64, f64)) -> f64 {
    let (x, y) = pixel_resolution;
    x * y / 1.0e6
}

/// Classify one backscatter band against `threshold_db`.
///
/// Nodata cells are excluded from both the mean and the flooded count,
/// so border nodata collars never inflate the flooded area. The
/// comparison is strict: a pixel exactly at the threshold is dry land.
pub fn classify(band: &BandData, threshold_db: f64) -> FloodMetrics {
    let masked = mask_nodata(&band.grid, band.nodata);
    let mean_backscatter_db = masked_mean(&masked);

    let flooded_pixel_count = masked
        .iter()
        .flatten()
        .filter(|&&db| db < threshold_db)
        .count();

    let area_per_pixel = pixel_area_km2(band.pixel_resolution);
    let flooded_area_km2 = flooded_pixel_count as f64 * area_per_pixel;

    log::debug!(
        "Flood classification: mean {:.2} dB, {} px below {:.1} dB, {:.4} km^2",
        mean_backscatter_db,
        flooded_pixel_count,
        threshold_db,
        flooded_area_km2
    );

    FloodMetrics {
        mean_backscatter_db,
        flooded_pixel_count,
        flooded_area_km2,
    }
}
