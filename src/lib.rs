//! Tideline: Raster Time-Series Extraction and SAR Flood Mapping
//!
//! This library turns directories of dated raster archives (precipitation,
//! rainfall, temperature, SAR backscatter) into chronologically sorted scalar
//! time series, including threshold-based flood metrics for Sentinel-1 scenes.

pub mod types;
pub mod io;
pub mod core;

// Re-export main types and functions for easier access
pub use types::{
    ExtractError, ExtractResult, FloodMetrics, Metrics, RasterFile, Record, TimeSeries,
};

pub use io::{list_raster_files, BandData, RasterReader};

pub use crate::core::{
    aggregate, classify, parse_date, pixel_area_km2, AggregationMode, DateStrategy,
    ExtractionConfig, TimeSeriesBuilder, DEFAULT_FLOOD_THRESHOLD_DB,
};
