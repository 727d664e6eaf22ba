//! Core extraction modules

pub mod aggregate;
pub mod builder;
pub mod dates;
pub mod flood;

// Re-export main types
pub use aggregate::{aggregate, AggregationMode};
pub use builder::{ExtractionConfig, TimeSeriesBuilder};
pub use dates::{parse_date, DateStrategy};
pub use flood::{classify, pixel_area_km2, DEFAULT_FLOOD_THRESHOLD_DB};
