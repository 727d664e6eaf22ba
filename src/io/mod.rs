//! I/O modules for listing and reading raster files

pub mod listing;
pub mod raster;

pub use listing::list_raster_files;
pub use raster::{BandData, RasterReader};
