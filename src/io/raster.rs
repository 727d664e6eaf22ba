use crate::types::{ExtractError, ExtractResult};
use gdal::Dataset;
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// One raster band together with the metadata needed for nodata-aware
/// statistics.
///
/// Owned by the aggregation step that reads it and discarded once metrics
/// are derived; no band data outlives the processing of its file.
#[derive(Debug, Clone)]
pub struct BandData {
    /// Cell values, row-major (row 0 is the top of the raster).
    pub grid: Array2<f64>,
    /// Declared nodata sentinel, if the band has one.
    pub nodata: Option<f64>,
    /// Absolute cell size (x, y) from the geotransform, in linear units.
    pub pixel_resolution: (f64, f64),
}

impl BandData {
    /// (rows, cols) of the band grid.
    pub fn dim(&self) -> (usize, usize) {
        self.grid.dim()
    }
}

/// GDAL-backed raster file reader.
///
/// The dataset handle lives only as long as the reader and is closed on
/// drop, so every exit path (including early `?` returns) releases the
/// file descriptor.
pub struct RasterReader {
    dataset: Dataset,
    path: PathBuf,
}

impl RasterReader {
    /// Open a raster file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(ExtractError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )));
        }

        log::debug!("Opening raster: {}", path.display());
        let dataset = Dataset::open(&path)?;

        Ok(Self { dataset, path })
    }

    /// Number of bands in the raster.
    pub fn band_count(&self) -> usize {
        self.dataset.raster_count() as usize
    }

    /// Absolute pixel size (x, y) taken from the geotransform.
    ///
    /// Rasters without georeferencing fall back to the unit cell size of
    /// GDAL's identity transform.
    pub fn pixel_resolution(&self) -> (f64, f64) {
        match self.dataset.geo_transform() {
            Ok(gt) => (gt[1].abs(), gt[5].abs()),
            Err(_) => (1.0, 1.0),
        }
    }

    /// Read one band (1-based, GDAL convention) into a [`BandData`].
    pub fn read_band(&self, index: usize) -> ExtractResult<BandData> {
        let (width, height) = self.dataset.raster_size();
        let band = self.dataset.rasterband(index as isize)?;
        let nodata = band.no_data_value();
        let buffer = band.read_as::<f64>((0, 0), (width, height), (width, height), None)?;

        let grid = Array2::from_shape_vec((height, width), buffer.data).map_err(|e| {
            ExtractError::InvalidFormat(format!(
                "band {} of {} is not a {}x{} grid: {}",
                index,
                self.path.display(),
                height,
                width,
                e
            ))
        })?;

        Ok(BandData {
            grid,
            nodata,
            pixel_resolution: self.pixel_resolution(),
        })
    }

    /// Path this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let result = RasterReader::open("nonexistent.tif");
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[test]
    fn test_band_data_dim() {
        let band = BandData {
            grid: Array2::zeros((3, 5)),
            nodata: None,
            pixel_resolution: (10.0, 10.0),
        };
        assert_eq!(band.dim(), (3, 5));
    }
}
