use crate::core::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, TILE_SIZE};
use crate::projection::{self, Projection};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Static engine configuration: projection selection and tile pyramid
/// geometry. All fields have defaults, so a partial JSON document is
/// enough to override a single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Coordinate reference system identifier, e.g. "EPSG:3857".
    pub crs_id: String,
    /// Square tile edge length in pixels.
    pub tile_size: u32,
    /// Lowest allowed zoom level.
    pub min_zoom: f64,
    /// Highest allowed zoom level.
    pub max_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            crs_id: "EPSG:3857".to_string(),
            tile_size: TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl MapConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(MapError::InvalidConfig(
                "tile size must be positive".to_string(),
            ));
        }
        if !(self.min_zoom <= self.max_zoom) {
            return Err(MapError::InvalidConfig(format!(
                "empty zoom range {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if projection::for_crs(&self.crs_id).is_none() {
            return Err(MapError::UnknownCrs(self.crs_id.clone()));
        }
        Ok(())
    }

    /// Creates the configured projection.
    pub fn projection(&self) -> Result<Box<dyn Projection>> {
        projection::for_crs(&self.crs_id).ok_or_else(|| MapError::UnknownCrs(self.crs_id.clone()))
    }
}
