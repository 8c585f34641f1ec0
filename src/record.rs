use crate::error::Result;
use crate::geometry::Point;
use crate::grid::SensorGrid;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything a run produces, ready to be written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Sensor directions in degrees
    pub sensor_angles: Vec<f64>,
    /// Bat positions along the training walk
    pub positions: Vec<Point>,
    /// Grid dimensions; slow feature rows are in cell id order
    pub grid_cols: usize,
    pub grid_rows: usize,
    /// Mean squared step-to-step change of each output along the walk
    pub slowness: Vec<f64>,
    /// One row per grid cell, one column per slow feature
    pub slow_features: Vec<Vec<f64>>,
}

impl ExperimentRecord {
    pub fn new(
        sensor_angles: Vec<f64>,
        positions: Vec<Point>,
        grid: &SensorGrid,
        slowness: Vec<f64>,
        features: &DMatrix<f64>,
    ) -> Self {
        let slow_features: Vec<Vec<f64>> = features
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();

        ExperimentRecord {
            sensor_angles,
            positions,
            grid_cols: grid.cols,
            grid_rows: grid.rows,
            slowness,
            slow_features,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.slow_features.first().map_or(0, Vec::len)
    }

    /// Value of slow feature `feature` at grid cell (x, y)
    pub fn feature_at(&self, x: usize, y: usize, feature: usize) -> Option<f64> {
        if x >= self.grid_cols || y >= self.grid_rows {
            return None;
        }
        self.slow_features
            .get(x + y * self.grid_cols)
            .and_then(|row| row.get(feature))
            .copied()
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let record: ExperimentRecord = serde_json::from_str(&json)?;
        Ok(record)
    }

    /// Short human-readable description of the run
    pub fn summary(&self) -> String {
        let angles: Vec<String> = self.sensor_angles.iter().map(|a| format!("{}", a)).collect();
        format!(
            "Sensors: {} at [{}] deg\n\
             Walk: {} steps\n\
             Grid: {} x {} cells\n\
             Slow features: {}",
            self.sensor_angles.len(),
            angles.join(", "),
            self.positions.len(),
            self.grid_cols,
            self.grid_rows,
            self.feature_count()
        )
    }
}
