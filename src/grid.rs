use crate::error::Result;
use crate::geometry::Point;
use crate::room::Room;
use crate::sensor::SensorArray;
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Sensor readings taken at every integer position of the room
/// Cells are stored row-major: id = x + y * cols
#[derive(Clone, Debug)]
pub struct SensorGrid {
    pub rows: usize,
    pub cols: usize,
    /// Readings per cell
    pub sensors: usize,
    /// `rows * cols * sensors` values, one cell after another
    pub readings: Vec<f64>,
}

impl SensorGrid {
    /// Sample the sensors at `(x, y)` for `0 <= x < width`, `0 <= y < height`.
    /// Rows are read in parallel.
    pub fn sample(room: &Room, sensors: &SensorArray) -> Result<Self> {
        let cols = room.width.floor() as usize;
        let rows = room.height.floor() as usize;

        let row_readings = (0..rows)
            .into_par_iter()
            .map(|y| -> Result<Vec<f64>> {
                let mut row = Vec::with_capacity(cols * sensors.len());
                for x in 0..cols {
                    let reading = sensors.read(Point::new(x as f64, y as f64), room)?;
                    row.extend(reading);
                }
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Sampled {} x {} grid with {} sensors",
            cols,
            rows,
            sensors.len()
        );

        Ok(SensorGrid {
            rows,
            cols,
            sensors: sensors.len(),
            readings: row_readings.concat(),
        })
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: usize, y: usize) -> usize {
        x + y * self.cols
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: usize) -> (usize, usize) {
        (id % self.cols, id / self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Readings at (x, y); `None` outside the grid
    pub fn reading(&self, x: usize, y: usize) -> Option<&[f64]> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        let start = self.get_id(x, y) * self.sensors;
        Some(&self.readings[start..start + self.sensors])
    }

    /// One row per cell in id order, one column per sensor
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.cell_count(), self.sensors, &self.readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundsCheck;

    fn orthogonal_grid(width: f64, height: f64) -> SensorGrid {
        let room = Room::rectangle(width, height).unwrap();
        let sensors = SensorArray::new(vec![0.0, 90.0], BoundsCheck::Symmetric);
        SensorGrid::sample(&room, &sensors).unwrap()
    }

    #[test]
    fn test_grid_shape() {
        let grid = orthogonal_grid(4.0, 3.0);
        assert_eq!(grid.cols, 4);
        assert_eq!(grid.rows, 3);
        assert_eq!(grid.readings.len(), 4 * 3 * 2);
    }

    #[test]
    fn test_id_round_trip() {
        let grid = orthogonal_grid(4.0, 3.0);
        assert_eq!(grid.get_id(3, 2), 11);
        assert_eq!(grid.get_coords(11), (3, 2));
    }

    #[test]
    fn test_readings_follow_position() {
        let grid = orthogonal_grid(4.0, 3.0);
        assert_eq!(grid.reading(1, 2), Some(&[3.0, 1.0][..]));
        assert_eq!(grid.reading(0, 0), Some(&[4.0, 3.0][..]));
        assert_eq!(grid.reading(4, 0), None);
    }

    #[test]
    fn test_matrix_rows_are_cells() {
        let grid = orthogonal_grid(4.0, 3.0);
        let matrix = grid.to_matrix();
        assert_eq!(matrix.shape(), (12, 2));
        assert_eq!(matrix[(grid.get_id(2, 1), 0)], 2.0);
        assert_eq!(matrix[(grid.get_id(2, 1), 1)], 2.0);
    }
}
