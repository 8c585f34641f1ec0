use crate::error::{Error, Result};
use crate::geometry::{BoundsCheck, Point};
use crate::raycast::sensor_reading;
use crate::room::Room;
use rand::Rng;

/// Pick the sensor directions in degrees.
///
/// Two orthogonal sensors face east and north. Otherwise every sensor gets
/// an independent whole-degree angle drawn uniformly from `0..360`.
pub fn compute_sensor_angles<R: Rng + ?Sized>(count: usize, orthogonal: bool, rng: &mut R) -> Vec<f64> {
    if count == 2 && orthogonal {
        return vec![0.0, 90.0];
    }
    (0..count).map(|_| f64::from(rng.gen_range(0u32..360))).collect()
}

/// Fixed set of sensors carried by the agent
#[derive(Debug, Clone)]
pub struct SensorArray {
    angles: Vec<f64>,
    check: BoundsCheck,
}

impl SensorArray {
    pub fn new(angles: Vec<f64>, check: BoundsCheck) -> Self {
        SensorArray { angles, check }
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// One distance per sensor, in sensor order.
    ///
    /// A sensor that sees no wall makes the whole reading fail: a partial
    /// vector would silently shift every later column.
    pub fn read(&self, position: Point, room: &Room) -> Result<Vec<f64>> {
        self.angles
            .iter()
            .map(|&angle| {
                sensor_reading(position, angle, room, self.check).ok_or(Error::MisconfiguredWalls {
                    angle,
                    x: position.x,
                    y: position.y,
                })
            })
            .collect()
    }
}
