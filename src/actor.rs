use crate::config::WalkConfig;
use crate::error::Result;
use crate::geometry::Point;
use crate::room::Room;
use crate::sensor::SensorArray;
use nalgebra::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// The walking agent: a position, a unit heading and a fixed step length
#[derive(Clone, Debug)]
pub struct Bat {
    pub position: Point,
    /// Unit heading vector (dx, dy)
    pub heading: (f64, f64),
    /// Distance covered per step
    pub speed: f64,
}

impl Bat {
    /// Create a bat at `position` facing `heading` radians
    pub fn new(position: Point, heading: f64, speed: f64) -> Self {
        Bat {
            position,
            heading: (heading.cos(), heading.sin()),
            speed,
        }
    }

    /// Rotate the heading counter-clockwise by `radians`
    pub fn turn(&mut self, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        let (dx, dy) = self.heading;
        self.heading = (cos * dx - sin * dy, sin * dx + cos * dy);
    }

    /// Advance one step.
    ///
    /// If the step would leave the room along an axis, the heading's
    /// component on that axis is flipped and the step is taken with the
    /// reflected heading instead.
    pub fn step(&mut self, room: &Room) {
        let prev = self.position;
        let (mut dx, mut dy) = self.heading;

        let x = prev.x + dx * self.speed;
        let y = prev.y + dy * self.speed;
        if x > room.width || x < 0.0 {
            dx = -dx;
        }
        if y > room.height || y < 0.0 {
            dy = -dy;
        }

        self.heading = (dx, dy);
        self.position = Point::new(prev.x + dx * self.speed, prev.y + dy * self.speed);
    }
}

/// Positions visited by the bat and the sensor readings taken at each one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub positions: Vec<Point>,
    pub readings: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn with_capacity(steps: usize) -> Self {
        Trajectory {
            positions: Vec::with_capacity(steps),
            readings: Vec::with_capacity(steps),
        }
    }

    pub fn record(&mut self, position: Point, reading: Vec<f64>) {
        self.positions.push(position);
        self.readings.push(reading);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Readings as a matrix, one row per step
    pub fn reading_matrix(&self) -> DMatrix<f64> {
        let cols = self.readings.first().map_or(0, Vec::len);
        DMatrix::from_fn(self.readings.len(), cols, |r, c| self.readings[r][c])
    }
}

/// Random walk starting in the middle of the room.
///
/// Every `turn_interval` steps a new turn of `0..max_turn_degrees` whole
/// degrees is drawn and spread evenly over the interval, so the bat curves
/// smoothly. The start position counts as the first step.
pub fn random_walk<R: Rng + ?Sized>(
    room: &Room,
    sensors: &SensorArray,
    walk: &WalkConfig,
    rng: &mut R,
) -> Result<Trajectory> {
    let interval = walk.turn_interval.max(1);
    let mut bat = Bat::new(room.center(), rng.gen_range(0.0..TAU), walk.speed);
    let mut trajectory = Trajectory::with_capacity(walk.steps);
    let mut turn = 0.0;

    for step in 0..walk.steps {
        if step % interval == 0 {
            turn = if walk.max_turn_degrees == 0 {
                0.0
            } else {
                f64::from(rng.gen_range(0..walk.max_turn_degrees)).to_radians() / interval as f64
            };
        }

        if step > 0 {
            bat.turn(turn);
            bat.step(room);
        }

        let reading = sensors.read(bat.position, room)?;
        trajectory.record(bat.position, reading);
    }

    log::debug!(
        "Random walk finished after {} steps at ({:.2}, {:.2})",
        trajectory.len(),
        bat.position.x,
        bat.position.y
    );

    Ok(trajectory)
}
