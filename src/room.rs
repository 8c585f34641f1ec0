use crate::error::{Error, Result};
use crate::geometry::{Point, Segment};

/// Rays are this many room extents long, so they always leave the room
const RAY_EXTENT_FACTOR: f64 = 100.0;

/// Rectangular room spanning `[0, width] x [0, height]` with a wall list.
///
/// The walls are expected to enclose the rectangle but this is not checked;
/// a gap only shows up later as a sensor ray that hits nothing.
#[derive(Debug, Clone)]
pub struct Room {
    pub width: f64,
    pub height: f64,
    pub walls: Vec<Segment>,
}

impl Room {
    pub fn new(width: f64, height: f64, walls: Vec<Segment>) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "room width must be positive, got {}",
                width
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "room height must be positive, got {}",
                height
            )));
        }

        Ok(Room {
            width,
            height,
            walls,
        })
    }

    /// Room whose walls are its own boundary: left, bottom, right, top
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        Self::new(width, height, rectangle_walls(width, height))
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Length of a sensor ray
    pub fn ray_extent(&self) -> f64 {
        RAY_EXTENT_FACTOR * self.width.max(self.height)
    }
}

/// The four boundary walls of a `width x height` rectangle
pub fn rectangle_walls(width: f64, height: f64) -> Vec<Segment> {
    let origin = Point::new(0.0, 0.0);
    let top_left = Point::new(0.0, height);
    let bottom_right = Point::new(width, 0.0);
    let top_right = Point::new(width, height);

    vec![
        Segment::new(origin, top_left),
        Segment::new(origin, bottom_right),
        Segment::new(bottom_right, top_right),
        Segment::new(top_left, top_right),
    ]
}
