use crate::geometry::{Point, Segment};

/// Direction of a ray that points straight along a room axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// 0 deg, towards `x = width`
    East,
    /// 90 deg, towards `y = height`
    North,
    /// 180 deg, towards `x = 0`
    West,
    /// 270 deg, towards `y = 0`
    South,
}

/// Sensor ray cast from the agent's position
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Agent position the ray starts from
    pub origin: Point,
    /// Direction in degrees, always in `[0, 360)`
    pub angle: f64,
}

impl Ray {
    /// Create a new ray, wrapping the angle into `[0, 360)`
    pub fn new(origin: Point, angle: f64) -> Self {
        Ray {
            origin,
            angle: normalize_degrees(angle),
        }
    }

    /// Unit direction vector `(cos, sin)`
    pub fn direction(&self) -> (f64, f64) {
        let radians = self.angle.to_radians();
        (radians.cos(), radians.sin())
    }

    /// The room axis this ray runs along, if its angle is exactly 0, 90,
    /// 180 or 270 degrees
    pub fn axis(&self) -> Option<Axis> {
        if self.angle == 0.0 {
            Some(Axis::East)
        } else if self.angle == 90.0 {
            Some(Axis::North)
        } else if self.angle == 180.0 {
            Some(Axis::West)
        } else if self.angle == 270.0 {
            Some(Axis::South)
        } else {
            None
        }
    }

    /// Finite segment from the origin, `length` units along the direction
    pub fn segment(&self, length: f64) -> Segment {
        let (dx, dy) = self.direction();
        let end = Point::new(self.origin.x + dx * length, self.origin.y + dy * length);
        Segment::new(self.origin, end)
    }
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }

    #[test]
    fn test_axis_detection() {
        let origin = Point::new(1.0, 1.0);
        assert_eq!(Ray::new(origin, 0.0).axis(), Some(Axis::East));
        assert_eq!(Ray::new(origin, 450.0).axis(), Some(Axis::North));
        assert_eq!(Ray::new(origin, -180.0).axis(), Some(Axis::West));
        assert_eq!(Ray::new(origin, 270.0).axis(), Some(Axis::South));
        assert_eq!(Ray::new(origin, 271.0).axis(), None);
    }

    #[test]
    fn test_segment_length() {
        let ray = Ray::new(Point::new(0.0, 0.0), 30.0);
        let segment = ray.segment(100.0);
        assert!((segment.length() - 100.0).abs() < 1e-9);
        assert_eq!(segment.start, Point::new(0.0, 0.0));
    }
}
