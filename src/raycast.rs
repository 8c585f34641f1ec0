use crate::geometry::{BoundsCheck, Point};
use crate::ray::{Axis, Ray};
use crate::room::Room;

/// Cast a ray against the room and return the point it hits.
///
/// Axis-aligned rays go straight to the room rectangle and never look at
/// the wall list; this only agrees with the walls when they coincide with
/// the room boundary. Any other ray is tested against the walls in list
/// order and the first wall that yields a hit wins, which is not
/// necessarily the nearest one.
pub fn cast(ray: &Ray, room: &Room, check: BoundsCheck) -> Option<Point> {
    if let Some(axis) = ray.axis() {
        let origin = ray.origin;
        let hit = match axis {
            Axis::East => Point::new(room.width, origin.y),
            Axis::North => Point::new(origin.x, room.height),
            Axis::West => Point::new(0.0, origin.y),
            Axis::South => Point::new(origin.x, 0.0),
        };
        return Some(hit);
    }

    let beam = ray.segment(room.ray_extent());
    room.walls.iter().find_map(|wall| beam.intersect(wall, check))
}

/// Distance from `position` to the wall seen at `angle` degrees.
///
/// `None` means no wall was hit, which for a closed room is a wall-list
/// configuration problem.
pub fn sensor_reading(position: Point, angle: f64, room: &Room, check: BoundsCheck) -> Option<f64> {
    let ray = Ray::new(position, angle);
    cast(&ray, room, check).map(|hit| position.distance(&hit))
}
