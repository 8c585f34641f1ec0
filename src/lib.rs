pub mod actor;
pub mod config;
pub mod error;
pub mod experiment;
pub mod geometry;
pub mod grid;
pub mod ray;
pub mod raycast;
pub mod record;
pub mod room;
pub mod sensor;
pub mod sfa;

pub use actor::{random_walk, Bat, Trajectory};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{
    infinite_line_intersect, segment_intersect, segment_intersect_with, slope, y_intercept,
    BoundsCheck, Intersection, Point, Segment, Slope,
};
pub use grid::SensorGrid;
pub use raycast::sensor_reading;
pub use record::ExperimentRecord;
pub use room::Room;
pub use sensor::{compute_sensor_angles, SensorArray};
pub use sfa::Flow;
