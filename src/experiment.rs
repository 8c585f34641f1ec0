use crate::actor::{random_walk, Trajectory};
use crate::config::Config;
use crate::error::Result;
use crate::grid::SensorGrid;
use crate::record::ExperimentRecord;
use crate::sensor::{compute_sensor_angles, SensorArray};
use crate::sfa::Flow;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator, or OS entropy for seed 0
fn make_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

/// Run a full experiment: sample the room, walk, train on the walk and
/// evaluate the slow features on every grid cell
pub fn run(config: &Config) -> Result<ExperimentRecord> {
    config.validate()?;
    let mut rng = make_rng(config.seed);

    let room = config.room.build()?;
    let angles = compute_sensor_angles(config.sensors.count, config.sensors.orthogonal, &mut rng);
    let sensors = SensorArray::new(angles, config.sensors.bounds_check);
    log::info!(
        "Room {} x {} with {} walls, sensors at {:?} deg",
        room.width,
        room.height,
        room.walls.len(),
        sensors.angles()
    );

    let grid = SensorGrid::sample(&room, &sensors)?;
    let trajectory: Trajectory = random_walk(&room, &sensors, &config.walk, &mut rng)?;

    let training = trajectory.reading_matrix();
    let mut flow = Flow::from_config(&config.features);
    log::debug!("Feature flow: {:?}", flow.node_names());
    flow.train(&training)?;
    let features = flow.execute(&grid.to_matrix())?;

    let slowness = training_slowness(&flow.execute(&training)?);
    log::info!(
        "Extracted {} slow features over {} grid cells",
        features.ncols(),
        grid.cell_count()
    );

    Ok(ExperimentRecord::new(
        sensors.angles().to_vec(),
        trajectory.positions,
        &grid,
        slowness,
        &features,
    ))
}

/// Mean squared step-to-step change of each output column
fn training_slowness(outputs: &DMatrix<f64>) -> Vec<f64> {
    let n = outputs.nrows();
    if n < 2 {
        return Vec::new();
    }
    let diffs = outputs.rows(1, n - 1).into_owned() - outputs.rows(0, n - 1);
    diffs
        .column_iter()
        .map(|c| c.iter().map(|v| v * v).sum::<f64>() / (n - 1) as f64)
        .collect()
}
