use crate::error::{Error, Result};
use crate::geometry::{BoundsCheck, Segment};
use crate::room::Room;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// RNG seed for sensor angles and the walk; 0 draws from OS entropy
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub room: RoomConfig,
    #[serde(default)]
    pub sensors: SensorConfig,
    #[serde(default)]
    pub walk: WalkConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    #[serde(default = "default_room_width")]
    pub width: f64,
    #[serde(default = "default_room_height")]
    pub height: f64,
    /// Explicit wall list; the room rectangle when absent
    #[serde(default)]
    pub walls: Option<Vec<Segment>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_sensor_count")]
    pub count: usize,
    #[serde(default = "default_orthogonal")]
    pub orthogonal: bool,
    #[serde(default)]
    pub bounds_check: BoundsCheck,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalkConfig {
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_turn_interval")]
    pub turn_interval: usize,
    #[serde(default = "default_max_turn_degrees")]
    pub max_turn_degrees: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    #[serde(default = "default_degree")]
    pub degree: usize,
    #[serde(default)]
    pub whitening: bool,
    #[serde(default)]
    pub ica: bool,
    /// Number of slow features to keep; all available when absent
    #[serde(default)]
    pub output_dim: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

// Default values
fn default_room_width() -> f64 { 200.0 }
fn default_room_height() -> f64 { 100.0 }
fn default_sensor_count() -> usize { 2 }
fn default_orthogonal() -> bool { true }
fn default_steps() -> usize { 10000 }
fn default_speed() -> f64 { 2.0 }
fn default_turn_interval() -> usize { 25 }
fn default_max_turn_degrees() -> u32 { 40 }
fn default_degree() -> usize { 1 }
fn default_output_path() -> String { "batwalk_result.json".to_string() }

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: default_room_width(),
            height: default_room_height(),
            walls: None,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            count: default_sensor_count(),
            orthogonal: default_orthogonal(),
            bounds_check: BoundsCheck::default(),
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            speed: default_speed(),
            turn_interval: default_turn_interval(),
            max_turn_degrees: default_max_turn_degrees(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            degree: default_degree(),
            whitening: false,
            ica: false,
            output_dim: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            room: RoomConfig::default(),
            sensors: SensorConfig::default(),
            walk: WalkConfig::default(),
            features: FeatureConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RoomConfig {
    /// Build the room, using the rectangle walls unless a list was given
    pub fn build(&self) -> Result<Room> {
        match &self.walls {
            Some(walls) => Room::new(self.width, self.height, walls.clone()),
            None => Room::rectangle(self.width, self.height),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if the file doesn't
    /// exist or doesn't parse
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    log::warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                log::info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.room.build()?;

        if self.sensors.count == 0 {
            return Err(invalid("sensors.count must be at least 1"));
        }
        if self.walk.steps < 3 {
            return Err(invalid("walk.steps must be at least 3"));
        }
        if !(self.walk.speed.is_finite() && self.walk.speed > 0.0) {
            return Err(invalid("walk.speed must be positive"));
        }
        // A single reflection must bring the bat back inside
        if self.walk.speed > self.room.width.min(self.room.height) / 2.0 {
            return Err(invalid("walk.speed must not exceed half the room's smaller side"));
        }
        if self.walk.turn_interval == 0 {
            return Err(invalid("walk.turn_interval must be at least 1"));
        }
        if self.features.degree == 0 {
            return Err(invalid("features.degree must be at least 1"));
        }
        if self.features.output_dim == Some(0) {
            return Err(invalid("features.output_dim must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig(message.to_string())
}
