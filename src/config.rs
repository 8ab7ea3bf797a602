//! Engine and topology configuration
//!
//! Configuration is explicit: nothing is derived from the binary's location.
//! Files are JSON and every field is optional.
//!
//! ```json
//! { "matrix_path": "data/anna-matrix.json", "max_ticks": 500 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AigarthError, Result};

/// Ring topology parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleConfig {
    /// Input neurons at ring positions `[0, num_inputs)`
    pub num_inputs: usize,
    /// Output neurons at ring positions `[num_inputs, population)`
    pub num_outputs: usize,
    /// Neighbors per output neuron, split counter-clockwise / clockwise
    pub num_neighbors: usize,
    /// Tick cap for one inference
    pub max_ticks: usize,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            num_inputs: 64,
            num_outputs: 64,
            num_neighbors: 8,
            max_ticks: 1000,
        }
    }
}

impl CircleConfig {
    /// Create a topology with explicit sizes
    pub fn new(num_inputs: usize, num_outputs: usize, num_neighbors: usize, max_ticks: usize) -> Self {
        Self {
            num_inputs,
            num_outputs,
            num_neighbors,
            max_ticks,
        }
    }

    /// Total ring size
    pub fn population(&self) -> usize {
        self.num_inputs + self.num_outputs
    }

    /// Reject topologies the tick loop cannot run
    pub fn validate(&self) -> Result<()> {
        if self.num_inputs == 0 {
            return Err(AigarthError::InvalidConfig("num_inputs must be > 0".into()));
        }
        if self.num_outputs == 0 {
            return Err(AigarthError::InvalidConfig("num_outputs must be > 0".into()));
        }
        if self.num_neighbors == 0 {
            return Err(AigarthError::InvalidConfig("num_neighbors must be > 0".into()));
        }
        if self.num_neighbors >= self.population() {
            return Err(AigarthError::InvalidConfig(format!(
                "num_neighbors ({}) must be smaller than population ({})",
                self.num_neighbors,
                self.population()
            )));
        }
        if self.max_ticks == 0 {
            return Err(AigarthError::InvalidConfig("max_ticks must be > 0".into()));
        }
        Ok(())
    }
}

/// Full engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Anna Matrix JSON file; `None` runs without matrix weights
    pub matrix_path: Option<PathBuf>,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_neighbors: usize,
    pub max_ticks: usize,
    /// Reduce matrix weights to their sign
    pub ternary_weights: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let circle = CircleConfig::default();
        Self {
            matrix_path: None,
            num_inputs: circle.num_inputs,
            num_outputs: circle.num_outputs,
            num_neighbors: circle.num_neighbors,
            max_ticks: circle.max_ticks,
            ternary_weights: false,
        }
    }
}

impl EngineConfig {
    /// Default topology reading weights from `path`
    pub fn with_matrix_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            matrix_path: Some(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        log::debug!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Topology subset
    pub fn circle(&self) -> CircleConfig {
        CircleConfig::new(self.num_inputs, self.num_outputs, self.num_neighbors, self.max_ticks)
    }

    /// Validate the topology
    pub fn validate(&self) -> Result<()> {
        self.circle().validate()
    }
}
