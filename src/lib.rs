//! # Aigarth - Ternary Ring Network over the Anna Matrix
//!
//! A small ring of ternary neurons whose weights come from the 128×128 Anna
//! Matrix. Inputs of any shape (text, hex, coordinates, seeds, addresses,
//! integer arrays) are encoded to a fixed-length {-1, 0, +1} vector, the ring
//! ticks synchronously until it settles, and the output layer is read back
//! as an energy, a label and a decoded integer.
//!
//! ## Core Components
//!
//! - **TernaryState**: -1 (inhibited), 0 (neutral), +1 (excited)
//! - **Encoding**: integers, bytes and text to ternary sequences and back
//! - **TernaryNeuron**: weighted sum + sign clamp, two-phase update
//! - **NeuronCircle**: ring topology and the tick loop
//! - **AigarthEngine**: input detection, inference, result shaping
//! - **AnnaMatrix**: matrix loading, symmetry anomalies, coordinates
//!
//! ## Example
//!
//! ```
//! use aigarth::{NeuronCircle, CircleConfig, TerminationReason};
//!
//! let mut circle = NeuronCircle::new(CircleConfig::new(4, 4, 2, 10)).unwrap();
//! let result = circle.run_inference(&[1, -1, 1, -1], false);
//!
//! // Zero weights: nothing ever moves
//! assert_eq!(result.reason, TerminationReason::Converged);
//! assert_eq!(result.ticks, 1);
//! assert_eq!(result.energy, 0);
//! ```

// Ternary state - the atomic unit
mod ternary;
pub use ternary::{clamp, TernaryState};

// Encoding between integers/bytes/text and ternary vectors
pub mod encoding;
pub use encoding::{
    compute_distribution, compute_energy, from_ternary_bits, text_to_ternary,
    to_ternary_bits, StateDistribution,
};

// Neurons and the ring
pub mod neuron;
pub use neuron::{NeuronKind, TernaryNeuron};

pub mod circle;
pub use circle::{InferenceResult, NeuronCircle, TerminationReason};

// Configuration
pub mod config;
pub use config::{CircleConfig, EngineConfig};

// Input classification
pub mod input;
pub use input::{Input, InputKind};

// Anna Matrix
pub mod matrix;
pub use matrix::{AnnaCoord, AnnaMatrix, Anomaly, AnomalyReport, MatrixStats, MATRIX_DIM};

// Engine
pub mod engine;
pub use engine::{
    energy_label, AigarthEngine, Answer, CellQuery, Comparison, EngineStats, OracleAnswer,
    ProcessingResult,
};

// Error types
mod error;
pub use error::{AigarthError, Result};
