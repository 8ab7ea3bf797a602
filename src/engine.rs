//! AigarthEngine - Input normalization, inference and result shaping
//!
//! # Example
//!
//! ```
//! use aigarth::{AigarthEngine, EngineConfig};
//!
//! // No matrix path: the engine runs with zero weights
//! let mut engine = AigarthEngine::new(EngineConfig::default()).unwrap();
//! assert!(!engine.is_matrix_loaded());
//!
//! let result = engine.process("hello", None, false);
//! assert_eq!(result.result.energy, 0);
//! assert_eq!(result.energy_label, "NEUTRAL");
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::circle::{InferenceResult, NeuronCircle};
use crate::config::EngineConfig;
use crate::encoding::from_ternary_bits;
use crate::error::{AigarthError, Result};
use crate::input::{Input, InputKind};
use crate::matrix::{AnnaCoord, AnnaMatrix, MatrixStats};

/// Energy divisor for oracle confidence
pub const ORACLE_ENERGY_SCALE: f64 = 64.0;

/// Human-readable energy band
pub fn energy_label(energy: i64) -> &'static str {
    match energy {
        e if e > 50 => "EXTREMELY POSITIVE",
        e if e > 20 => "STRONGLY POSITIVE",
        e if e > 0 => "POSITIVE",
        0 => "NEUTRAL",
        e if e >= -20 => "NEGATIVE",
        e if e >= -50 => "STRONGLY NEGATIVE",
        _ => "EXTREMELY NEGATIVE",
    }
}

/// One processed input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub input: String,
    pub input_type: InputKind,
    pub ternary_input: Vec<i8>,
    pub result: InferenceResult,
    pub elapsed_ms: f64,
    /// Output vector read back as little-endian bits (first 64 outputs)
    pub decoded_value: u64,
    pub decoded_hex: String,
    pub energy_label: String,
}

/// Two inputs side by side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub first: ProcessingResult,
    pub second: ProcessingResult,
    /// Cosine similarity of the output vectors
    pub similarity: f64,
    /// Share of equal output positions, 0..=100
    pub match_percentage: f64,
}

/// Oracle verdict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Answer {
    Yes,
    No,
    Uncertain,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Uncertain => "UNCERTAIN",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleAnswer {
    pub question: String,
    pub answer: Answer,
    /// `min(|energy| / 64, 1)`
    pub confidence: f64,
    pub energy: i64,
    pub processing: ProcessingResult,
}

/// Matrix cell lookup by Anna coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellQuery {
    pub x: i64,
    pub y: i64,
    pub row: usize,
    pub col: usize,
    pub value: i8,
    pub mirror_value: i8,
    pub anomalous: bool,
    pub processing: ProcessingResult,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub matrix_loaded: bool,
    pub matrix: Option<MatrixStats>,
    pub population: usize,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_neighbors: usize,
    pub max_ticks: usize,
    pub ternary_weights: bool,
    /// Sum of all output weights
    pub weight_energy: i64,
}

/// The engine
#[derive(Clone, Debug)]
pub struct AigarthEngine {
    config: EngineConfig,
    circle: NeuronCircle,
    matrix: Option<AnnaMatrix>,
}

impl AigarthEngine {
    /// Build from config, loading the matrix if a path is set
    ///
    /// A missing or unreadable matrix is not an error: the engine logs a
    /// warning and runs with zero weights. An invalid topology is an error.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let matrix = match &config.matrix_path {
            Some(path) => match AnnaMatrix::load(path) {
                Ok(m) => Some(m),
                Err(e) => {
                    log::warn!(
                        "Matrix not loaded from {} ({}), running with zero weights",
                        path.display(),
                        e
                    );
                    None
                }
            },
            None => {
                log::warn!("No matrix path configured, running with zero weights");
                None
            }
        };
        Self::build(config, matrix)
    }

    /// Build around an in-memory matrix
    pub fn with_matrix(config: EngineConfig, matrix: AnnaMatrix) -> Result<Self> {
        Self::build(config, Some(matrix))
    }

    fn build(config: EngineConfig, matrix: Option<AnnaMatrix>) -> Result<Self> {
        config.validate()?;
        let mut circle = NeuronCircle::new(config.circle())?;
        if let Some(m) = &matrix {
            circle.load_weights_from_matrix(m, config.ternary_weights);
        }
        Ok(Self {
            config,
            circle,
            matrix,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_matrix_loaded(&self) -> bool {
        self.matrix.is_some()
    }

    pub fn matrix(&self) -> Option<&AnnaMatrix> {
        self.matrix.as_ref()
    }

    pub fn circle(&self) -> &NeuronCircle {
        &self.circle
    }

    #[inline]
    pub fn detect_input_type(&self, raw: &str) -> InputKind {
        Input::detect(raw).kind()
    }

    /// Encode `raw` as `kind`, sized to the input layer
    pub fn convert_to_ternary(&self, raw: &str, kind: InputKind) -> Vec<i8> {
        Input::parse_as(raw, kind).to_ternary(self.config.num_inputs)
    }

    /// Detect (or honor a hint), encode, run, decode
    pub fn process(&mut self, raw: &str, type_hint: Option<InputKind>, record_history: bool) -> ProcessingResult {
        let start = Instant::now();

        let input = match type_hint {
            Some(kind) => Input::parse_as(raw, kind),
            None => Input::detect(raw),
        };
        let ternary_input = input.to_ternary(self.config.num_inputs);
        let values: Vec<i64> = ternary_input.iter().map(|&v| v as i64).collect();

        let result = self.circle.run_inference(&values, record_history);
        let decoded_value = from_ternary_bits(&result.outputs);
        let label = energy_label(result.energy);

        log::debug!(
            "Processed {:?} as {}: energy {} after {} ticks ({})",
            raw,
            input.kind(),
            result.energy,
            result.ticks,
            result.reason
        );

        ProcessingResult {
            input: raw.to_string(),
            input_type: input.kind(),
            ternary_input,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
            decoded_value,
            decoded_hex: format!("{:#x}", decoded_value),
            energy_label: label.to_string(),
            result,
        }
    }

    /// Process both inputs and score how alike their outputs are
    pub fn compare(&mut self, a: &str, b: &str) -> Comparison {
        let first = self.process(a, None, false);
        let second = self.process(b, None, false);
        let similarity = cosine_similarity(&first.result.outputs, &second.result.outputs);
        let match_percentage = match_percentage(&first.result.outputs, &second.result.outputs);
        Comparison {
            first,
            second,
            similarity,
            match_percentage,
        }
    }

    /// Map output energy to YES / NO / UNCERTAIN
    pub fn oracle(&mut self, question: &str) -> OracleAnswer {
        let processing = self.process(question, None, false);
        let energy = processing.result.energy;
        let answer = match energy.signum() {
            1 => Answer::Yes,
            -1 => Answer::No,
            _ => Answer::Uncertain,
        };
        OracleAnswer {
            question: question.to_string(),
            answer,
            confidence: (energy.unsigned_abs() as f64 / ORACLE_ENERGY_SCALE).min(1.0),
            energy,
            processing,
        }
    }

    /// Look up a cell by Anna coordinates and run the coordinates through the network
    pub fn query(&mut self, x: i64, y: i64) -> Result<CellQuery> {
        let matrix = self.matrix.as_ref().ok_or(AigarthError::MatrixNotLoaded)?;
        let (row, col) = AnnaCoord::new(x, y).to_matrix();
        let (mr, mc) = AnnaMatrix::mirror(row, col);
        let value = matrix.get_wrapped(row, col);
        let mirror_value = matrix.get_wrapped(mr, mc);
        let anomalous = matrix.is_anomalous(row, col);

        let processing = self.process(&format!("{},{}", x, y), Some(InputKind::Coords), false);
        Ok(CellQuery {
            x,
            y,
            row,
            col,
            value,
            mirror_value,
            anomalous,
            processing,
        })
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            matrix_loaded: self.is_matrix_loaded(),
            matrix: self.matrix.as_ref().map(AnnaMatrix::stats),
            population: self.circle.population(),
            num_inputs: self.config.num_inputs,
            num_outputs: self.config.num_outputs,
            num_neighbors: self.config.num_neighbors,
            max_ticks: self.config.max_ticks,
            ternary_weights: self.config.ternary_weights,
            weight_energy: self.circle.weight_total(),
        }
    }
}

/// Cosine similarity; two all-neutral vectors count as identical
pub fn cosine_similarity(a: &[i8], b: &[i8]) -> f64 {
    let dot: i64 = a.iter().zip(b).map(|(&x, &y)| x as i64 * y as i64).sum();
    let norm_a: i64 = a.iter().map(|&x| x as i64 * x as i64).sum();
    let norm_b: i64 = b.iter().map(|&y| y as i64 * y as i64).sum();
    match (norm_a, norm_b) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => dot as f64 / ((norm_a as f64).sqrt() * (norm_b as f64).sqrt()),
    }
}

/// Percentage of positions with equal values, over the longer length
pub fn match_percentage(a: &[i8], b: &[i8]) -> f64 {
    let len = a.len().max(b.len());
    if len == 0 {
        return 100.0;
    }
    let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
    matches as f64 * 100.0 / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle::TerminationReason;
    use crate::matrix::MATRIX_DIM;

    fn small_config() -> EngineConfig {
        EngineConfig {
            num_inputs: 4,
            num_outputs: 4,
            num_neighbors: 2,
            max_ticks: 10,
            ..Default::default()
        }
    }

    /// Every output copies its counter-clockwise neighbor
    fn copy_left_matrix() -> AnnaMatrix {
        let mut rows = vec![vec![0i8; MATRIX_DIM]; MATRIX_DIM];
        for p in 0..MATRIX_DIM {
            rows[p][(p + MATRIX_DIM - 1) % MATRIX_DIM] = 1;
        }
        AnnaMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_energy_labels() {
        assert_eq!(energy_label(64), "EXTREMELY POSITIVE");
        assert_eq!(energy_label(51), "EXTREMELY POSITIVE");
        assert_eq!(energy_label(50), "STRONGLY POSITIVE");
        assert_eq!(energy_label(21), "STRONGLY POSITIVE");
        assert_eq!(energy_label(20), "POSITIVE");
        assert_eq!(energy_label(1), "POSITIVE");
        assert_eq!(energy_label(0), "NEUTRAL");
        assert_eq!(energy_label(-1), "NEGATIVE");
        assert_eq!(energy_label(-20), "NEGATIVE");
        assert_eq!(energy_label(-21), "STRONGLY NEGATIVE");
        assert_eq!(energy_label(-50), "STRONGLY NEGATIVE");
        assert_eq!(energy_label(-51), "EXTREMELY NEGATIVE");
    }

    #[test]
    fn test_degraded_mode_without_matrix() {
        let config = EngineConfig {
            matrix_path: Some("definitely/does/not/exist.json".into()),
            ..small_config()
        };
        let mut engine = AigarthEngine::new(config).unwrap();
        assert!(!engine.is_matrix_loaded());

        let result = engine.process("anything", None, false);
        assert_eq!(result.result.reason, TerminationReason::Converged);
        assert_eq!(result.result.ticks, 1);
        assert_eq!(result.result.outputs, vec![0, 0, 0, 0]);
        assert_eq!(result.decoded_value, 0);
        assert_eq!(result.energy_label, "NEUTRAL");

        assert!(matches!(engine.query(0, 0), Err(AigarthError::MatrixNotLoaded)));
        assert!(!engine.stats().matrix_loaded);
    }

    #[test]
    fn test_invalid_topology_rejected() {
        let config = EngineConfig {
            num_neighbors: 100,
            ..small_config()
        };
        assert!(matches!(
            AigarthEngine::new(config),
            Err(AigarthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_process_with_matrix() {
        let mut engine = AigarthEngine::with_matrix(small_config(), copy_left_matrix()).unwrap();
        // [1,1,1,1] excites the whole ring
        let result = engine.process("[1,1,1,1]", None, true);
        assert_eq!(result.input_type, InputKind::Array);
        assert_eq!(result.ternary_input, vec![1, 1, 1, 1]);
        assert_eq!(result.result.reason, TerminationReason::AllNonzero);
        assert_eq!(result.result.outputs, vec![1, 1, 1, 1]);
        assert_eq!(result.decoded_value, 0b1111);
        assert_eq!(result.decoded_hex, "0xf");
        assert_eq!(result.energy_label, "POSITIVE");
        assert!(result.result.history.is_some());

        // Deterministic across calls
        let again = engine.process("[1,1,1,1]", None, false);
        assert_eq!(again.result.outputs, result.result.outputs);
    }

    #[test]
    fn test_type_hint_overrides_detection() {
        let mut engine = AigarthEngine::new(small_config()).unwrap();
        assert_eq!(engine.detect_input_type("3,4"), InputKind::Coords);
        let hinted = engine.process("3,4", Some(InputKind::Text), false);
        assert_eq!(hinted.input_type, InputKind::Text);
        assert_eq!(hinted.ternary_input, engine.convert_to_ternary("3,4", InputKind::Text));
        assert_eq!(hinted.ternary_input.len(), 4);
    }

    #[test]
    fn test_compare() {
        let mut engine = AigarthEngine::with_matrix(small_config(), copy_left_matrix()).unwrap();
        let same = engine.compare("[1,1,1,1]", "[1,1,1,1]");
        assert!((same.similarity - 1.0).abs() < 1e-9);
        assert_eq!(same.match_percentage, 100.0);

        let opposite = engine.compare("[1,1,1,1]", "[-1,-1,-1,-1]");
        assert!((opposite.similarity + 1.0).abs() < 1e-9);
        assert_eq!(opposite.match_percentage, 0.0);
    }

    #[test]
    fn test_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[0, 0], &[0, 0]), 1.0);
        assert_eq!(cosine_similarity(&[0, 0], &[1, 0]), 0.0);
        assert_eq!(match_percentage(&[1, 0, -1, 1], &[1, 0, 1, -1]), 50.0);
        assert_eq!(match_percentage(&[], &[]), 100.0);
    }

    #[test]
    fn test_oracle() {
        let mut engine = AigarthEngine::with_matrix(small_config(), copy_left_matrix()).unwrap();
        let yes = engine.oracle("[1,1,1,1]");
        assert_eq!(yes.answer, Answer::Yes);
        assert_eq!(yes.energy, 4);
        assert!((yes.confidence - 4.0 / 64.0).abs() < 1e-9);

        let no = engine.oracle("[-1,-1,-1,-1]");
        assert_eq!(no.answer, Answer::No);

        let mut blank = AigarthEngine::new(small_config()).unwrap();
        let unsure = blank.oracle("will it rain?");
        assert_eq!(unsure.answer, Answer::Uncertain);
        assert_eq!(unsure.confidence, 0.0);
    }

    #[test]
    fn test_query() {
        let mut rows = vec![vec![0i8; MATRIX_DIM]; MATRIX_DIM];
        // Anna (0, 0) → row 63, col 64; mirror → row 64, col 63
        rows[63][64] = 26;
        rows[64][63] = -27;
        let mut engine = AigarthEngine::with_matrix(small_config(), AnnaMatrix::from_rows(rows).unwrap()).unwrap();

        let cell = engine.query(0, 0).unwrap();
        assert_eq!((cell.row, cell.col), (63, 64));
        assert_eq!(cell.value, 26);
        assert_eq!(cell.mirror_value, -27);
        assert!(!cell.anomalous);
        assert_eq!(cell.processing.input_type, InputKind::Coords);

        // All-zero pairs sum to 0, not -1
        assert!(engine.query(5, 5).unwrap().anomalous);
    }

    #[test]
    fn test_stats() {
        let engine = AigarthEngine::with_matrix(small_config(), copy_left_matrix()).unwrap();
        let stats = engine.stats();
        assert!(stats.matrix_loaded);
        assert_eq!(stats.population, 8);
        // Outputs 4..8 each read matrix[p][p-1] = 1 at neighbor slot 0
        assert_eq!(stats.weight_energy, 4);
        assert_eq!(stats.matrix.unwrap().positive_count, MATRIX_DIM);
    }

    #[test]
    fn test_result_serializes() {
        let mut engine = AigarthEngine::new(small_config()).unwrap();
        let result = engine.oracle("0x01");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"answer\":\"UNCERTAIN\""));
        assert!(json.contains("\"input_type\":\"hex\""));
        assert!(json.contains("\"reason\":\"converged\""));
    }
}
