//! NeuronCircle - Ring topology and the synchronous tick loop
//!
//! ```text
//!        inputs [0, num_inputs)        outputs [num_inputs, population)
//!   ... ─ I ─ I ─ I ─ I ─ O ─ O ─ O ─ O ─ ... (wraps around)
//! ```
//!
//! Each output neuron reads `num_neighbors` positions: `num_neighbors / 2`
//! counter-clockwise, the rest clockwise. A tick computes every output's next
//! state from a snapshot of the current states, then commits all of them at
//! once. Committing inside the compute loop would turn this into an
//! asynchronous automaton with different fixed points.

use serde::{Deserialize, Serialize};

use crate::config::CircleConfig;
use crate::encoding::{compute_distribution, compute_energy, StateDistribution};
use crate::error::Result;
use crate::matrix::AnnaMatrix;
use crate::neuron::{NeuronKind, TernaryNeuron};

/// Why an inference stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every output neuron is non-neutral
    AllNonzero,
    /// A tick changed nothing
    Converged,
    /// Tick cap reached
    MaxTicks,
}

impl TerminationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllNonzero => "all_nonzero",
            Self::Converged => "converged",
            Self::MaxTicks => "max_ticks",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one inference, built once and never mutated
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Output neuron states in ring order
    pub outputs: Vec<i8>,
    /// Full ring state
    pub states: Vec<i8>,
    /// Number of `run_tick` calls
    pub ticks: usize,
    pub reason: TerminationReason,
    /// Sum of output states
    pub energy: i64,
    pub distribution: StateDistribution,
    /// Full ring state before the first tick and after each tick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Vec<i8>>>,
}

/// Ring of ternary neurons
#[derive(Clone, Debug)]
pub struct NeuronCircle {
    config: CircleConfig,
    neurons: Vec<TernaryNeuron>,
    /// Precomputed neighbor positions per ring index
    neighbors: Vec<Vec<usize>>,
    /// Phase-1 scratch buffer: states as of the start of the tick
    scratch: Vec<i8>,
}

impl NeuronCircle {
    /// Build a ring with zero weights
    pub fn new(config: CircleConfig) -> Result<Self> {
        config.validate()?;

        let population = config.population();
        let neurons = (0..population)
            .map(|i| {
                let kind = if i < config.num_inputs {
                    NeuronKind::Input
                } else {
                    NeuronKind::Output
                };
                TernaryNeuron::new(i, kind, config.num_neighbors)
            })
            .collect();

        let neighbors = (0..population)
            .map(|i| ring_neighbors(i, population, config.num_neighbors))
            .collect();

        log::debug!(
            "NeuronCircle: {} inputs, {} outputs, {} neighbors, max {} ticks",
            config.num_inputs,
            config.num_outputs,
            config.num_neighbors,
            config.max_ticks
        );

        Ok(Self {
            config,
            neurons,
            neighbors,
            scratch: vec![0; population],
        })
    }

    pub fn config(&self) -> &CircleConfig {
        &self.config
    }

    pub fn population(&self) -> usize {
        self.neurons.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.config.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.config.num_outputs
    }

    pub fn neuron(&self, index: usize) -> Option<&TernaryNeuron> {
        self.neurons.get(index)
    }

    /// Neighbor ring positions of neuron `index`, in ring order
    pub fn neighbor_indices(&self, index: usize) -> &[usize] {
        &self.neighbors[index % self.neighbors.len()]
    }

    /// Full ring state
    pub fn states(&self) -> Vec<i8> {
        self.neurons.iter().map(|n| n.state().as_i8()).collect()
    }

    /// Output neuron states
    pub fn output_states(&self) -> Vec<i8> {
        self.neurons[self.config.num_inputs..]
            .iter()
            .map(|n| n.state().as_i8())
            .collect()
    }

    /// Set weights of the output neuron at ring position `index`
    pub fn set_weights(&mut self, index: usize, weights: Vec<i8>) {
        if let Some(neuron) = self.neurons.get_mut(index) {
            neuron.set_weights(weights);
        }
    }

    /// Zero every weight
    pub fn clear_weights(&mut self) {
        let k = self.config.num_neighbors;
        for neuron in &mut self.neurons {
            neuron.set_weights(vec![0; k]);
        }
    }

    /// Fill output weights from the matrix
    ///
    /// Output neuron at ring position `p` gets
    /// `weight[k] = matrix[p mod 128][neighbor_k mod 128]`, reduced to its sign
    /// when `ternary_only` is set.
    pub fn load_weights_from_matrix(&mut self, matrix: &AnnaMatrix, ternary_only: bool) {
        for p in self.config.num_inputs..self.population() {
            let weights = self.neighbors[p]
                .iter()
                .map(|&n| {
                    let w = matrix.get_wrapped(p, n);
                    if ternary_only {
                        w.signum()
                    } else {
                        w
                    }
                })
                .collect();
            self.neurons[p].set_weights(weights);
        }
        log::debug!(
            "Loaded {} output weight vectors (ternary_only={})",
            self.config.num_outputs,
            ternary_only
        );
    }

    /// Sum of all output weights
    pub fn weight_total(&self) -> i64 {
        self.neurons[self.config.num_inputs..]
            .iter()
            .flat_map(|n| n.weights())
            .map(|&w| w as i64)
            .sum()
    }

    /// One synchronous update; returns true if any state changed
    pub fn run_tick(&mut self) -> bool {
        for (slot, neuron) in self.scratch.iter_mut().zip(&self.neurons) {
            *slot = neuron.state().as_i8();
        }

        // Phase 1: compute against the snapshot
        let mut neighbor_states = Vec::with_capacity(self.config.num_neighbors);
        for (neuron, neighbors) in self.neurons.iter_mut().zip(&self.neighbors) {
            if neuron.kind() == NeuronKind::Input {
                continue;
            }
            neighbor_states.clear();
            neighbor_states.extend(neighbors.iter().map(|&j| self.scratch[j]));
            neuron.feedforward(&neighbor_states);
        }

        // Phase 2: commit everything
        let mut changed = false;
        for neuron in &mut self.neurons {
            changed |= neuron.commit();
        }
        changed
    }

    fn all_outputs_nonzero(&self) -> bool {
        self.neurons[self.config.num_inputs..]
            .iter()
            .all(|n| n.state().is_active())
    }

    /// Set inputs, reset outputs, tick until a stop condition
    ///
    /// Inputs are clamped; missing values are 0 and extra values are ignored.
    pub fn run_inference(&mut self, inputs: &[i64], record_history: bool) -> InferenceResult {
        let num_inputs = self.config.num_inputs;
        for (i, neuron) in self.neurons.iter_mut().enumerate() {
            if i < num_inputs {
                neuron.set_input(inputs.get(i).copied().unwrap_or(0));
            } else {
                neuron.reset(0);
            }
        }

        let mut history = record_history.then(|| vec![self.states()]);
        let mut ticks = 0;
        let mut reason = TerminationReason::MaxTicks;

        for _ in 0..self.config.max_ticks {
            if self.all_outputs_nonzero() {
                reason = TerminationReason::AllNonzero;
                break;
            }

            let changed = self.run_tick();
            ticks += 1;
            if let Some(h) = history.as_mut() {
                h.push(self.states());
            }

            if !changed {
                reason = TerminationReason::Converged;
                break;
            }
        }

        let outputs = self.output_states();
        log::debug!("Inference stopped after {} ticks: {}", ticks, reason);

        InferenceResult {
            energy: compute_energy(&outputs),
            distribution: compute_distribution(&outputs),
            states: self.states(),
            outputs,
            ticks,
            reason,
            history,
        }
    }
}

/// `k / 2` counter-clockwise positions then the remaining clockwise ones
fn ring_neighbors(index: usize, population: usize, k: usize) -> Vec<usize> {
    let left = k / 2;
    let right = k - left;
    let ccw = (1..=left).rev().map(|d| (index + population - d % population) % population);
    let cw = (1..=right).map(|d| (index + d) % population);
    ccw.chain(cw).collect()
}
