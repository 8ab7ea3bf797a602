//! TernaryNeuron - Weighted sum + sign clamp
//!
//! Updates are two-phase: [`TernaryNeuron::feedforward`] computes the pending
//! next state, [`TernaryNeuron::commit`] makes it current. A circle runs
//! `feedforward` on every neuron before committing any of them, so all
//! neurons in a tick observe the same prior-tick states.

use crate::ternary::TernaryState;

/// Role of a neuron on the ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeuronKind {
    /// Holds an externally set value, never computes
    Input,
    /// Computes its state from neighbors
    Output,
}

/// Single ternary neuron
#[derive(Clone, Debug)]
pub struct TernaryNeuron {
    index: usize,
    kind: NeuronKind,
    state: TernaryState,
    next_state: TernaryState,
    /// One weight per neighbor, aligned with the circle's neighbor order
    weights: Vec<i8>,
}

impl TernaryNeuron {
    /// Create a neutral neuron with `weight_count` zero weights
    pub fn new(index: usize, kind: NeuronKind, weight_count: usize) -> Self {
        Self {
            index,
            kind,
            state: TernaryState::Neutral,
            next_state: TernaryState::Neutral,
            weights: vec![0; weight_count],
        }
    }

    /// Compute the pending next state from neighbor states
    ///
    /// Input neurons return their current state and store nothing. Output
    /// neurons sum `neighbor[i] * weight[i]` over the shorter of the two
    /// slices and clamp the sum.
    pub fn feedforward(&mut self, neighbor_states: &[i8]) -> TernaryState {
        if self.kind == NeuronKind::Input {
            return self.state;
        }

        let sum: i64 = neighbor_states
            .iter()
            .zip(&self.weights)
            .map(|(&s, &w)| s as i64 * w as i64)
            .sum();

        self.next_state = TernaryState::clamp(sum);
        self.next_state
    }

    /// Replace the current state with the pending one
    ///
    /// Returns true if the state changed.
    pub fn commit(&mut self) -> bool {
        let changed = self.state != self.next_state;
        self.state = self.next_state;
        changed
    }

    /// Force the state (clamped), discarding any pending update
    pub fn reset(&mut self, value: i64) {
        self.state = TernaryState::clamp(value);
        self.next_state = self.state;
    }

    /// Set an input value (clamped)
    pub fn set_input(&mut self, value: i64) {
        self.reset(value);
    }

    /// Replace the weight vector
    pub fn set_weights(&mut self, weights: Vec<i8>) {
        self.weights = weights;
    }

    /// Current weights
    pub fn weights(&self) -> &[i8] {
        &self.weights
    }

    /// Current state
    #[inline]
    pub fn state(&self) -> TernaryState {
        self.state
    }

    /// Neuron role
    #[inline]
    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    /// Ring position
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}
