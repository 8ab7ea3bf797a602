//! TernaryState - The atomic unit of the ring network
//!
//! Every neuron holds exactly one of three states:
//! - **Inhibited** (-1)
//! - **Neutral** (0)
//! - **Excited** (+1)
//!
//! State vectors travel through the crate as plain `i8` slices so they can be
//! summed and serialized directly; `TernaryState` is the typed view used
//! inside neurons.
//!
//! # Example
//! ```
//! use aigarth::{clamp, TernaryState};
//!
//! assert_eq!(clamp(42), 1);
//! assert_eq!(clamp(-7), -1);
//! assert_eq!(TernaryState::clamp(0), TernaryState::Neutral);
//! ```

use serde::{Deserialize, Serialize};

/// Sign clamp: 1 if `x > 0`, -1 if `x < 0`, else 0
#[inline]
pub const fn clamp(x: i64) -> i8 {
    if x > 0 {
        1
    } else if x < 0 {
        -1
    } else {
        0
    }
}

/// Ternary neuron state - strictly {-1, 0, +1}
///
/// Serializes as the bare integer so state vectors stay readable in JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
#[repr(i8)]
pub enum TernaryState {
    /// Inhibited (-1)
    Inhibited = -1,
    /// Neutral / silent (0)
    #[default]
    Neutral = 0,
    /// Excited (+1)
    Excited = 1,
}

impl TernaryState {
    /// Convert to i8
    #[inline]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Try to convert from i8, returns None for values outside {-1, 0, 1}
    #[inline]
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Inhibited),
            0 => Some(Self::Neutral),
            1 => Some(Self::Excited),
            _ => None,
        }
    }

    /// Clamp any integer to its sign
    #[inline]
    pub const fn clamp(value: i64) -> Self {
        match clamp(value) {
            1 => Self::Excited,
            -1 => Self::Inhibited,
            _ => Self::Neutral,
        }
    }

    /// Is this a non-neutral state?
    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl From<TernaryState> for i8 {
    fn from(s: TernaryState) -> i8 {
        s.as_i8()
    }
}

impl TryFrom<i8> for TernaryState {
    type Error = &'static str;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        TernaryState::from_i8(value).ok_or("ternary state must be -1, 0, or +1")
    }
}
