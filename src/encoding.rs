//! Ternary Encoding - Integers, bytes and text to {-1, 0, +1} sequences
//!
//! Binary expansion maps bit 0 → -1 and bit 1 → +1, little-endian. Zero is
//! never produced by bit expansion; it only appears in clamped integer
//! arrays and in neuron states.
//!
//! All fixed-length encoders pad with -1 (binary 0) unless noted otherwise,
//! and never fail: malformed hex falls back to text encoding.

use serde::{Deserialize, Serialize};

pub use crate::ternary::clamp;

/// Bitcoin base58 alphabet
const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Bits per seed letter (a..z → 0..25)
const SEED_BITS_PER_CHAR: usize = 5;

/// Bits per address character (base58 index 0..57)
const ADDRESS_BITS_PER_CHAR: usize = 6;

/// Count of each ternary value in a state vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl StateDistribution {
    /// Total number of states counted
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Little-endian bit expansion: bit i of `number` → +1 if set, -1 otherwise
///
/// Positions at or beyond 64 read as unset.
pub fn to_ternary_bits(number: u64, bit_count: usize) -> Vec<i8> {
    (0..bit_count)
        .map(|i| if i < 64 && (number >> i) & 1 == 1 { 1 } else { -1 })
        .collect()
}

/// Inverse of [`to_ternary_bits`]: any value > 0 is a set bit
///
/// Positions at or beyond 64 are ignored.
pub fn from_ternary_bits(bits: &[i8]) -> u64 {
    bits.iter()
        .take(64)
        .enumerate()
        .filter(|(_, &b)| b > 0)
        .fold(0u64, |acc, (i, _)| acc | (1u64 << i))
}

/// Truncate or pad `values` to exactly `len` entries
pub fn resize(mut values: Vec<i8>, len: usize, pad: i8) -> Vec<i8> {
    values.resize(len, pad);
    values
}

/// Expand bytes into ternary bits (8 per byte), padded with -1 to `len`
pub fn bytes_to_ternary(bytes: &[u8], len: usize) -> Vec<i8> {
    let bits: Vec<i8> = bytes
        .iter()
        .take(len.div_ceil(8))
        .flat_map(|&b| to_ternary_bits(b as u64, 8))
        .collect();
    resize(bits, len, -1)
}

/// UTF-8 encode `text`, truncate/pad to `max_bytes`, expand to `max_bytes * 8` values
pub fn text_to_ternary(text: &str, max_bytes: usize) -> Vec<i8> {
    bytes_to_ternary(text.as_bytes(), max_bytes * 8)
}

/// Decode a hex string (optional `0x` prefix) into `len` ternary bits
///
/// Odd-length strings get a leading `0`. Undecodable strings are encoded
/// as text instead.
pub fn hex_to_ternary(hex_str: &str, len: usize) -> Vec<i8> {
    let trimmed = hex_str.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let normalized = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    match hex::decode(&normalized) {
        Ok(bytes) => bytes_to_ternary(&bytes, len),
        Err(e) => {
            log::debug!("Hex decode failed for {:?} ({}), using text encoding", hex_str, e);
            resize(text_to_ternary(hex_str, len.div_ceil(8)), len, -1)
        }
    }
}

/// Clamp an integer array element-wise, padding with 0 to `len`
pub fn array_to_ternary(values: &[i64], len: usize) -> Vec<i8> {
    let states = values.iter().take(len).map(|&v| clamp(v)).collect();
    resize(states, len, 0)
}

/// Seed letters `a..z` as 5 bits each; any other character encodes as 0
pub fn seed_to_ternary(seed: &str, len: usize) -> Vec<i8> {
    let bits = seed
        .chars()
        .flat_map(|c| {
            let value = if c.is_ascii_lowercase() {
                (c as u8 - b'a') as u64
            } else {
                0
            };
            to_ternary_bits(value, SEED_BITS_PER_CHAR)
        })
        .take(len)
        .collect();
    resize(bits, len, -1)
}

/// Index of a character in the base58 alphabet
///
/// Characters outside the alphabet (bech32 `0`, `l`, ...) map to their byte
/// value modulo 58.
pub fn base58_index(c: char) -> u8 {
    let byte = if c.is_ascii() { c as u8 } else { b'?' };
    BASE58_ALPHABET
        .iter()
        .position(|&a| a == byte)
        .map(|p| p as u8)
        .unwrap_or(byte % 58)
}

/// Address characters as 6-bit base58 indices
pub fn address_to_ternary(address: &str, len: usize) -> Vec<i8> {
    let bits = address
        .chars()
        .flat_map(|c| to_ternary_bits(base58_index(c) as u64, ADDRESS_BITS_PER_CHAR))
        .take(len)
        .collect();
    resize(bits, len, -1)
}

/// First half of the vector holds `x`, the rest holds `y` (two's complement bits)
pub fn coords_to_ternary(x: i64, y: i64, len: usize) -> Vec<i8> {
    let half = len / 2;
    let mut bits = to_ternary_bits(x as u64, half);
    bits.extend(to_ternary_bits(y as u64, len - half));
    bits
}

/// Aggregate energy: plain sum of all states
pub fn compute_energy(states: &[i8]) -> i64 {
    states.iter().map(|&s| s as i64).sum()
}

/// Count positive, neutral and negative entries
pub fn compute_distribution(states: &[i8]) -> StateDistribution {
    let mut dist = StateDistribution::default();
    for &s in states {
        match s {
            s if s > 0 => dist.positive += 1,
            s if s < 0 => dist.negative += 1,
            _ => dist.neutral += 1,
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_to_ternary_bits_five() {
        assert_eq!(to_ternary_bits(5, 4), vec![1, -1, 1, -1]);
        assert_eq!(from_ternary_bits(&[1, -1, 1, -1]), 5);
    }

    #[test]
    fn test_bits_never_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let v: u64 = rng.gen();
            let bits = to_ternary_bits(v, 70);
            assert_eq!(bits.len(), 70);
            assert!(bits.iter().all(|&b| b == 1 || b == -1));
        }
    }

    #[test]
    fn test_bits_roundtrip_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let width = rng.gen_range(1..=64u32);
            let v: u64 = rng.gen::<u64>() >> (64 - width);
            let extra = rng.gen_range(0..8usize);
            let bit_count = width as usize + extra;
            assert_eq!(from_ternary_bits(&to_ternary_bits(v, bit_count)), v);
        }
    }

    #[test]
    fn test_from_bits_treats_non_positive_as_zero() {
        assert_eq!(from_ternary_bits(&[0, 0, 0]), 0);
        assert_eq!(from_ternary_bits(&[1, 0, -1, 1]), 0b1001);
    }

    #[test]
    fn test_text_fixed_length() {
        let short = text_to_ternary("A", 4);
        assert_eq!(short.len(), 32);
        // 'A' = 0x41 = 0b0100_0001
        assert_eq!(&short[..8], &[1, -1, -1, -1, -1, -1, 1, -1]);
        assert!(short[8..].iter().all(|&b| b == -1));

        let long = text_to_ternary("a much longer sentence", 2);
        assert_eq!(long.len(), 16);
        assert_eq!(from_ternary_bits(&long[..8]), b'a' as u64);
    }

    #[test]
    fn test_hex_decoding() {
        let bits = hex_to_ternary("0xff", 16);
        assert!(bits[..8].iter().all(|&b| b == 1));
        assert!(bits[8..].iter().all(|&b| b == -1));

        // Odd length gets a leading zero: "f" → 0x0f
        let odd = hex_to_ternary("0xf", 8);
        assert_eq!(from_ternary_bits(&odd), 0x0f);
    }

    #[test]
    fn test_hex_malformed_falls_back_to_text() {
        let bits = hex_to_ternary("0xzz", 64);
        assert_eq!(bits.len(), 64);
        assert_eq!(bits, text_to_ternary("0xzz", 8));
    }

    #[test]
    fn test_array_clamps_and_pads_neutral() {
        let states = array_to_ternary(&[5, -3, 0, 100], 6);
        assert_eq!(states, vec![1, -1, 0, 1, 0, 0]);
        assert_eq!(array_to_ternary(&[1, 1, 1], 2), vec![1, 1]);
    }

    #[test]
    fn test_seed_letters() {
        // 'b' = 1 → [1, -1, -1, -1, -1]
        let bits = seed_to_ternary("b", 10);
        assert_eq!(&bits[..5], &[1, -1, -1, -1, -1]);
        assert!(bits[5..].iter().all(|&b| b == -1));
        assert_eq!(seed_to_ternary(&"z".repeat(55), 64).len(), 64);
    }

    #[test]
    fn test_base58_index() {
        assert_eq!(base58_index('1'), 0);
        assert_eq!(base58_index('z'), 57);
        assert_eq!(base58_index('0'), b'0' % 58);
        assert_eq!(address_to_ternary("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", 64).len(), 64);
    }

    #[test]
    fn test_coords_halves() {
        let bits = coords_to_ternary(3, 1, 8);
        assert_eq!(from_ternary_bits(&bits[..4]), 3);
        assert_eq!(from_ternary_bits(&bits[4..]), 1);

        // Negative coordinates use two's complement bits
        let neg = coords_to_ternary(-1, 0, 8);
        assert!(neg[..4].iter().all(|&b| b == 1));
    }

    #[test]
    fn test_energy_and_distribution() {
        let states = [1, 1, 0, -1, 1, 0, -1];
        assert_eq!(compute_energy(&states), 1);
        let dist = compute_distribution(&states);
        assert_eq!(dist, StateDistribution { positive: 3, neutral: 2, negative: 2 });
        assert_eq!(dist.total(), states.len());
        assert_eq!(compute_energy(&[]), 0);
    }

    #[test]
    fn test_distribution_partitions_random() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let len = rng.gen_range(0..300);
            let states: Vec<i8> = (0..len).map(|_| rng.gen_range(-1..=1)).collect();
            let dist = compute_distribution(&states);
            assert_eq!(dist.total(), states.len());
            let sum: i64 = states.iter().map(|&s| s as i64).sum();
            assert_eq!(compute_energy(&states), sum);
            assert_eq!(sum, dist.positive as i64 - dist.negative as i64);
        }
    }
}
