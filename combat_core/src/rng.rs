//! Seedable RNG service
//!
//! Every dodge/crit roll, AI exploration draw and spawn roll goes through
//! [`BattleRng`]. Each draw consumes exactly one 64-bit word from the
//! underlying stream, so a run can be resumed from `(seed, draw_index)` and
//! two runs with the same seed and inputs produce identical outcomes.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Random source used by every combat module
pub trait BattleRng {
    /// Uniform float in `[0, 1)`. `tag` names the roll for tracing/replay.
    fn rand(&mut self, tag: &str) -> f64;

    /// Number of draws taken so far
    fn draw_index(&self) -> u64;

    /// Uniform integer in `[min, max]` inclusive, from a single draw
    fn rand_int(&mut self, min: i64, max: i64, tag: &str) -> i64 {
        if min >= max {
            // Still consume the draw so stream position does not depend on inputs
            let _ = self.rand(tag);
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.rand(tag) * span).floor() as i64;
        (min + offset).min(max)
    }

    /// Bernoulli trial with probability `p`
    fn chance(&mut self, p: f64, tag: &str) -> bool {
        self.rand(tag) < p
    }
}

/// Weighted pick over `weights` from a single draw
///
/// Non-positive and non-finite weights are never picked. Returns `None` when
/// nothing has positive weight (no draw is taken in that case).
pub fn pick_weighted(rng: &mut dyn BattleRng, weights: &[f64], tag: &str) -> Option<usize> {
    let total: f64 = weights
        .iter()
        .filter(|w| w.is_finite() && **w > 0.0)
        .sum();
    if total <= 0.0 {
        return None;
    }

    let mut roll = rng.rand(tag) * total;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if !w.is_finite() || w <= 0.0 {
            continue;
        }
        if roll < w {
            return Some(i);
        }
        roll -= w;
        last = Some(i);
    }
    // Float drift at the top of the range lands on the last eligible entry
    last
}

/// A recorded draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RngDraw {
    pub index: u64,
    pub tag: String,
    pub value: f64,
}

/// ChaCha8-backed deterministic RNG with a monotonically increasing draw index
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    draw_index: u64,
    inner: ChaCha8Rng,
    recording: Option<Vec<RngDraw>>,
}

impl SeededRng {
    /// Create a new RNG at the start of the stream for `seed`
    pub fn new(seed: u64) -> Self {
        SeededRng {
            seed,
            draw_index: 0,
            inner: ChaCha8Rng::seed_from_u64(seed),
            recording: None,
        }
    }

    /// Resume the stream for `seed` positioned right before draw `draw_index`
    pub fn resume(seed: u64, draw_index: u64) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        // One draw = one u64 = two 32-bit words
        inner.set_word_pos(u128::from(draw_index) * 2);
        SeededRng {
            seed,
            draw_index,
            inner,
            recording: None,
        }
    }

    /// Enable recording of every draw
    pub fn with_recording(mut self) -> Self {
        self.recording = Some(Vec::new());
        self
    }

    /// The seed this stream was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Recorded draws, if recording is enabled
    pub fn recorded(&self) -> &[RngDraw] {
        self.recording.as_deref().unwrap_or(&[])
    }
}

impl BattleRng for SeededRng {
    fn rand(&mut self, tag: &str) -> f64 {
        // 53 high bits -> uniform [0, 1)
        let value = (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64);
        tracing::trace!(tag, index = self.draw_index, value, "rng draw");
        if let Some(log) = self.recording.as_mut() {
            log.push(RngDraw {
                index: self.draw_index,
                tag: tag.to_string(),
                value,
            });
        }
        self.draw_index += 1;
        value
    }

    fn draw_index(&self) -> u64 {
        self.draw_index
    }
}

/// RNG returning a fixed sequence of values, then `fallback` forever
///
/// Useful for tests that need a specific dodge/crit/exploration outcome.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: VecDeque<f64>,
    fallback: f64,
    draw_index: u64,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        ScriptedRng {
            values: values.into_iter().collect(),
            fallback: fallback.clamp(0.0, 0.999_999),
            draw_index: 0,
        }
    }

    /// An RNG that always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(std::iter::empty(), value)
    }
}

impl BattleRng for ScriptedRng {
    fn rand(&mut self, _tag: &str) -> f64 {
        self.draw_index += 1;
        self.values.pop_front().unwrap_or(self.fallback)
    }

    fn draw_index(&self) -> u64 {
        self.draw_index
    }
}
