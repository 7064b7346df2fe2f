//! Input level tracking for feedback modulation.
//!
//! [`EnvelopeFollower`] rectifies the dry input and smooths it with separate
//! rise and fall rates. The resulting block is the `envelope` argument of
//! [`DelayEngine::process`](crate::DelayEngine::process): each level is scaled
//! by `feedback_envelope_amount` and added to the feedback target, so loud
//! passages swell (or, with a negative amount, thin out) the repeats.
//!
//! The defaults are tuned for that job. A 10 ms rise lets the feedback bloom
//! on note onsets without chasing individual cycles. A 150 ms fall keeps the
//! tail of a note from collapsing the feedback between syllables. The fine
//! feedback smoother adds its own lag of about 11 ms at 44.1 kHz on top,
//! which rounds off whatever ripple remains.

use libm::exp;

/// Shortest accepted rise time in milliseconds.
const MIN_ATTACK_MS: f32 = 0.1;
/// Shortest accepted fall time in milliseconds.
const MIN_RELEASE_MS: f32 = 1.0;

/// One-pole coefficient that covers `1 - 1/e` of a step in `time_ms`.
fn smoothing_coeff(time_ms: f32, sample_rate: f64) -> f32 {
    let samples = f64::from(time_ms) * sample_rate / 1000.0;
    if samples <= 0.0 {
        return 0.0;
    }
    exp(-1.0 / samples) as f32
}

/// Peak-rectifying level follower with independent rise and fall times.
///
/// # Example
///
/// ```rust
/// use anemone_core::EnvelopeFollower;
///
/// let mut follower = EnvelopeFollower::with_times(48000.0, 5.0, 80.0);
/// let input = [0.5f32; 64];
/// let mut levels = [0.0f32; 64];
/// follower.process_block(&input, &mut levels);
/// assert!(levels[63] > levels[0]);
/// assert!(levels[63] < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    level: f32,
    rise: f32,
    fall: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f64,
}

impl EnvelopeFollower {
    /// Rise time used by [`new`](Self::new), in milliseconds.
    pub const DEFAULT_ATTACK_MS: f32 = 10.0;
    /// Fall time used by [`new`](Self::new), in milliseconds.
    pub const DEFAULT_RELEASE_MS: f32 = 150.0;

    /// Follower with the default feedback-modulation tuning.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_times(sample_rate, Self::DEFAULT_ATTACK_MS, Self::DEFAULT_RELEASE_MS)
    }

    /// Follower with explicit rise and fall times.
    ///
    /// Times below 0.1 ms (rise) and 1 ms (fall) are raised to those limits.
    pub fn with_times(sample_rate: f64, attack_ms: f32, release_ms: f32) -> Self {
        let attack_ms = attack_ms.max(MIN_ATTACK_MS);
        let release_ms = release_ms.max(MIN_RELEASE_MS);
        Self {
            level: 0.0,
            rise: smoothing_coeff(attack_ms, sample_rate),
            fall: smoothing_coeff(release_ms, sample_rate),
            attack_ms,
            release_ms,
            sample_rate,
        }
    }

    /// Changes the rise time.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(MIN_ATTACK_MS);
        self.rise = smoothing_coeff(self.attack_ms, self.sample_rate);
    }

    /// Rise time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Changes the fall time.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(MIN_RELEASE_MS);
        self.fall = smoothing_coeff(self.release_ms, self.sample_rate);
    }

    /// Fall time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Recomputes both coefficients for a new rate. The level is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.rise = smoothing_coeff(self.attack_ms, sample_rate);
        self.fall = smoothing_coeff(self.release_ms, sample_rate);
    }

    /// Feeds one sample and returns the updated level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let target = input.abs();
        let coeff = if target > self.level { self.rise } else { self.fall };
        self.level = target + coeff * (self.level - target);
        self.level
    }

    /// Writes the level after each input sample into `levels`.
    ///
    /// # Panics
    ///
    /// Panics if `input` is shorter than `levels`.
    pub fn process_block(&mut self, input: &[f32], levels: &mut [f32]) {
        let input = &input[..levels.len()];
        for (level, &sample) in levels.iter_mut().zip(input) {
            *level = self.process(sample);
        }
    }

    /// Level after the last processed sample.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drops the level back to silence.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rise_covers_one_time_constant_in_attack_time() {
        // 10 ms at 48 kHz is 480 samples.
        let mut follower = EnvelopeFollower::new(48000.0);
        for _ in 0..480 {
            follower.process(1.0);
        }
        let expected = 1.0 - (-1.0f32).exp();
        assert!((follower.level() - expected).abs() < 0.01, "level {}", follower.level());
    }

    #[test]
    fn fall_is_slower_than_rise() {
        let mut follower = EnvelopeFollower::with_times(48000.0, 1.0, 10.0);
        for _ in 0..500 {
            follower.process(1.0);
        }
        assert!(follower.level() > 0.99);

        for _ in 0..960 {
            follower.process(0.0);
        }
        // Two fall time constants: e^-2 ≈ 0.135.
        let level = follower.level();
        assert!(level > 0.12 && level < 0.15, "level {level}");
    }

    #[test]
    fn negative_input_is_rectified() {
        let mut positive = EnvelopeFollower::new(44100.0);
        let mut negative = EnvelopeFollower::new(44100.0);
        assert_eq!(positive.process(0.5), negative.process(-0.5));
        assert!(negative.level() > 0.0);
    }

    #[test]
    fn block_matches_per_sample() {
        let input: Vec<f32> = (0..128).map(|i| ((i as f32) * 0.3).sin()).collect();
        let mut block = EnvelopeFollower::new(44100.0);
        let mut single = EnvelopeFollower::new(44100.0);

        let mut levels = vec![0.0; 128];
        block.process_block(&input, &mut levels);
        for (i, &sample) in input.iter().enumerate() {
            assert_eq!(levels[i], single.process(sample));
        }
    }

    #[test]
    fn times_have_lower_limits() {
        let follower = EnvelopeFollower::with_times(48000.0, 0.0, -3.0);
        assert_eq!(follower.attack_ms(), MIN_ATTACK_MS);
        assert_eq!(follower.release_ms(), MIN_RELEASE_MS);
    }

    #[test]
    fn sample_rate_change_keeps_level() {
        let mut follower = EnvelopeFollower::new(44100.0);
        for _ in 0..200 {
            follower.process(0.8);
        }
        let before = follower.level();
        follower.set_sample_rate(96000.0);
        assert_eq!(follower.level(), before);

        // Same rise time at twice the rate needs roughly twice the samples.
        let mut slow = EnvelopeFollower::new(96000.0);
        let mut fast = EnvelopeFollower::new(48000.0);
        for _ in 0..480 {
            fast.process(1.0);
        }
        for _ in 0..960 {
            slow.process(1.0);
        }
        assert!((slow.level() - fast.level()).abs() < 0.01);
    }

    #[test]
    fn reset_zeroes_level() {
        let mut follower = EnvelopeFollower::new(48000.0);
        for _ in 0..100 {
            follower.process(1.0);
        }
        follower.reset();
        assert_eq!(follower.level(), 0.0);
    }
}
