//! Fractional delay line over a fixed ring buffer.
//!
//! The ring is allocated once and never resized. Writing advances a single
//! cursor; reading looks backwards from that cursor by a fractional number
//! of samples and blends the two neighbouring slots linearly.
//!
//! # Tap Layout
//!
//! For a delay of `d` samples the read position is `write_index - d`
//! (wrapped). With `k = floor(read_pos)` and `t = read_pos - k` the taps are
//! `y0 = k - 1` and `y1 = k`, and the result is `lerp(buf[y0], buf[y1], t)`.
//! At integer delays (`t = 0`) the read returns `buf[y0]` exactly, which is
//! the sample written `d + 1` steps ago.
//!
//! # Boundary Handling
//!
//! The lower tap wraps when it is `<= 0` and the upper tap when it is
//! `> capacity`. Both conditions can leave an index equal to `capacity`;
//! such an index is folded back to slot 0, which is the slot the wrap was
//! aiming for. The net effect is identical to a plain modulo wrap.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;
use libm::floor;

use crate::math::lerp;

/// Indices and weight used by one interpolated read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadTaps {
    /// Older neighbour.
    pub y0: usize,
    /// Newer neighbour.
    pub y1: usize,
    /// Weight of `y1`, in `[0, 1)`.
    pub t: f64,
}

/// Ring-buffer delay line with two-point linear interpolation.
///
/// # Memory
///
/// The buffer is heap-allocated during construction but never reallocates.
/// No allocations occur during audio processing.
///
/// # Example
///
/// ```rust
/// use anemone_core::FractionalDelayLine;
///
/// let mut line = FractionalDelayLine::new(16);
/// line.write(1.0);
/// line.write(0.0);
///
/// // Integer delay 0 lands on the sample written one step ago.
/// assert_eq!(line.read(0.0), 0.0);
/// assert_eq!(line.read(1.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FractionalDelayLine {
    /// Circular buffer storage
    buffer: Vec<f64>,
    /// Slot the next write lands in
    write_index: usize,
}

impl FractionalDelayLine {
    /// Creates a silent delay line holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is below 2.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "Delay capacity must be >= 2");

        Self {
            buffer: vec![0.0; capacity],
            write_index: 0,
        }
    }

    /// Resolves a fractional delay into the two taps and the blend weight.
    ///
    /// `delay_samples` must lie in `[0, capacity - 2]`; the caller clamps.
    #[inline]
    pub fn taps(&self, delay_samples: f64) -> ReadTaps {
        let capacity = self.buffer.len();
        let len = capacity as f64;

        let mut read_pos = self.write_index as f64 - delay_samples;
        if read_pos < 0.0 {
            read_pos += len;
        }
        debug_assert!(
            (0.0..=len).contains(&read_pos),
            "read position {read_pos} outside ring of {capacity}"
        );

        let whole = floor(read_pos);
        let t = read_pos - whole;
        let whole = whole as isize;
        let wrap = capacity as isize;

        let mut y0 = whole - 1;
        if y0 <= 0 {
            y0 += wrap;
        }

        let mut y1 = whole;
        if y1 > wrap {
            y1 -= wrap;
        }

        // y0 == 0 and read_pos == capacity both land exactly on `capacity`.
        let y0 = y0 as usize % capacity;
        let y1 = y1 as usize % capacity;
        debug_assert!(y0 < capacity && y1 < capacity);

        ReadTaps { y0, y1, t }
    }

    /// Reads the interpolated sample `delay_samples` behind the cursor.
    #[inline]
    pub fn read(&self, delay_samples: f64) -> f64 {
        let ReadTaps { y0, y1, t } = self.taps(delay_samples);
        lerp(self.buffer[y0], self.buffer[y1], t)
    }

    /// Stores `sample` at the cursor and advances it, wrapping at capacity.
    #[inline]
    pub fn write(&mut self, sample: f64) {
        self.buffer[self.write_index] = sample;
        self.write_index += 1;
        if self.write_index >= self.buffer.len() {
            self.write_index -= self.buffer.len();
        }
        debug_assert!(self.write_index < self.buffer.len());
    }

    /// Silences the whole ring. The cursor keeps its position.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    /// Slot the next write lands in.
    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Ring size in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Raw value stored at `index`, if it is inside the ring.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.buffer.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(capacity: usize, count: usize) -> FractionalDelayLine {
        let mut line = FractionalDelayLine::new(capacity);
        for i in 0..count {
            line.write(i as f64);
        }
        line
    }

    #[test]
    fn integer_delay_reads_exact_sample() {
        // Written 0..10, cursor at 10.
        let line = ramp(32, 10);
        // Delay 3 -> read_pos 7 -> y0 = 6, t = 0.
        assert_eq!(line.read(3.0), 6.0);
        assert_eq!(line.read(0.0), 9.0);
    }

    #[test]
    fn fractional_delay_interpolates() {
        let line = ramp(32, 10);
        // read_pos 6.75 -> y0 = 5, y1 = 6, t = 0.75
        let out = line.read(3.25);
        assert!((out - 5.75).abs() < 1e-12, "got {out}");
    }

    #[test]
    fn write_index_wraps() {
        let mut line = FractionalDelayLine::new(4);
        for _ in 0..9 {
            line.write(1.0);
        }
        assert_eq!(line.write_index(), 1);
    }

    #[test]
    fn read_across_wrap_boundary() {
        // Capacity 8, write 0..10: slots hold [8, 9, 2, 3, 4, 5, 6, 7], cursor 2.
        let line = ramp(8, 10);
        // Delay 2 -> read_pos 0 -> y0 = -1 -> 7.
        assert_eq!(line.read(2.0), 7.0);
        // Delay 2.5 -> read_pos 7.5 after wrap -> y0 = 6, y1 = 7.
        assert!((line.read(2.5) - 6.5).abs() < 1e-12);
    }

    #[test]
    fn lower_tap_at_zero_wraps_to_capacity_then_folds() {
        // Cursor at 3, delay 2 -> read_pos 1 -> y0 = 0 takes the `<= 0` wrap.
        let line = ramp(8, 3);
        let taps = line.taps(2.0);
        assert_eq!(taps.y0, 0);
        assert_eq!(taps.y1, 1);
        assert_eq!(taps.t, 0.0);
        assert_eq!(line.read(2.0), 0.0);
    }

    #[test]
    fn upper_tap_at_capacity_folds_to_zero() {
        // Cursor at 0 and a vanishing delay put read_pos on `capacity`.
        let line = FractionalDelayLine::new(8);
        let taps = line.taps(1e-300);
        assert_eq!(taps.y1, 0);
        assert_eq!(taps.y0, 7);
    }

    #[test]
    fn clear_keeps_cursor() {
        let mut line = ramp(8, 5);
        line.clear();
        assert_eq!(line.write_index(), 5);
        assert!((0..8).all(|i| line.get(i) == Some(0.0)));
    }

    #[test]
    #[should_panic]
    fn capacity_below_two_panics() {
        let _line = FractionalDelayLine::new(1);
    }
}
