//! Lattice coordinate resolution.
//!
//! Maps a continuous coordinate (already domain-transformed) into integer
//! cell indices and sub-cell offsets, under a wrapping policy chosen at
//! configuration time. The span is ephemeral, recomputed per axis per
//! sample, never stored.

use glam::{IVec4, Vec4};

/// Per-axis lattice data for one 4-wide batch of samples.
#[derive(Debug, Clone, Copy)]
pub struct LatticeSpan4 {
    /// Lower cell index, per lane.
    pub p0: IVec4,
    /// Upper neighbor index, already validated by the wrapping policy.
    pub p1: IVec4,
    /// Fractional offset from the lower corner, in [0,1).
    pub g0: Vec4,
    /// Fractional offset from the upper corner (`g0 - 1`).
    pub g1: Vec4,
    /// Smoothed interpolation weight.
    pub t: Vec4,
}

/// Wrapping policy for lattice cell indices. Stateless; selected once per
/// evaluator type, never per call.
pub trait Lattice {
    /// Split a coordinate into cell indices, sub-cell offsets and a smoothed
    /// interpolation weight at the given frequency.
    fn span4(coordinates: Vec4, frequency: i32) -> LatticeSpan4;

    /// Apply the wrapping policy to one stepped neighbor index. Only offsets
    /// of -1, 0 and +1 cells are ever passed in. Idempotent.
    fn validate_single_step(points: IVec4, frequency: i32) -> IVec4;
}

/// Non-tiling lattice: indices pass through unmodified, so the hash input
/// grows with the sampled domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct Open;

/// Tiling lattice: indices wrap modulo `frequency`, so the field repeats
/// exactly every `frequency` cells along the axis.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tiling;

impl Lattice for Open {
    fn span4(coordinates: Vec4, frequency: i32) -> LatticeSpan4 {
        let mut span = raw_span(coordinates, frequency);
        span.p1 = span.p0 + IVec4::ONE;
        span
    }

    fn validate_single_step(points: IVec4, _frequency: i32) -> IVec4 {
        points
    }
}

impl Lattice for Tiling {
    fn span4(coordinates: Vec4, frequency: i32) -> LatticeSpan4 {
        let mut span = raw_span(coordinates, frequency);
        span.p0 = span.p0.rem_euclid(IVec4::splat(frequency));
        span.p1 = (span.p0 + IVec4::ONE).rem_euclid(IVec4::splat(frequency));
        span
    }

    fn validate_single_step(points: IVec4, frequency: i32) -> IVec4 {
        points.rem_euclid(IVec4::splat(frequency))
    }
}

fn raw_span(coordinates: Vec4, frequency: i32) -> LatticeSpan4 {
    let coordinates = coordinates * frequency as f32;
    let points = coordinates.floor();
    let g0 = coordinates - points;
    let p0 = points.as_ivec4();
    LatticeSpan4 {
        p0,
        p1: p0,
        g0,
        g1: g0 - Vec4::ONE,
        t: smooth(g0),
    }
}

// Quintic C2 fade. Monotonic on [0,1] with f(0)=0 and f(1)=1, so corner
// contributions meet seamlessly at cell boundaries.
fn smooth(t: Vec4) -> Vec4 {
    t * t * t * (t * (t * 6.0 - Vec4::splat(15.0)) + Vec4::splat(10.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_splits_cell_and_fraction() {
        let span = Open::span4(Vec4::new(0.25, 1.75, -0.25, 3.0), 2);
        assert_eq!(span.p0, IVec4::new(0, 3, -1, 6));
        assert_eq!(span.p1, IVec4::new(1, 4, 0, 7));
        let g0 = span.g0.to_array();
        let expected = [0.5, 0.5, 0.5, 0.0];
        for (value, want) in g0.iter().zip(expected) {
            assert!((value - want).abs() < 1e-6);
            assert!((0.0..1.0).contains(value));
        }
    }

    #[test]
    fn test_upper_offset_is_lower_minus_one() {
        let span = Open::span4(Vec4::splat(0.3), 5);
        for (g0, g1) in span.g0.to_array().iter().zip(span.g1.to_array()) {
            assert!((g0 - 1.0 - g1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_smoothing_endpoints_and_monotonicity() {
        assert_eq!(smooth(Vec4::ZERO), Vec4::ZERO);
        assert_eq!(smooth(Vec4::ONE), Vec4::ONE);
        let mut previous = 0.0;
        for step in 1..=100 {
            let current = smooth(Vec4::splat(step as f32 / 100.0)).x;
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_tiling_wraps_cell_indices() {
        // Cells 1.25 units of coordinate at frequency 4 => cell 5 wraps to 1.
        let span = Tiling::span4(Vec4::splat(1.25), 4);
        assert_eq!(span.p0, IVec4::splat(1));
        assert_eq!(span.p1, IVec4::splat(2));

        // Upper neighbor of the last cell wraps to zero.
        let span = Tiling::span4(Vec4::splat(0.75), 4);
        assert_eq!(span.p0, IVec4::splat(3));
        assert_eq!(span.p1, IVec4::splat(0));
    }

    #[test]
    fn test_tiling_validates_step_window() {
        assert_eq!(
            Tiling::validate_single_step(IVec4::splat(-1), 4),
            IVec4::splat(3)
        );
        assert_eq!(
            Tiling::validate_single_step(IVec4::splat(4), 4),
            IVec4::splat(0)
        );
        assert_eq!(
            Tiling::validate_single_step(IVec4::splat(2), 4),
            IVec4::splat(2)
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        for policy_input in [-1, 0, 3, 4] {
            let once = Tiling::validate_single_step(IVec4::splat(policy_input), 4);
            assert_eq!(Tiling::validate_single_step(once, 4), once);
        }
        let open = Open::validate_single_step(IVec4::splat(-7), 4);
        assert_eq!(open, IVec4::splat(-7));
    }
}
