//! Noise evaluators: composition of a lattice policy with a gradient
//! strategy, plus fractal (multi-octave) accumulation.
//!
//! An evaluator is a zero-sized generic type; picking `(policy, strategy)`
//! happens once when a field is configured and monomorphizes into straight
//! arithmetic, with no dispatch per sample.

use glam::Vec4;
use std::marker::PhantomData;

use crate::gradient::Gradient;
use crate::hash::{SmallXxHash, SmallXxHash4};
use crate::lattice::Lattice;
use crate::params::Settings;

/// A complete per-sample noise algorithm over one 4-wide batch.
///
/// `positions` are the x, y and z lanes of four already domain-transformed
/// positions. Finite inputs are a precondition; non-finite coordinates
/// propagate NaN instead of being special-cased.
pub trait Noise {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4;
}

/// Gradient noise over the x axis only.
pub struct Lattice1D<L, G>(PhantomData<fn() -> (L, G)>);

/// Gradient noise over the x/z ground plane.
pub struct Lattice2D<L, G>(PhantomData<fn() -> (L, G)>);

/// Gradient noise over all three axes.
pub struct Lattice3D<L, G>(PhantomData<fn() -> (L, G)>);

impl<L: Lattice, G: Gradient> Noise for Lattice1D<L, G> {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4 {
        let x = L::span4(positions[0], frequency);

        lerp(
            G::evaluate1(hash.eat(x.p0), x.g0),
            G::evaluate1(hash.eat(x.p1), x.g1),
            x.t,
        )
    }
}

impl<L: Lattice, G: Gradient> Noise for Lattice2D<L, G> {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4 {
        let x = L::span4(positions[0], frequency);
        let z = L::span4(positions[2], frequency);

        let h0 = hash.eat(x.p0);
        let h1 = hash.eat(x.p1);

        lerp(
            lerp(
                G::evaluate2(h0.eat(z.p0), x.g0, z.g0),
                G::evaluate2(h0.eat(z.p1), x.g0, z.g1),
                z.t,
            ),
            lerp(
                G::evaluate2(h1.eat(z.p0), x.g1, z.g0),
                G::evaluate2(h1.eat(z.p1), x.g1, z.g1),
                z.t,
            ),
            x.t,
        )
    }
}

impl<L: Lattice, G: Gradient> Noise for Lattice3D<L, G> {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4 {
        let x = L::span4(positions[0], frequency);
        let y = L::span4(positions[1], frequency);
        let z = L::span4(positions[2], frequency);

        let h0 = hash.eat(x.p0);
        let h1 = hash.eat(x.p1);
        let h00 = h0.eat(y.p0);
        let h01 = h0.eat(y.p1);
        let h10 = h1.eat(y.p0);
        let h11 = h1.eat(y.p1);

        lerp(
            lerp(
                lerp(
                    G::evaluate3(h00.eat(z.p0), x.g0, y.g0, z.g0),
                    G::evaluate3(h00.eat(z.p1), x.g0, y.g0, z.g1),
                    z.t,
                ),
                lerp(
                    G::evaluate3(h01.eat(z.p0), x.g0, y.g1, z.g0),
                    G::evaluate3(h01.eat(z.p1), x.g0, y.g1, z.g1),
                    z.t,
                ),
                y.t,
            ),
            lerp(
                lerp(
                    G::evaluate3(h10.eat(z.p0), x.g1, y.g0, z.g0),
                    G::evaluate3(h10.eat(z.p1), x.g1, y.g0, z.g1),
                    z.t,
                ),
                lerp(
                    G::evaluate3(h11.eat(z.p0), x.g1, y.g1, z.g0),
                    G::evaluate3(h11.eat(z.p1), x.g1, y.g1, z.g1),
                    z.t,
                ),
                y.t,
            ),
            x.t,
        )
    }
}

/// Evaluate `N` with fractal accumulation: `octaves` passes at doubling
/// frequency and halving amplitude, normalized by the amplitude sum so the
/// result stays in the strategy's nominal range for any octave count.
pub fn fractal4<N: Noise>(positions: [Vec4; 3], settings: &Settings) -> Vec4 {
    let hash = SmallXxHash::seed(settings.seed()).broadcast();
    let mut frequency = settings.frequency();
    let mut amplitude = 1.0_f32;
    let mut amplitude_sum = 0.0_f32;
    let mut sum = Vec4::ZERO;

    for octave in 0..settings.octaves() {
        sum += N::sample4(positions, hash.offset(octave as u32), frequency) * amplitude;
        amplitude_sum += amplitude;
        frequency *= 2;
        amplitude *= 0.5;
    }

    sum / amplitude_sum
}

// Per-lane linear interpolation; glam's lerp takes a scalar weight.
fn lerp(a: Vec4, b: Vec4, t: Vec4) -> Vec4 {
    a + (b - a) * t
}
