//! Voronoi (cellular) noise: distances to hashed, jittered seed points.
//!
//! Each sample walks the ring of neighboring cells, jitters one or two seed
//! points per cell from hash bits, and tracks the two smallest distances.
//! The published scalar is then a function of that pair.

use glam::Vec4;
use std::marker::PhantomData;

use crate::hash::SmallXxHash4;
use crate::lattice::Lattice;
use crate::noise::Noise;

// Distances are computed in normalized cell space, so nothing attainable
// reaches 2.0 before clamping.
const DISTANCE_SENTINEL: f32 = 2.0;

/// Running pair of smallest distances, per lane. `closest <= second` holds
/// after every update.
#[derive(Debug, Clone, Copy)]
pub struct Minima {
    pub closest: Vec4,
    pub second: Vec4,
}

impl Minima {
    /// Fresh pair seeded beyond any attainable distance.
    pub fn start() -> Self {
        Self {
            closest: Vec4::splat(DISTANCE_SENTINEL),
            second: Vec4::splat(DISTANCE_SENTINEL),
        }
    }

    /// Fold one batch of candidate distances into the pair, branchless per
    /// lane: a new closest demotes the old one to second place, a distance
    /// between the two replaces only the second.
    pub fn update(self, distances: Vec4) -> Self {
        let new_closest = distances.cmplt(self.closest);
        let second = Vec4::select(
            new_closest,
            self.closest,
            Vec4::select(distances.cmplt(self.second), distances, self.second),
        );
        let closest = Vec4::select(new_closest, distances, self.closest);
        Self { closest, second }
    }

    /// Cap both distances at 1.0. Anything further is not meaningfully
    /// closer than the next ring of cells and would bias the result.
    pub fn clamp(self) -> Self {
        Self {
            closest: self.closest.min(Vec4::ONE),
            second: self.second.min(Vec4::ONE),
        }
    }
}

/// Final projection from the distance pair to the published scalar.
pub trait VoronoiFunction {
    fn evaluate(minima: Minima) -> Vec4;
}

/// Distance to the nearest seed point. Cell-like blobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct F1;

/// Distance to the second-nearest seed point.
#[derive(Debug, Default, Clone, Copy)]
pub struct F2;

/// Second distance minus first: near zero along cell boundaries, giving
/// crack and vein patterns. Never negative.
#[derive(Debug, Default, Clone, Copy)]
pub struct F2MinusF1;

impl VoronoiFunction for F1 {
    fn evaluate(minima: Minima) -> Vec4 {
        minima.closest
    }
}

impl VoronoiFunction for F2 {
    fn evaluate(minima: Minima) -> Vec4 {
        minima.second
    }
}

impl VoronoiFunction for F2MinusF1 {
    fn evaluate(minima: Minima) -> Vec4 {
        minima.second - minima.closest
    }
}

/// 1D Voronoi over the x axis: one jittered point per cell in a 3-cell
/// window.
pub struct Voronoi1D<L, F>(PhantomData<fn() -> (L, F)>);

/// 2D Voronoi over the x/z ground plane: two jittered points per cell in a
/// 3x3 window.
pub struct Voronoi2D<L, F>(PhantomData<fn() -> (L, F)>);

/// 3D Voronoi: two jittered points per cell in a 3x3x3 window. Two points
/// per cell keeps the clamped field from developing flat regions.
pub struct Voronoi3D<L, F>(PhantomData<fn() -> (L, F)>);

impl<L: Lattice, F: VoronoiFunction> Noise for Voronoi1D<L, F> {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4 {
        let x = L::span4(positions[0], frequency);

        let mut minima = Minima::start();
        for u in -1..=1 {
            let h = hash.eat(L::validate_single_step(x.p0 + glam::IVec4::splat(u), frequency));
            minima = minima.update((h.floats01_a() + Vec4::splat(u as f32) - x.g0).abs());
        }

        F::evaluate(minima.clamp())
    }
}

impl<L: Lattice, F: VoronoiFunction> Noise for Voronoi2D<L, F> {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4 {
        let x = L::span4(positions[0], frequency);
        let z = L::span4(positions[2], frequency);

        let mut minima = Minima::start();
        for u in -1..=1 {
            let hx = hash.eat(L::validate_single_step(x.p0 + glam::IVec4::splat(u), frequency));
            let x_offset = Vec4::splat(u as f32) - x.g0;
            for v in -1..=1 {
                let h = hx.eat(L::validate_single_step(z.p0 + glam::IVec4::splat(v), frequency));
                let z_offset = Vec4::splat(v as f32) - z.g0;
                minima = minima.update(distance2(
                    h.floats01_a() + x_offset,
                    h.floats01_b() + z_offset,
                ));
                minima = minima.update(distance2(
                    h.floats01_c() + x_offset,
                    h.floats01_d() + z_offset,
                ));
            }
        }

        F::evaluate(minima.clamp())
    }
}

impl<L: Lattice, F: VoronoiFunction> Noise for Voronoi3D<L, F> {
    fn sample4(positions: [Vec4; 3], hash: SmallXxHash4, frequency: i32) -> Vec4 {
        let x = L::span4(positions[0], frequency);
        let y = L::span4(positions[1], frequency);
        let z = L::span4(positions[2], frequency);

        let mut minima = Minima::start();
        for u in -1..=1 {
            let hx = hash.eat(L::validate_single_step(x.p0 + glam::IVec4::splat(u), frequency));
            let x_offset = Vec4::splat(u as f32) - x.g0;
            for v in -1..=1 {
                let hy = hx.eat(L::validate_single_step(y.p0 + glam::IVec4::splat(v), frequency));
                let y_offset = Vec4::splat(v as f32) - y.g0;
                for w in -1..=1 {
                    let h =
                        hy.eat(L::validate_single_step(z.p0 + glam::IVec4::splat(w), frequency));
                    let z_offset = Vec4::splat(w as f32) - z.g0;
                    minima = minima.update(distance3(
                        h.bits_as_floats01(5, 0) + x_offset,
                        h.bits_as_floats01(5, 5) + y_offset,
                        h.bits_as_floats01(5, 10) + z_offset,
                    ));
                    minima = minima.update(distance3(
                        h.bits_as_floats01(5, 15) + x_offset,
                        h.bits_as_floats01(5, 20) + y_offset,
                        h.bits_as_floats01(5, 25) + z_offset,
                    ));
                }
            }
        }

        F::evaluate(minima.clamp())
    }
}

fn distance2(x: Vec4, y: Vec4) -> Vec4 {
    (x * x + y * y).powf(0.5)
}

fn distance3(x: Vec4, y: Vec4, z: Vec4) -> Vec4 {
    (x * x + y * y + z * z).powf(0.5)
}
