//! Gradient strategies: turn a per-corner hash and a corner-relative offset
//! into a scalar contribution.
//!
//! Strategies are zero-sized types plugged in through generics, so the choice
//! is monomorphized away, leaving no dispatch in the per-sample path.

use glam::Vec4;

use crate::hash::SmallXxHash4;

/// Per-corner contribution of a lattice noise variant.
pub trait Gradient {
    /// 1D contribution from the offset along x.
    fn evaluate1(hash: SmallXxHash4, x: Vec4) -> Vec4;

    /// 2D contribution from the offsets along x and y.
    fn evaluate2(hash: SmallXxHash4, x: Vec4, y: Vec4) -> Vec4;

    /// 3D contribution from the offsets along x, y and z.
    fn evaluate3(hash: SmallXxHash4, x: Vec4, y: Vec4, z: Vec4) -> Vec4;
}

/// Value noise: the corner hash alone, remapped to [-1,1], ignoring the
/// offset entirely. Blocky and non-differentiable, but the cheapest strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct Value;

impl Gradient for Value {
    fn evaluate1(hash: SmallXxHash4, _x: Vec4) -> Vec4 {
        hash.floats01_a() * 2.0 - Vec4::ONE
    }

    fn evaluate2(hash: SmallXxHash4, _x: Vec4, _y: Vec4) -> Vec4 {
        hash.floats01_a() * 2.0 - Vec4::ONE
    }

    fn evaluate3(hash: SmallXxHash4, _x: Vec4, _y: Vec4, _z: Vec4) -> Vec4 {
        hash.floats01_a() * 2.0 - Vec4::ONE
    }
}

/// Perlin noise: dot product of the offset with a pseudo-random gradient
/// picked from the corner hash. Contributions taper to zero toward the far
/// cell boundary, which is what makes the blended result smooth.
#[derive(Debug, Default, Clone, Copy)]
pub struct Perlin;

impl Gradient for Perlin {
    fn evaluate1(hash: SmallXxHash4, x: Vec4) -> Vec4 {
        // Direction from one hash bit, magnitude in [1,2] from a hash byte.
        let bit = ((hash.finalize() >> 8u32) & glam::UVec4::ONE).as_vec4();
        let sign = Vec4::ONE - bit * 2.0;
        (Vec4::ONE + hash.floats01_a()) * sign * x
    }

    fn evaluate2(hash: SmallXxHash4, x: Vec4, y: Vec4) -> Vec4 {
        // Gradient distributed over the unit square's perimeter.
        let mut gx = hash.floats01_a() * 2.0 - Vec4::ONE;
        let gy = Vec4::splat(0.5) - gx.abs();
        gx = gx - (gx + Vec4::splat(0.5)).floor();
        (gx * x + gy * y) * (2.0 / 0.535_28)
    }

    fn evaluate3(hash: SmallXxHash4, x: Vec4, y: Vec4, z: Vec4) -> Vec4 {
        // Gradient distributed over the unit octahedron's surface.
        let mut gx = hash.floats01_a() * 2.0 - Vec4::ONE;
        let mut gy = hash.floats01_d() * 2.0 - Vec4::ONE;
        let gz = Vec4::ONE - gx.abs() - gy.abs();
        let offset = (-gz).max(Vec4::ZERO);
        gx = gx + Vec4::select(gx.cmplt(Vec4::ZERO), offset, -offset);
        gy = gy + Vec4::select(gy.cmplt(Vec4::ZERO), offset, -offset);
        (gx * x + gy * y + gz * z) * (1.0 / 0.562_90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::SmallXxHash;
    use glam::IVec4;

    fn corner_hash(seed: i32, cell: i32) -> SmallXxHash4 {
        SmallXxHash::seed(seed).broadcast().eat(IVec4::splat(cell))
    }

    #[test]
    fn test_value_ignores_coordinates() {
        let hash = corner_hash(3, 14);
        let a = Value::evaluate3(hash, Vec4::splat(0.1), Vec4::splat(0.7), Vec4::splat(-0.3));
        let b = Value::evaluate3(hash, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO);
        assert_eq!(a, b);
        assert_eq!(a, Value::evaluate1(hash, Vec4::ZERO));
    }

    #[test]
    fn test_value_output_in_range() {
        for seed in 0..100 {
            for cell in -5..5 {
                let out = Value::evaluate1(corner_hash(seed, cell), Vec4::ZERO);
                for lane in out.to_array() {
                    assert!((-1.0..=1.0).contains(&lane));
                }
            }
        }
    }

    #[test]
    fn test_perlin_vanishes_at_corner() {
        let hash = corner_hash(1, 2);
        assert_eq!(Perlin::evaluate1(hash, Vec4::ZERO), Vec4::ZERO);
        assert_eq!(Perlin::evaluate2(hash, Vec4::ZERO, Vec4::ZERO), Vec4::ZERO);
        assert_eq!(
            Perlin::evaluate3(hash, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO),
            Vec4::ZERO
        );
    }

    #[test]
    fn test_perlin_1d_is_odd_in_x() {
        let hash = corner_hash(5, -3);
        let positive = Perlin::evaluate1(hash, Vec4::splat(0.4));
        let negative = Perlin::evaluate1(hash, Vec4::splat(-0.4));
        for (p, n) in positive.to_array().iter().zip(negative.to_array()) {
            assert!((p + n).abs() < 1e-6);
        }
    }

    #[test]
    fn test_perlin_3d_gradient_bounded() {
        // Offsets within one cell keep contributions in a sane band even
        // before interpolation damps them.
        for seed in 0..50 {
            let out = Perlin::evaluate3(
                corner_hash(seed, seed),
                Vec4::splat(0.5),
                Vec4::splat(0.5),
                Vec4::splat(0.5),
            );
            for lane in out.to_array() {
                assert!(lane.abs() <= 3.0);
            }
        }
    }
}
