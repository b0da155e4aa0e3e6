//! Bit-mixing hash accumulators, scalar and 4-lane.
//!
//! The hash is the single source of randomness for every noise variant:
//! lattice cell coordinates are fed into an accumulator one axis at a time,
//! and the finalized bits drive gradients and Voronoi jitter. Determinism is
//! the whole point: the same seed and the same eat sequence always produce
//! the same bits, on any thread, at any lane width.

use glam::{IVec4, UVec4, Vec4};

// Shared mixing constants. These are baked into every published noise field:
// changing any of them changes every field generated from an existing seed.
const PRIME_A: u32 = 0b1001_1110_0011_0111_0111_1001_1011_0001;
const PRIME_B: u32 = 0b1000_0101_1110_1011_1100_1010_0111_0111;
const PRIME_C: u32 = 0b1100_0010_1011_0010_1010_1110_0011_1101;
const PRIME_D: u32 = 0b0010_0111_1101_0100_1110_1011_0010_1111;
const PRIME_E: u32 = 0b0001_0110_0101_0110_0110_0111_1011_0001;

/// Scalar mixing accumulator over a single `u32` state.
///
/// Immutable value type: `eat` returns a new accumulator, and `finalize` is a
/// read-only projection, so an accumulator can be finalized and then keep
/// eating more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmallXxHash {
    accumulator: u32,
}

impl SmallXxHash {
    /// Start a hash chain from an integer seed.
    pub fn seed(seed: i32) -> Self {
        Self {
            accumulator: (seed as u32).wrapping_add(PRIME_E),
        }
    }

    /// Fold one more integer into the state.
    ///
    /// Not commutative: `eat(a).eat(b)` differs from `eat(b).eat(a)`. Noise
    /// evaluators rely on this and always eat axes in x, y, z order.
    pub fn eat(self, data: i32) -> Self {
        Self {
            accumulator: (self
                .accumulator
                .wrapping_add((data as u32).wrapping_mul(PRIME_C)))
            .rotate_left(17)
            .wrapping_mul(PRIME_D),
        }
    }

    /// Fold one byte into the state. Uses different constants and a
    /// different rotation than [`eat`](Self::eat), so the two are not
    /// interchangeable even for small values.
    pub fn eat_byte(self, data: u8) -> Self {
        Self {
            accumulator: (self
                .accumulator
                .wrapping_add((data as u32).wrapping_mul(PRIME_E)))
            .rotate_left(11)
            .wrapping_mul(PRIME_A),
        }
    }

    /// Derive the externally visible hash via the avalanche rounds.
    ///
    /// Does not consume the chain: the accumulator itself is untouched.
    pub fn finalize(self) -> u32 {
        let mut avalanche = self.accumulator;
        avalanche ^= avalanche >> 15;
        avalanche = avalanche.wrapping_mul(PRIME_B);
        avalanche ^= avalanche >> 13;
        avalanche = avalanche.wrapping_mul(PRIME_C);
        avalanche ^= avalanche >> 16;
        avalanche
    }

    /// Widen into a 4-lane accumulator with this state in every lane.
    pub fn broadcast(self) -> SmallXxHash4 {
        SmallXxHash4 {
            accumulator: UVec4::splat(self.accumulator),
        }
    }
}

/// 4-lane mixing accumulator: the scalar algorithm applied element-wise to
/// four independent hash streams in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmallXxHash4 {
    accumulator: UVec4,
}

impl SmallXxHash4 {
    /// Start four hash chains from per-lane integer seeds.
    pub fn seed(seed: IVec4) -> Self {
        Self {
            accumulator: seed.as_uvec4().wrapping_add(UVec4::splat(PRIME_E)),
        }
    }

    /// Fold one integer per lane into the state. Same mixing step and same
    /// ordering contract as the scalar [`SmallXxHash::eat`].
    pub fn eat(self, data: IVec4) -> Self {
        Self {
            accumulator: rotate_left(
                self.accumulator
                    .wrapping_add(data.as_uvec4().wrapping_mul(UVec4::splat(PRIME_C))),
                17,
            )
            .wrapping_mul(UVec4::splat(PRIME_D)),
        }
    }

    /// Shift every lane's state by a constant. Used to decorrelate octaves
    /// of a fractal sum without restarting the chain from the seed.
    pub fn offset(self, value: u32) -> Self {
        Self {
            accumulator: self.accumulator.wrapping_add(UVec4::splat(value)),
        }
    }

    /// Per-lane avalanche projection; see [`SmallXxHash::finalize`].
    pub fn finalize(self) -> UVec4 {
        let mut avalanche = self.accumulator;
        avalanche = avalanche ^ (avalanche >> 15);
        avalanche = avalanche.wrapping_mul(UVec4::splat(PRIME_B));
        avalanche = avalanche ^ (avalanche >> 13);
        avalanche = avalanche.wrapping_mul(UVec4::splat(PRIME_C));
        avalanche = avalanche ^ (avalanche >> 16);
        avalanche
    }

    /// Lowest byte of the finalized hash, per lane.
    pub fn bytes_a(self) -> UVec4 {
        self.finalize() & UVec4::splat(255)
    }

    /// Second byte of the finalized hash, per lane.
    pub fn bytes_b(self) -> UVec4 {
        (self.finalize() >> 8) & UVec4::splat(255)
    }

    /// Third byte of the finalized hash, per lane.
    pub fn bytes_c(self) -> UVec4 {
        (self.finalize() >> 16) & UVec4::splat(255)
    }

    /// Highest byte of the finalized hash, per lane.
    pub fn bytes_d(self) -> UVec4 {
        self.finalize() >> 24
    }

    /// Lowest byte remapped to [0,1].
    pub fn floats01_a(self) -> Vec4 {
        self.bytes_a().as_vec4() * (1.0 / 255.0)
    }

    /// Second byte remapped to [0,1].
    pub fn floats01_b(self) -> Vec4 {
        self.bytes_b().as_vec4() * (1.0 / 255.0)
    }

    /// Third byte remapped to [0,1].
    pub fn floats01_c(self) -> Vec4 {
        self.bytes_c().as_vec4() * (1.0 / 255.0)
    }

    /// Highest byte remapped to [0,1].
    pub fn floats01_d(self) -> Vec4 {
        self.bytes_d().as_vec4() * (1.0 / 255.0)
    }

    /// A `count`-bit window of the finalized hash starting at `shift`.
    pub fn bits(self, count: u32, shift: u32) -> UVec4 {
        (self.finalize() >> shift) & UVec4::splat((1u32 << count) - 1)
    }

    /// A bit window remapped to [0,1] by dividing by its maximum value.
    pub fn bits_as_floats01(self, count: u32, shift: u32) -> Vec4 {
        self.bits(count, shift).as_vec4() * (1.0 / ((1u32 << count) - 1) as f32)
    }
}

fn rotate_left(data: UVec4, steps: u32) -> UVec4 {
    (data << steps) | (data >> (32 - steps))
}
