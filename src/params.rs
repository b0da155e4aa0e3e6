//! Noise configuration with documented ranges and validated construction.
//!
//! Invalid values are construction-time errors, never silently clamped;
//! clamping would quietly change a published noise field for anyone sharing
//! the seed.

use glam::{Affine3A, EulerRot, Quat, Vec3, Vec4};

/// Octave count bounds. One octave is the plain field; past six the
/// remaining amplitude is below visual relevance.
const OCTAVES_RANGE: std::ops::RangeInclusive<i32> = 1..=6;

/// Validated noise settings: seed, base frequency, octave count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    seed: i32,
    frequency: i32,
    octaves: i32,
}

impl Settings {
    /// Build settings, rejecting out-of-range values.
    ///
    /// `frequency` must be at least 1; `octaves` must lie in [1, 6].
    pub fn new(seed: i32, frequency: i32, octaves: i32) -> Result<Self, String> {
        if frequency < 1 {
            return Err(format!("frequency must be >= 1, got {}", frequency));
        }
        if !OCTAVES_RANGE.contains(&octaves) {
            return Err(format!(
                "octaves must be in [{}, {}], got {}",
                OCTAVES_RANGE.start(),
                OCTAVES_RANGE.end(),
                octaves
            ));
        }
        Ok(Self {
            seed,
            frequency,
            octaves,
        })
    }

    /// Hash seed.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Cells per unit of transformed-domain coordinate (and the tiling
    /// period, in cells, for the tiling lattice).
    pub fn frequency(&self) -> i32 {
        self.frequency
    }

    /// Fractal octave count.
    pub fn octaves(&self) -> i32 {
        self.octaves
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 4,
            octaves: 1,
        }
    }
}

/// Affine domain transform as translation / rotation / scale, applied to
/// every position before any lattice or hash step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Translation in world units.
    pub translation: Vec3,
    /// Euler rotation in degrees, applied Y then X then Z.
    pub rotation_deg: Vec3,
    /// Per-axis scale (cells shrink as scale grows).
    pub scale: Vec3,
}

impl Domain {
    /// Uniformly scaled transform with no rotation or translation.
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Self::default()
        }
    }

    /// Resolve to the 3x4 affine matrix used by the batch driver.
    pub fn matrix(&self) -> Affine3A {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.rotation_deg.y.to_radians(),
            self.rotation_deg.x.to_radians(),
            self.rotation_deg.z.to_radians(),
        );
        Affine3A::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }

    /// Reject non-finite components; a NaN or infinite transform would
    /// poison every sample downstream.
    pub fn validate(&self) -> Result<(), String> {
        if !self.translation.is_finite() || !self.rotation_deg.is_finite() || !self.scale.is_finite()
        {
            return Err(format!("domain transform must be finite, got {:?}", self));
        }
        Ok(())
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_deg: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Apply an affine transform to four positions held as x/y/z lanes.
pub(crate) fn transform_lanes(matrix: &Affine3A, lanes: [Vec4; 3]) -> [Vec4; 3] {
    let [x, y, z] = lanes;
    let m = matrix.matrix3;
    let t = matrix.translation;
    [
        x * m.x_axis.x + y * m.y_axis.x + z * m.z_axis.x + Vec4::splat(t.x),
        x * m.x_axis.y + y * m.y_axis.y + z * m.z_axis.y + Vec4::splat(t.y),
        x * m.x_axis.z + y * m.y_axis.z + z * m.z_axis.z + Vec4::splat(t.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_accept_valid_ranges() {
        let settings = Settings::new(-17, 1, 6).unwrap();
        assert_eq!(settings.seed(), -17);
        assert_eq!(settings.frequency(), 1);
        assert_eq!(settings.octaves(), 6);
    }

    #[test]
    fn test_settings_reject_zero_frequency() {
        assert!(Settings::new(0, 0, 1).is_err());
        assert!(Settings::new(0, -4, 1).is_err());
    }

    #[test]
    fn test_settings_reject_octaves_out_of_range() {
        assert!(Settings::new(0, 4, 0).is_err());
        assert!(Settings::new(0, 4, 7).is_err());
    }

    #[test]
    fn test_domain_rejects_non_finite() {
        let mut domain = Domain::default();
        assert!(domain.validate().is_ok());
        domain.translation.x = f32::NAN;
        assert!(domain.validate().is_err());

        let mut domain = Domain::default();
        domain.scale.z = f32::INFINITY;
        assert!(domain.validate().is_err());
    }

    #[test]
    fn test_identity_transform_passes_positions_through() {
        let matrix = Domain::default().matrix();
        let lanes = [
            Vec4::new(1.0, 2.0, 3.0, 4.0),
            Vec4::splat(-0.5),
            Vec4::splat(7.25),
        ];
        let out = transform_lanes(&matrix, lanes);
        for (a, b) in lanes.iter().zip(out) {
            for (lane_a, lane_b) in a.to_array().iter().zip(b.to_array()) {
                assert!((lane_a - lane_b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_transform_matches_scalar_affine() {
        let domain = Domain {
            translation: Vec3::new(1.0, -2.0, 0.5),
            rotation_deg: Vec3::new(10.0, 45.0, -30.0),
            scale: Vec3::new(2.0, 1.0, 0.25),
        };
        let matrix = domain.matrix();
        let position = Vec3::new(0.3, -1.7, 4.2);
        let lanes = transform_lanes(
            &matrix,
            [
                Vec4::splat(position.x),
                Vec4::splat(position.y),
                Vec4::splat(position.z),
            ],
        );
        let expected = matrix.transform_point3(position);
        assert!((lanes[0].x - expected.x).abs() < 1e-5);
        assert!((lanes[1].x - expected.y).abs() < 1e-5);
        assert!((lanes[2].x - expected.z).abs() < 1e-5);
    }
}
