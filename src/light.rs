//! A single square area light in the XZ-plane, facing down (-Y).

use crate::math::Vec3;
use crate::rng::Rng;

#[derive(Clone, Debug)]
pub struct AreaLight {
    pub center: Vec3,
    pub half_size: f64,
    pub emission: Vec3,
}

/// Result of sampling next-event estimation against the light.
pub struct NeeSample {
    pub sampled_pos: Vec3,
    pub to_light_dir: Vec3,
    pub contribution: Vec3,
}

impl AreaLight {
    const NORMAL: Vec3 = Vec3 { x: 0.0, y: -1.0, z: 0.0 };

    /// Draws a uniform point on the patch and returns the NEE contribution.
    ///
    /// `omega` is taken as `normalize(center - hit_pos)` rather than
    /// `normalize(sampled_pos - hit_pos)` — an approximation carried over
    /// unchanged from the renderer this one is styled after.
    pub fn nee(&self, hit_pos: Vec3, hit_normal: Vec3, rng: &mut Rng) -> NeeSample {
        let dx = (rng.next_f64() * 2.0 - 1.0) * self.half_size;
        let dz = (rng.next_f64() * 2.0 - 1.0) * self.half_size;
        let sampled_pos = self.center + Vec3::new(dx, 0.0, dz);

        let omega = (self.center - hit_pos).normalize();
        let to_light = sampled_pos - hit_pos;
        let dist_sq = to_light.length_sq();

        let g = if dist_sq > 0.0 {
            (omega.dot(hit_normal)).abs() * (-omega.dot(Self::NORMAL)).abs() / dist_sq
        } else {
            0.0
        };

        NeeSample { sampled_pos, to_light_dir: to_light.normalize(), contribution: self.emission * g }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_lands_within_patch() {
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::ONE };
        let mut rng = Rng::new(123);
        for _ in 0..50 {
            let s = light.nee(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), &mut rng);
            assert!((s.sampled_pos.x - light.center.x).abs() <= light.half_size + 1e-12);
            assert!((s.sampled_pos.z - light.center.z).abs() <= light.half_size + 1e-12);
        }
    }

    #[test]
    fn contribution_is_nonnegative_under_a_light() {
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 0.5, emission: Vec3::splat(2.0) };
        let mut rng = Rng::new(7);
        let s = light.nee(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), &mut rng);
        assert!(s.contribution.x >= 0.0 && s.contribution.y >= 0.0 && s.contribution.z >= 0.0);
    }
}
