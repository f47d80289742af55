//! The path-tracing integrator: estimates radiance along one primary ray.

use crate::light::AreaLight;
use crate::math::{local_to_world, orthonormal_basis, world_to_local, Vec3};
use crate::rng::Rng;
use crate::scene::Stage;
use crate::texture::TextureStore;

pub const MAX_REFLECT: u32 = 10;
pub const ROULETTE: f64 = 0.99;

/// White environment used when a ray escapes the scene entirely, acting as
/// an infinite white backdrop. Closed scenes may prefer black instead.
pub const BACKGROUND: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };

pub struct Integrator<'a> {
    pub stage: &'a Stage,
    pub textures: &'a TextureStore,
    pub light: &'a AreaLight,
}

impl<'a> Integrator<'a> {
    /// Traces one path starting at `(origin, dir)` and returns its radiance
    /// estimate. `dir` must already be normalized.
    pub fn trace(&self, origin: Vec3, dir: Vec3, rng: &mut Rng) -> Vec3 {
        let mut ray_origin = origin;
        let mut ray_dir = dir;
        let mut throughput = Vec3::ONE;
        let mut radiance = Vec3::ZERO;

        for _ in 0..MAX_REFLECT {
            let stage_hit = match self.stage.intersect_stage(ray_origin, ray_dir) {
                Some(h) => h,
                None => {
                    radiance += throughput * BACKGROUND;
                    break;
                }
            };

            let hit = stage_hit.hit;
            let material = stage_hit.material;

            let normal = hit.normal;
            let (s, t) = orthonormal_basis(normal);
            let wo_local = world_to_local(-ray_dir, s, normal, t);

            let (brdf, wi_local, pdf) = material.sample(wo_local, hit.texcoord, self.textures, rng);
            let cos = wi_local.y.abs();
            throughput *= brdf * cos / pdf;

            if material.is_nee() {
                let sample = self.light.nee(hit.point, normal, rng);
                // No epsilon offset on the shadow-ray origin; self-intersection
                // is left to the ray-triangle degenerate-determinant guard.
                let shadow = self.stage.intersect_stage(hit.point, sample.to_light_dir);
                let light_dist_sq = (sample.sampled_pos - hit.point).length_sq();
                let occluded = match &shadow {
                    Some(s) => (s.hit.point - hit.point).length_sq() < light_dist_sq,
                    None => false,
                };
                if !occluded {
                    radiance += throughput * sample.contribution;
                }
            }

            // No epsilon offset on the next ray's origin either, for the same reason.
            ray_origin = hit.point;
            ray_dir = local_to_world(wi_local, s, normal, t).normalize();

            if rng.next_f64() >= ROULETTE {
                break;
            }
            throughput /= ROULETTE;
        }

        radiance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Triangle, Vertex};
    use crate::material::Material;
    use crate::math::{Mat4, Vec2};

    fn floor_stage() -> Stage {
        let mut stage = Stage::new();
        let vertices = vec![
            Vertex { position: Vec3::new(-10.0, 0.0, -10.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::ZERO },
            Vertex { position: Vec3::new(10.0, 0.0, -10.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::ZERO },
            Vertex { position: Vec3::new(10.0, 0.0, 10.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::ZERO },
            Vertex { position: Vec3::new(-10.0, 0.0, 10.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::ZERO },
        ];
        let triangles = vec![Triangle { v0: 0, v1: 1, v2: 2 }, Triangle { v0: 0, v1: 2, v2: 3 }];
        stage.add(vertices, &triangles, Mat4::IDENTITY, Mat4::IDENTITY, Material::Diffuse { albedo: Vec3::splat(0.8), tex_id: -1 });
        stage
    }

    #[test]
    fn empty_scene_returns_background_only() {
        let stage = Stage::new();
        let textures = TextureStore::new();
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::splat(5.0) };
        let integrator = Integrator { stage: &stage, textures: &textures, light: &light };
        let mut rng = Rng::new(1);
        let radiance = integrator.trace(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), &mut rng);
        assert!((radiance.x - BACKGROUND.x).abs() < 1e-12);
    }

    #[test]
    fn diffuse_floor_under_light_yields_nonnegative_finite_radiance() {
        let stage = floor_stage();
        let textures = TextureStore::new();
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::splat(5.0) };
        let integrator = Integrator { stage: &stage, textures: &textures, light: &light };

        let mut accum = Vec3::ZERO;
        let samples = 64;
        for i in 0..samples {
            let mut r = Rng::new(99 + i);
            accum += integrator.trace(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0), &mut r);
        }
        let avg = accum / samples as f64;
        assert!(avg.x.is_finite() && avg.x >= 0.0);
    }

    #[test]
    fn path_terminates_within_max_reflect_bounces() {
        // A mirror-like setup would otherwise bounce forever without Russian
        // roulette; confirm trace() returns promptly regardless.
        let stage = floor_stage();
        let textures = TextureStore::new();
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::splat(5.0) };
        let integrator = Integrator { stage: &stage, textures: &textures, light: &light };
        let mut rng = Rng::new(5);
        let radiance = integrator.trace(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0), &mut rng);
        assert!(radiance.x.is_finite());
    }
}
