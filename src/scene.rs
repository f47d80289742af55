//! The scene composer: an ordered collection of mesh instances, queried as
//! a single surface.

use crate::geometry::{HitRecord, Ray, Triangle, Vertex};
use crate::material::Material;
use crate::math::Mat4;
use crate::mesh::MeshInstance;

/// The material-carrying result of a stage-wide intersection query.
pub struct StageHit<'a> {
    pub hit: HitRecord,
    pub material: &'a Material,
}

#[derive(Default)]
pub struct Stage {
    instances: Vec<MeshInstance>,
}

impl Stage {
    pub fn new() -> Stage {
        Stage { instances: Vec::new() }
    }

    pub fn add(&mut self, vertices: Vec<Vertex>, triangles: &[Triangle], forward: Mat4, inverse: Mat4, material: Material) -> usize {
        self.instances.push(MeshInstance::new(vertices, triangles, forward, inverse, material));
        self.instances.len() - 1
    }

    pub fn activate(&mut self, id: usize) {
        self.instances[id].active = true;
    }

    pub fn deactivate(&mut self, id: usize) {
        self.instances[id].active = false;
    }

    /// Intersects every active instance and returns the nearest hit
    /// (nearest by the distance from the transformed origin in each
    /// instance's own local frame), with the hit point and normal
    /// transformed back into world space.
    pub fn intersect_stage(&self, origin: crate::math::Vec3, dir: crate::math::Vec3) -> Option<StageHit<'_>> {
        let mut best: Option<(HitRecord, f64, &MeshInstance)> = None;

        for instance in self.instances.iter().filter(|i| i.active) {
            let local_origin = instance.inverse.transform_point(origin);
            let local_dir = instance.inverse.transform_vector(dir).normalize();
            let local_ray = Ray::new(local_origin, local_dir);

            let hit = instance.bvh.intersect_model(&local_ray);
            if !hit.is_hit {
                continue;
            }

            let dist = (hit.point - local_origin).length();
            if best.as_ref().map_or(true, |(_, best_dist, _)| dist < *best_dist) {
                best = Some((hit, dist, instance));
            }
        }

        best.map(|(local_hit, _, instance)| {
            let world_point = instance.forward.transform_point(local_hit.point);
            let world_normal = instance.forward.transform_vector(local_hit.normal).normalize();
            StageHit {
                hit: HitRecord { point: world_point, normal: world_normal, ..local_hit },
                material: &instance.material,
            }
        })
    }
}
