use crate::math::{Vec2, Vec3};

/// A half-line in 3-dimensional space. `dir` is expected to be unit length
/// at every entry point into traversal.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Ray {
        Ray { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// The result of intersecting a ray with the mesh-local BVH.
///
/// `triangle_index` is the index of the BVH node that produced the hit (not
/// a triangle-table index) per the traversal contract in spec.md §4.3.3.
#[derive(Copy, Clone, Debug)]
pub struct HitRecord {
    pub is_hit: bool,
    pub point: Vec3,
    pub triangle_index: i32,
    pub normal: Vec3,
    pub u: f64,
    pub v: f64,
    pub texcoord: Vec2,
}

impl HitRecord {
    pub const NO_HIT: HitRecord = HitRecord {
        is_hit: false,
        point: Vec3::ZERO,
        triangle_index: -1,
        normal: Vec3::ZERO,
        u: -1.0,
        v: -1.0,
        texcoord: Vec2::ZERO,
    };
}
