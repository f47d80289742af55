use crate::geometry::Aabb;
use crate::math::{Vec2, Vec3, EPS};

/// A mesh vertex: position plus the shading attributes interpolated at a hit.
#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

/// Three vertex indices into the owning mesh's vertex table.
#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

/// Scalar triple product `det(a, b, c) = a . (b x c)`, computed by Sarrus'
/// rule as in the reference implementation.
fn determinant(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    a.x * b.y * c.z + a.y * b.z * c.x + a.z * b.x * c.y
        - a.z * b.y * c.x
        - a.y * b.x * c.z
        - a.x * b.z * c.y
}

/// Moeller-Trumbore ray-triangle intersection (spec.md §4.2).
///
/// Returns `(t, u, v)` on a hit, where `(u, v, 1-u-v)` are the barycentric
/// weights of `(p1, p2, p0)` respectively (`w = 1-u-v` is the weight on
/// `p0`). Misses when `|det| < EPS`, or when `t`, `u`, `v`, or `u+v` falls
/// outside the valid range.
pub fn intersect_triangle(origin: Vec3, dir: Vec3, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<(f64, f64, f64)> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let r = origin - p0;

    let det = determinant(dir, e2, e1);
    if det.abs() < EPS {
        return None;
    }

    let f = 1.0 / det;
    let t = f * determinant(r, e1, e2);
    let u = f * determinant(dir, e2, r);
    let v = f * determinant(r, e1, dir);

    if t < 0.0 || u < 0.0 || v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some((t, u, v))
}

pub fn triangle_aabb(p0: Vec3, p1: Vec3, p2: Vec3) -> Aabb {
    let min = Vec3::new(p0.x.min(p1.x).min(p2.x), p0.y.min(p1.y).min(p2.y), p0.z.min(p1.z).min(p2.z));
    let max = Vec3::new(p0.x.max(p1.x).max(p2.x), p0.y.max(p1.y).max(p2.y), p0.z.max(p1.z).max(p2.z));
    Aabb::new(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hit_barycentrics_sum_to_one() {
        let p0 = Vec3::new(-1.0, 0.0, -1.0);
        let p1 = Vec3::new(1.0, 0.0, -1.0);
        let p2 = Vec3::new(0.0, 0.0, 1.0);
        let centroid = (p0 + p1 + p2) / 3.0;

        let origin = centroid + Vec3::new(0.0, 2.0, 0.0);
        let dir = Vec3::new(0.0, -1.0, 0.0);

        let (t, u, v) = intersect_triangle(origin, dir, p0, p1, p2).expect("should hit");
        assert!(t > 0.0);
        let w = 1.0 - u - v;
        assert_relative_eq!(u + v + w, 1.0, epsilon = 1e-9);
        assert!(u >= 0.0 && v >= 0.0 && u + v <= 1.0);
    }

    #[test]
    fn parallel_ray_misses() {
        let p0 = Vec3::new(-1.0, 0.0, -1.0);
        let p1 = Vec3::new(1.0, 0.0, -1.0);
        let p2 = Vec3::new(0.0, 0.0, 1.0);
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let dir = Vec3::new(1.0, 0.0, 0.0);
        assert!(intersect_triangle(origin, dir, p0, p1, p2).is_none());
    }

    #[test]
    fn behind_origin_misses() {
        let p0 = Vec3::new(-1.0, 0.0, -1.0);
        let p1 = Vec3::new(1.0, 0.0, -1.0);
        let p2 = Vec3::new(0.0, 0.0, 1.0);
        let origin = Vec3::new(0.0, -2.0, 0.0);
        let dir = Vec3::new(0.0, -1.0, 0.0);
        assert!(intersect_triangle(origin, dir, p0, p1, p2).is_none());
    }
}
