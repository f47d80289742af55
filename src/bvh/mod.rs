//! Binary BVH builder and traverser over a per-mesh triangle set.
//!
//! The builder is a plain median-split top-down recursion (no binned SAH):
//! it exists to give cheap, deterministic partitioning, not an optimal tree.

use crate::geometry::{intersect_triangle, triangle_aabb, Aabb, HitRecord, Ray, Triangle, Vertex};
use crate::math::Vec2;

/// A flat node array; node 0 is always the root.
#[derive(Clone, Debug)]
pub enum BvhNode {
    Inner { aabb: Aabb, left: usize, right: usize },
    Leaf { aabb: Aabb, triangle: [u32; 3] },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Inner { aabb, .. } => aabb,
            BvhNode::Leaf { aabb, .. } => aabb,
        }
    }
}

/// A built BVH plus the vertex table its leaves index into.
#[derive(Clone, Debug)]
pub struct Bvh {
    vertices: Vec<Vertex>,
    nodes: Vec<BvhNode>,
}

struct BuildTriangle {
    indices: [u32; 3],
    centroid: crate::math::Vec3,
    aabb: Aabb,
}

impl Bvh {
    /// Builds a BVH over `triangles`, indexing into `vertices`. Asserts if
    /// `triangles` is non-empty but every axis produces an infinite-surface-area
    /// split (all triangle centroids coincide).
    pub fn build(vertices: Vec<Vertex>, triangles: &[Triangle]) -> Bvh {
        let build_triangles: Vec<BuildTriangle> = triangles
            .iter()
            .map(|t| {
                let indices = [t.v0, t.v1, t.v2];
                let p0 = vertices[t.v0 as usize].position;
                let p1 = vertices[t.v1 as usize].position;
                let p2 = vertices[t.v2 as usize].position;
                let aabb = triangle_aabb(p0, p1, p2);
                BuildTriangle { indices, centroid: (p0 + p1 + p2) / 3.0, aabb }
            })
            .collect();

        let mut nodes = Vec::new();
        if !build_triangles.is_empty() {
            nodes.push(placeholder());
            build_internal(&mut nodes, build_triangles, 0);
        }

        Bvh { vertices, nodes }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_aabb(&self) -> Option<&Aabb> {
        self.nodes.first().map(|n| n.aabb())
    }

    /// Nearest-hit traversal in the mesh's local frame. `ray.dir` is expected
    /// to already be normalized.
    pub fn intersect_model(&self, ray: &Ray) -> HitRecord {
        if self.nodes.is_empty() {
            return HitRecord::NO_HIT;
        }
        if self.nodes[0].aabb().hit(ray).is_none() {
            return HitRecord::NO_HIT;
        }
        self.intersect_internal(ray, 0)
    }

    fn intersect_internal(&self, ray: &Ray, index: usize) -> HitRecord {
        match &self.nodes[index] {
            BvhNode::Leaf { triangle, .. } => {
                let v0 = self.vertices[triangle[0] as usize];
                let v1 = self.vertices[triangle[1] as usize];
                let v2 = self.vertices[triangle[2] as usize];
                match intersect_triangle(ray.origin, ray.dir, v0.position, v1.position, v2.position) {
                    None => HitRecord::NO_HIT,
                    Some((t, u, v)) => {
                        let w = 1.0 - u - v;
                        let point = ray.at(t);

                        // Quadratic reweighting for the shading normal, linear for texcoords.
                        let z = crate::math::Vec3::new(w * w, u * u, v * v);
                        let z_sum = z.x + z.y + z.z;
                        let zn = if z_sum > 0.0 { z / z_sum } else { crate::math::Vec3::new(1.0, 0.0, 0.0) };
                        let normal = (v0.normal * zn.x + v1.normal * zn.y + v2.normal * zn.z).normalize();

                        let texcoord = v0.texcoord * w + v1.texcoord * u + v2.texcoord * v;

                        HitRecord { is_hit: true, point, triangle_index: index as i32, normal, u, v, texcoord }
                    }
                }
            }
            BvhNode::Inner { left, right, .. } => {
                let (left, right) = (*left, *right);
                let hit_left = self.nodes[left].aabb().hit(ray).is_some();
                let hit_right = self.nodes[right].aabb().hit(ray).is_some();

                if !hit_left && !hit_right {
                    return HitRecord::NO_HIT;
                }
                if !hit_left {
                    return self.intersect_internal(ray, right);
                }
                if !hit_right {
                    return self.intersect_internal(ray, left);
                }

                let hit_a = self.intersect_internal(ray, left);
                let hit_b = self.intersect_internal(ray, right);

                match (hit_a.is_hit, hit_b.is_hit) {
                    (false, false) => HitRecord::NO_HIT,
                    (true, false) => hit_a,
                    (false, true) => hit_b,
                    (true, true) => {
                        let da = (hit_a.point - ray.origin).length_sq();
                        let db = (hit_b.point - ray.origin).length_sq();
                        if da <= db {
                            hit_a
                        } else {
                            hit_b
                        }
                    }
                }
            }
        }
    }
}

fn placeholder() -> BvhNode {
    BvhNode::Leaf { aabb: Aabb::EMPTY, triangle: [0, 0, 0] }
}

fn aabb_of(tris: &[BuildTriangle]) -> Aabb {
    tris.iter().skip(1).fold(tris[0].aabb, |acc, t| acc.join(&t.aabb))
}

/// One candidate split: partition by centroid-median along an axis.
struct Split {
    left: Vec<usize>,
    right: Vec<usize>,
    balance: usize,
    surface_area: f64,
}

fn candidate_split(tris: &[BuildTriangle], coord: impl Fn(&BuildTriangle) -> f64) -> Split {
    let mut coords: Vec<f64> = tris.iter().map(&coord).collect();
    coords.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = coords.len();
    let median = if n % 2 == 0 { (coords[n / 2] + coords[n / 2 - 1]) / 2.0 } else { coords[n / 2] };

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (i, t) in tris.iter().enumerate() {
        if coord(t) < median {
            left.push(i);
        } else {
            right.push(i);
        }
    }

    let surface_area = if left.is_empty() || right.is_empty() {
        f64::INFINITY
    } else {
        let left_aabb = left.iter().map(|&i| tris[i].aabb).reduce(|a, b| a.join(&b)).unwrap();
        let right_aabb = right.iter().map(|&i| tris[i].aabb).reduce(|a, b| a.join(&b)).unwrap();
        left_aabb.surface_area() + right_aabb.surface_area()
    };

    let balance = (left.len() as i64 - right.len() as i64).unsigned_abs() as usize;
    Split { left, right, balance, surface_area }
}

fn build_internal(nodes: &mut Vec<BvhNode>, tris: Vec<BuildTriangle>, index: usize) {
    let v = tris.len();
    if v == 0 {
        return;
    }
    if v == 1 {
        nodes[index] = BvhNode::Leaf { aabb: tris[0].aabb, triangle: tris[0].indices };
        return;
    }

    let split_x = candidate_split(&tris, |t| t.centroid.x);
    let split_y = candidate_split(&tris, |t| t.centroid.y);
    let split_z = candidate_split(&tris, |t| t.centroid.z);

    if !split_x.surface_area.is_finite() && !split_y.surface_area.is_finite() && !split_z.surface_area.is_finite() {
        log::warn!(
            "BVH build: node {index} has {v} triangles with no separable axis (all centroids coincide)"
        );
    }
    assert!(
        split_x.surface_area.is_finite() || split_y.surface_area.is_finite() || split_z.surface_area.is_finite(),
        "BVH build: all triangle centroids coincide along every axis, no split is separable"
    );

    let candidates = [(split_x, 0usize), (split_y, 1usize), (split_z, 2usize)];
    let (winner, _axis) = candidates
        .into_iter()
        .min_by(|(a, _), (b, _)| {
            (a.balance, OrderedF64(a.surface_area)).cmp(&(b.balance, OrderedF64(b.surface_area)))
        })
        .unwrap();

    let aabb = aabb_of(&tris);
    let n = nodes.len();
    nodes.push(placeholder());
    nodes.push(placeholder());
    nodes[index] = BvhNode::Inner { aabb, left: n, right: n + 1 };

    let mut left_tris = Vec::with_capacity(winner.left.len());
    let mut right_tris = Vec::with_capacity(winner.right.len());
    let mut tris = tris.into_iter().map(Some).collect::<Vec<_>>();
    for &i in &winner.left {
        left_tris.push(tris[i].take().unwrap());
    }
    for &i in &winner.right {
        right_tris.push(tris[i].take().unwrap());
    }

    build_internal(nodes, left_tris, n);
    build_internal(nodes, right_tris, n + 1);
}

/// A thin total-order wrapper so `f64` can sort lexicographically alongside
/// an integer key; NaN never occurs here since surface areas are either
/// finite sums of squares or `+INFINITY`.
#[derive(PartialEq)]
struct OrderedF64(f64);

impl Eq for OrderedF64 {}
impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn vtx(p: Vec3) -> Vertex {
        Vertex { position: p, normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::ZERO }
    }

    fn two_triangle_mesh() -> (Vec<Vertex>, Vec<Triangle>) {
        // Two disjoint triangles on the y=0 plane, separated along x.
        let vertices = vec![
            vtx(Vec3::new(-2.0, 0.0, -1.0)),
            vtx(Vec3::new(-1.0, 0.0, -1.0)),
            vtx(Vec3::new(-1.5, 0.0, 1.0)),
            vtx(Vec3::new(1.0, 0.0, -1.0)),
            vtx(Vec3::new(2.0, 0.0, -1.0)),
            vtx(Vec3::new(1.5, 0.0, 1.0)),
        ];
        let triangles = vec![Triangle { v0: 0, v1: 1, v2: 2 }, Triangle { v0: 3, v1: 4, v2: 5 }];
        (vertices, triangles)
    }

    #[test]
    fn root_aabb_contains_every_triangle() {
        let (vertices, triangles) = two_triangle_mesh();
        let bvh = Bvh::build(vertices.clone(), &triangles);
        let root = bvh.root_aabb().unwrap();
        for t in &triangles {
            let aabb = triangle_aabb(
                vertices[t.v0 as usize].position,
                vertices[t.v1 as usize].position,
                vertices[t.v2 as usize].position,
            );
            assert!(root.contains(&aabb));
        }
    }

    #[test]
    fn every_leaf_aabb_contains_its_triangle() {
        let (vertices, triangles) = two_triangle_mesh();
        let bvh = Bvh::build(vertices.clone(), &triangles);
        for node in &bvh.nodes {
            if let BvhNode::Leaf { aabb, triangle } = node {
                let tri_aabb = triangle_aabb(
                    vertices[triangle[0] as usize].position,
                    vertices[triangle[1] as usize].position,
                    vertices[triangle[2] as usize].position,
                );
                assert!(aabb.contains(&tri_aabb));
            }
        }
    }

    #[test]
    fn finds_nearer_of_two_triangles_regardless_of_build_order() {
        let (vertices, triangles) = two_triangle_mesh();
        let bvh_ab = Bvh::build(vertices.clone(), &triangles);
        let reversed = vec![triangles[1], triangles[0]];
        let bvh_ba = Bvh::build(vertices, &reversed);

        let ray = Ray::new(Vec3::new(-1.5, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit_ab = bvh_ab.intersect_model(&ray);
        let hit_ba = bvh_ba.intersect_model(&ray);
        assert!(hit_ab.is_hit);
        assert!(hit_ba.is_hit);
        assert!((hit_ab.point.x - hit_ba.point.x).abs() < 1e-9);
        assert!((hit_ab.point.x - (-1.5)).abs() < 1e-6);
    }

    #[test]
    fn miss_outside_root_aabb() {
        let (vertices, triangles) = two_triangle_mesh();
        let bvh = Bvh::build(vertices, &triangles);
        let ray = Ray::new(Vec3::new(100.0, 100.0, 100.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(!bvh.intersect_model(&ray).is_hit);
    }
}
