use crate::geometry::Ray;
use crate::math::Vec3;

/// An axis-aligned bounding box. Invariant: `min.k <= max.k` for each axis.
#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb { min: Vec3::ZERO, max: Vec3::ZERO };

    pub fn new(min: Vec3, max: Vec3) -> Aabb {
        Aabb {
            min: Vec3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Vec3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    pub fn surface_area(&self) -> f64 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    pub fn join(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            Vec3::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y), self.min.z.min(other.min.z)),
            Vec3::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y), self.max.z.max(other.max.z)),
        )
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.min.z >= self.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }


    /// Slab-method ray-box intersection. Returns the closer non-negative
    /// parameter; if the origin lies inside the box, returns `tmax` (the
    /// near/exit convention used throughout spec.md §4.2).
    pub fn hit(&self, ray: &Ray) -> Option<f64> {
        let mut tmin = -f64::INFINITY;
        let mut tmax = f64::INFINITY;

        for axis in 0..3 {
            let (o, d, lo, hi) = match axis {
                0 => (ray.origin.x, ray.dir.x, self.min.x, self.max.x),
                1 => (ray.origin.y, ray.dir.y, self.min.y, self.max.y),
                _ => (ray.origin.z, ray.dir.z, self.min.z, self.max.z),
            };

            if d == 0.0 {
                if !(lo <= o && o <= hi) {
                    return None;
                }
            } else {
                let t1 = (lo - o) / d;
                let t2 = (hi - o) / d;
                tmin = tmin.max(t1.min(t2));
                tmax = tmax.min(t1.max(t2));
            }
        }

        if tmin > tmax || tmax < 0.0 {
            None
        } else if tmin >= 0.0 {
            Some(tmin)
        } else {
            Some(tmax)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn miss_from_outside() {
        let b = unit_box();
        let r = Ray::new(Vec3::new(10.0, 10.0, 10.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(b.hit(&r).is_none());
    }

    #[test]
    fn hit_from_outside_and_reversed_from_inside() {
        let b = unit_box();
        let r = Ray::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let t_enter = b.hit(&r).expect("should hit");
        assert!((t_enter - 1.0).abs() < 1e-12);

        let inside = Ray::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let t_exit = b.hit(&inside).expect("origin inside counts as hit");
        assert!((t_exit - 0.5).abs() < 1e-12);

        let reversed = Ray::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(-1.0, 0.0, 0.0));
        let t_exit_rev = b.hit(&reversed).expect("origin inside counts as hit");
        assert!((t_exit_rev - 0.5).abs() < 1e-12);
    }

    #[test]
    fn boundary_counts_as_hit() {
        let b = unit_box();
        let r = Ray::new(Vec3::new(0.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert!(b.hit(&r).is_some());
    }

    #[test]
    fn join_contains_both() {
        let a = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        let j = a.join(&b);
        assert!(j.contains(&a));
        assert!(j.contains(&b));
    }
}
