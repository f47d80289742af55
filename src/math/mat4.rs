use super::Vec3;

/// A column-major 4x4 affine transform: `columns[c][r]`, flattened as
/// `m[c * 4 + r]`, matching the layout used by the renderer this one is
/// styled after.
#[derive(Copy, Clone, Debug)]
pub struct Mat4 {
    pub m: [f64; 16],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
    };

    pub fn from_columns(m: [f64; 16]) -> Mat4 {
        Mat4 { m }
    }

    /// Applies the full affine transform (including translation) to a point.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
        )
    }

    /// Applies only the linear (3x3) part, for directions and normals.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(m[0] * v.x + m[4] * v.y + m[8] * v.z, m[1] * v.x + m[5] * v.y + m[9] * v.z, m[2] * v.x + m[6] * v.y + m[10] * v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_is_a_no_op() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let out = Mat4::IDENTITY.transform_point(p);
        assert_relative_eq!(out.x, p.x);
        assert_relative_eq!(out.y, p.y);
        assert_relative_eq!(out.z, p.z);
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let mut m = Mat4::IDENTITY;
        m.m[12] = 10.0;
        m.m[13] = 0.0;
        m.m[14] = 0.0;
        let p = Mat4::transform_point(&m, Vec3::ZERO);
        assert_relative_eq!(p.x, 10.0);
        let v = Mat4::transform_vector(&m, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v.x, 1.0);
    }
}
