//! A pinhole camera: given an orthonormal `(right, up, forward)` basis, a
//! position, and a sensor distance, maps normalized pixel coordinates to
//! world-space rays.

use crate::geometry::Ray;
use crate::math::Vec3;

/// Trusted to be unit length and mutually orthogonal by the caller — the
/// camera does not re-orthonormalize them.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub sensor_distance: f64,
}

impl Camera {
    /// Decodes the 13-float wire format: position(3), forward(3), up(3),
    /// right(3), sensor distance(1).
    pub fn from_params(params: &[f64; 13]) -> Camera {
        Camera {
            position: Vec3::new(params[0], params[1], params[2]),
            forward: Vec3::new(params[3], params[4], params[5]),
            up: Vec3::new(params[6], params[7], params[8]),
            right: Vec3::new(params[9], params[10], params[11]),
            sensor_distance: params[12],
        }
    }

    /// Generates a ray for normalized sensor coordinates `(u, v)`.
    pub fn ray(&self, u: f64, v: f64) -> Ray {
        let sensor_local = self.right * (-u) + self.up * (-v);
        let sensor_point = self.position + self.forward * self.sensor_distance + sensor_local;
        Ray::new(self.position, (sensor_point - self.position).normalize())
    }
}

/// Normalized sensor coordinates for pixel `(i, j)` of a `width x height`
/// image, jittered by `(xi_u, xi_v) ~ U[0,1)^2` for anti-aliasing.
pub fn pixel_to_sensor(i: u32, j: u32, width: u32, height: u32, xi_u: f64, xi_v: f64) -> (f64, f64) {
    let w = width as f64;
    let h = height as f64;
    let u = (i as f64 + xi_u - w / 2.0) / h;
    let v = -(j as f64 + xi_v - h / 2.0) / h;
    (u, v)
}
