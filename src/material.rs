//! Material BRDFs, evaluated in the local `(s, n, t)` shading frame where
//! `y` is the normal axis.

use crate::math::{abs_cos_theta, cos_theta, Vec2, Vec3};
use crate::rng::Rng;
use crate::texture::TextureStore;

#[derive(Clone, Debug)]
pub enum Material {
    Diffuse { albedo: Vec3, tex_id: i32 },
    Glass { ior: f64 },
}

impl Material {
    pub fn is_nee(&self) -> bool {
        matches!(self, Material::Diffuse { .. })
    }

    /// Draws an outgoing direction and returns `(brdf, wi_local, pdf)`.
    pub fn sample(&self, wo_local: Vec3, uv: Vec2, textures: &TextureStore, rng: &mut Rng) -> (Vec3, Vec3, f64) {
        match self {
            Material::Diffuse { albedo, tex_id } => {
                let u = rng.next_f64();
                let v = rng.next_f64();

                let theta = 0.5 * (1.0 - 2.0 * u).acos();
                let phi = 2.0 * std::f64::consts::PI * v;

                let wi = Vec3::new(phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
                let pdf = theta.cos() / std::f64::consts::PI;

                let tex = textures.get(*tex_id, uv.x, uv.y);
                let brdf = *albedo * tex / std::f64::consts::PI;
                (brdf, wi, pdf)
            }
            Material::Glass { ior } => {
                let is_entering = cos_theta(wo_local) > 0.0;
                let (n1, n2, normal) = if is_entering {
                    (1.0, *ior, Vec3::new(0.0, -1.0, 0.0))
                } else {
                    (*ior, 1.0, Vec3::new(0.0, 1.0, 0.0))
                };

                let f0 = ((n1 - n2) / (n1 + n2)).powi(2);
                let cos = abs_cos_theta(wo_local);
                let fresnel = f0 + (1.0 - f0) * (1.0 - cos).powi(5);

                if rng.next_f64() < fresnel {
                    let wi = wo_local.reflect(normal);
                    let pdf = fresnel;
                    (Vec3::splat(fresnel / abs_cos_theta(wi)), wi, pdf)
                } else {
                    match refract(wo_local, normal, n1, n2) {
                        Some(wi) => {
                            let pdf = 1.0 - fresnel;
                            let contrib = (n1 / n2).powi(2) * (1.0 - fresnel) / abs_cos_theta(wi);
                            (Vec3::splat(contrib), wi, pdf)
                        }
                        None => {
                            let wi = wo_local.reflect(normal);
                            let pdf = 1.0 - fresnel;
                            (Vec3::splat(pdf / abs_cos_theta(wi)), wi, pdf)
                        }
                    }
                }
            }
        }
    }
}

/// Snell refraction; `None` on total internal reflection.
fn refract(v: Vec3, n: Vec3, n1: f64, n2: f64) -> Option<Vec3> {
    let cos = abs_cos_theta(v);
    let sin = (1.0 - cos * cos).max(0.0).sqrt();
    let alpha = n1 / n2 * sin;
    if alpha * alpha > 1.0 {
        return None;
    }
    Some((n1 / n2) * (-v + v.dot(n) * n) - (1.0 - alpha * alpha).sqrt() * n)
}
