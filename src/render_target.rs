//! Accumulation buffer, gamma post-pass, and RGBA8 pixel packing.

use crate::math::Vec3;

/// 3x3 Gaussian kernel, normalized by the sum 16. Disabled by default —
/// `RenderTarget::read_filtered` only applies it when asked.
static GAUSS3: [f64; 9] = [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0];

pub struct RenderTarget {
    pub width: usize,
    pub height: usize,
    acc: Vec<Vec3>,
    count: Vec<u32>,
}

impl RenderTarget {
    pub fn new(width: usize, height: usize) -> RenderTarget {
        RenderTarget { width, height, acc: vec![Vec3::ZERO; width * height], count: vec![0; width * height] }
    }

    pub fn clear(&mut self) {
        self.acc.iter_mut().for_each(|v| *v = Vec3::ZERO);
        self.count.iter_mut().for_each(|c| *c = 0);
    }

    /// Accumulates one sample's radiance at `(x, y)`.
    pub fn accumulate(&mut self, x: usize, y: usize, radiance: Vec3) {
        let i = self.width * y + x;
        self.acc[i] += radiance;
        self.count[i] += 1;
    }

    /// The arithmetic mean of accumulated samples; `(0,0,0)` before any
    /// sample has been written.
    pub fn read(&self, x: usize, y: usize) -> Vec3 {
        let i = self.width * y + x;
        if self.count[i] == 0 {
            Vec3::ZERO
        } else {
            self.acc[i] / self.count[i] as f64
        }
    }

    fn read_weighted(&self, x: i64, y: i64, weight: f64) -> (f64, Vec3) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return (0.0, Vec3::ZERO);
        }
        (weight, self.read(x as usize, y as usize) * weight)
    }

    /// The 3x3 Gaussian-filtered pixel value, clamped at the image border.
    pub fn read_gaussian3(&self, x: usize, y: usize) -> Vec3 {
        let (ix, iy) = (x as i64, y as i64);
        let mut sum_weight = 0.0;
        let mut acc = Vec3::ZERO;
        for vy in 0..3i64 {
            for vx in 0..3i64 {
                let (w, v) = self.read_weighted(ix + vx - 1, iy + vy - 1, GAUSS3[(vy * 3 + vx) as usize]);
                sum_weight += w;
                acc += v;
            }
        }
        acc / sum_weight
    }

    /// Applies gamma 1/2.2 to a linear radiance value and clamps to `[0,1]`.
    pub fn gamma_correct(linear: Vec3) -> Vec3 {
        let gamma = |c: f64| c.max(0.0).min(1.0).powf(1.0 / 2.2);
        Vec3::new(gamma(linear.x), gamma(linear.y), gamma(linear.z))
    }

    /// Packs the whole buffer into RGBA8, applying gamma and (when
    /// `gaussian` is set) the 3x3 filter. Alpha is always opaque.
    pub fn pack_rgba8(&self, gaussian: bool) -> Vec<u8> {
        let mut out = vec![0u8; self.width * self.height * 4];
        for y in 0..self.height {
            for x in 0..self.width {
                let linear = if gaussian { self.read_gaussian3(x, y) } else { self.read(x, y) };
                let srgb = Self::gamma_correct(linear);
                let i = (y * self.width + x) * 4;
                out[i] = (srgb.x * 255.0).round() as u8;
                out[i + 1] = (srgb.y * 255.0).round() as u8;
                out[i + 2] = (srgb.z * 255.0).round() as u8;
                out[i + 3] = 255;
            }
        }
        out
    }
}
