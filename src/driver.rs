//! The incremental streaming driver: slices a frame into scanline bands so
//! a host can display partial results between slices.
//!
//! Modeled as a state machine `Idle -> Streaming(j) -> PostProcessing ->
//! Idle`. There is no suspension point inside a slice; the driver always
//! runs a full band to completion.

use crate::camera::{pixel_to_sensor, Camera};
use crate::integrator::Integrator;
use crate::render_target::RenderTarget;
use crate::rng::Rng;

/// Reference slice size: 10 scanlines per `step()` call.
pub const DEFAULT_SCANLINES_PER_SLICE: u32 = 10;

pub const DEFAULT_SAMPLES_PER_PIXEL: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverState {
    Idle,
    Streaming { next_scanline: u32 },
    PostProcessing,
}

pub struct Driver {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub scanlines_per_slice: u32,
    pub state: DriverState,
    pub base_seed: u32,
}

impl Driver {
    pub fn new(width: u32, height: u32, base_seed: u32) -> Driver {
        Driver {
            width,
            height,
            samples_per_pixel: DEFAULT_SAMPLES_PER_PIXEL,
            scanlines_per_slice: DEFAULT_SCANLINES_PER_SLICE,
            state: DriverState::Idle,
            base_seed,
        }
    }

    pub fn start(&mut self) {
        self.state = DriverState::Streaming { next_scanline: 0 };
    }

    pub fn is_done(&self) -> bool {
        self.state == DriverState::Idle
    }

    /// Runs one slice (a band of `scanlines_per_slice` scanlines) to
    /// completion, writing samples into `target`. Advances the state
    /// machine and returns the new state.
    pub fn step(&mut self, camera: &Camera, integrator: &Integrator, target: &mut RenderTarget) -> DriverState {
        let next_scanline = match self.state {
            DriverState::Idle => return DriverState::Idle,
            DriverState::PostProcessing => {
                self.state = DriverState::Idle;
                return self.state;
            }
            DriverState::Streaming { next_scanline } => next_scanline,
        };

        let end = (next_scanline + self.scanlines_per_slice).min(self.height);

        for j in next_scanline..end {
            for i in 0..self.width {
                let mut rng = Rng::for_pixel(self.base_seed, i, j);
                for _ in 0..self.samples_per_pixel {
                    let xi_u = rng.next_f64();
                    let xi_v = rng.next_f64();
                    let (u, v) = pixel_to_sensor(i, j, self.width, self.height, xi_u, xi_v);
                    let ray = camera.ray(u, v);
                    let radiance = integrator.trace(ray.origin, ray.dir, &mut rng);
                    target.accumulate(i as usize, j as usize, radiance);
                }
            }
        }

        self.state =
            if end >= self.height { DriverState::PostProcessing } else { DriverState::Streaming { next_scanline: end } };
        log::debug!("driver: rendered scanlines {next_scanline}..{end} of {}, state -> {:?}", self.height, self.state);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::AreaLight;
    use crate::math::Vec3;
    use crate::scene::Stage;
    use crate::texture::TextureStore;

    fn demo_camera() -> Camera {
        Camera {
            position: Vec3::new(0.0, 1.0, 0.0),
            forward: Vec3::new(0.0, -1.0, 0.0),
            up: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            sensor_distance: 1.0,
        }
    }

    #[test]
    fn drains_to_postprocessing_then_idle_over_enough_steps() {
        let stage = Stage::new();
        let textures = TextureStore::new();
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::ONE };
        let integrator = Integrator { stage: &stage, textures: &textures, light: &light };

        let mut driver = Driver::new(4, 25, 1);
        driver.scanlines_per_slice = 10;
        driver.samples_per_pixel = 1;
        driver.start();

        let camera = demo_camera();
        let mut target = RenderTarget::new(4, 25);

        let mut states = Vec::new();
        while !driver.is_done() {
            states.push(driver.step(&camera, &integrator, &mut target));
        }

        assert_eq!(*states.last().unwrap(), DriverState::Idle);
        assert!(states.iter().any(|s| *s == DriverState::PostProcessing));
    }

    #[test]
    fn every_pixel_gets_sampled_after_a_full_drain() {
        let stage = Stage::new();
        let textures = TextureStore::new();
        let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::ONE };
        let integrator = Integrator { stage: &stage, textures: &textures, light: &light };

        let mut driver = Driver::new(3, 3, 7);
        driver.samples_per_pixel = 2;
        driver.start();
        let camera = demo_camera();
        let mut target = RenderTarget::new(3, 3);
        while !driver.is_done() {
            driver.step(&camera, &integrator, &mut target);
        }

        for y in 0..3 {
            for x in 0..3 {
                // Every pixel sees the background-only path; read() must not
                // be the zero default (i.e. some sample was written).
                let v = target.read(x, y);
                assert!(v.x > 0.0);
            }
        }
    }
}
