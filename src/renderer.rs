//! The host-facing renderer: owns the scene, textures, camera, and the
//! incremental streaming state for one rendering session.
//!
//! Replaces a module-scope `static mut` configuration (the pattern used by
//! the renderer this one is styled after) with an explicit value that a
//! host holds and drives — a natural fit for exposing a `#[wasm_bindgen]`
//! class to JavaScript instead of free functions over global state.

use wasm_bindgen::prelude::*;

use crate::camera::Camera;
use crate::driver::{Driver, DriverState};
use crate::geometry::{Triangle, Vertex};
use crate::integrator::Integrator;
use crate::light::AreaLight;
use crate::material::Material;
use crate::math::{Mat4, Vec2, Vec3};
use crate::render_target::RenderTarget;
use crate::scene::Stage;
use crate::texture::{Texture, TextureStore};

#[wasm_bindgen]
pub struct Renderer {
    stage: Stage,
    textures: TextureStore,
    camera: Option<Camera>,
    light: AreaLight,
    driver: Option<Driver>,
    target: Option<RenderTarget>,
}

#[wasm_bindgen]
impl Renderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Renderer {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        Renderer {
            stage: Stage::new(),
            textures: TextureStore::new(),
            camera: None,
            // A fixed overhead light, matching the single-light scenes this
            // core is specified against; hosts cannot yet relocate it.
            light: AreaLight { center: Vec3::new(0.0, 3.0, 0.0), half_size: 1.0, emission: Vec3::splat(10.0) },
            driver: None,
            target: None,
        }
    }

    /// Appends an `N x N` RGBA8 texture and returns its id.
    pub fn create_texture(&mut self, rgba_texels: &[u8]) -> i32 {
        let pixels = rgba_texels
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        self.textures.add(Texture::new(pixels))
    }

    /// Registers a transformed, textured mesh instance and returns its id.
    /// `matrix` holds two stacked column-major 4x4 matrices (forward, then
    /// inverse); `material[0]` selects the variant (0 = Diffuse, 1 = Glass).
    #[allow(clippy::too_many_arguments)]
    pub fn create_bounding(
        &mut self,
        position: &[f64],
        indices: &[i32],
        normal: &[f64],
        texcoord: &[f64],
        matrix: &[f64],
        material: &[f64],
    ) -> usize {
        assert_eq!(matrix.len(), 32, "matrix must hold two stacked 4x4 matrices");

        let vertex_count = position.len() / 3;
        let vertices: Vec<Vertex> = (0..vertex_count)
            .map(|i| Vertex {
                position: Vec3::new(position[i * 3], position[i * 3 + 1], position[i * 3 + 2]),
                normal: Vec3::new(normal[i * 3], normal[i * 3 + 1], normal[i * 3 + 2]),
                texcoord: Vec2::new(texcoord[i * 2], texcoord[i * 2 + 1]),
            })
            .collect();

        let triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .map(|c| Triangle { v0: c[0] as u32, v1: c[1] as u32, v2: c[2] as u32 })
            .collect();

        let mut forward = [0.0; 16];
        forward.copy_from_slice(&matrix[0..16]);
        let mut inverse = [0.0; 16];
        inverse.copy_from_slice(&matrix[16..32]);

        let mat = match material[0] as i32 {
            0 => Material::Diffuse {
                albedo: Vec3::new(material[2], material[3], material[4]),
                tex_id: material[1] as i32,
            },
            1 => Material::Glass { ior: material[1] },
            other => panic!("unknown material variant id {other}"),
        };

        self.stage.add(vertices, &triangles, Mat4::from_columns(forward), Mat4::from_columns(inverse), mat)
    }

    pub fn activate(&mut self, id: usize) {
        self.stage.activate(id);
    }

    pub fn deactivate(&mut self, id: usize) {
        self.stage.deactivate(id);
    }

    /// `cam`: position(3), forward(3), up(3), right(3), sensor distance(1).
    pub fn set_camera(&mut self, cam: &[f64]) {
        assert_eq!(cam.len(), 13, "camera parameter block must have 13 entries");
        let mut params = [0.0; 13];
        params.copy_from_slice(cam);
        self.camera = Some(Camera::from_params(&params));
    }

    /// Renders a full `W x H` frame synchronously, writing packed RGBA8
    /// into the caller-owned `buf` (`W*H*4` bytes). Returns 0 on completion,
    /// matching `read_stream`'s status convention.
    pub fn path_tracer(&mut self, buf: &mut [u8], width: u32, height: u32) -> i32 {
        let camera = self.camera.expect("set_camera must be called before path_tracer");
        let mut driver = Driver::new(width, height, 0x1234_5678);
        let mut target = RenderTarget::new(width as usize, height as usize);
        driver.start();

        let integrator = Integrator { stage: &self.stage, textures: &self.textures, light: &self.light };
        while !driver.is_done() {
            driver.step(&camera, &integrator, &mut target);
        }

        let packed = target.pack_rgba8(false);
        buf[..packed.len()].copy_from_slice(&packed);
        0
    }

    /// Begins (or continues) a streamed render, writing one slice's worth
    /// of samples into `buf` (packed RGBA8, `W*H*4` bytes). Returns 0 on
    /// completion, 1 on a partial slice, -1 if a stream is already running
    /// for a different resolution.
    pub fn read_stream(&mut self, buf: &mut [u8], width: u32, height: u32) -> i32 {
        let camera = self.camera.expect("set_camera must be called before read_stream");

        if self.driver.is_none() {
            let mut driver = Driver::new(width, height, 0x1234_5678);
            driver.start();
            self.driver = Some(driver);
            self.target = Some(RenderTarget::new(width as usize, height as usize));
        }

        let driver = self.driver.as_mut().unwrap();
        let target = self.target.as_mut().unwrap();
        if target.width != width as usize || target.height != height as usize {
            return -1;
        }

        let integrator = Integrator { stage: &self.stage, textures: &self.textures, light: &self.light };
        let state = driver.step(&camera, &integrator, target);

        let packed = target.pack_rgba8(false);
        buf[..packed.len()].copy_from_slice(&packed);

        match state {
            DriverState::Idle => {
                self.driver = None;
                self.target = None;
                0
            }
            DriverState::PostProcessing | DriverState::Streaming { .. } => 1,
        }
    }

    /// Supplements the host API with a non-physical debug mode: renders
    /// shading normals (mapped from `[-1,1]` to `[0,1]`) instead of path
    /// traced radiance, for a quick sanity check of geometry and transforms.
    pub fn debug_normals(&self, width: u32, height: u32) -> Vec<u8> {
        let camera = self.camera.expect("set_camera must be called before debug_normals");
        let mut out = vec![0u8; (width * height * 4) as usize];

        for j in 0..height {
            for i in 0..width {
                let (u, v) = crate::camera::pixel_to_sensor(i, j, width, height, 0.5, 0.5);
                let ray = camera.ray(u, v);
                let color = match self.stage.intersect_stage(ray.origin, ray.dir) {
                    Some(hit) => hit.hit.normal * 0.5 + Vec3::splat(0.5),
                    None => Vec3::ZERO,
                };
                let idx = ((j * width + i) * 4) as usize;
                out[idx] = (color.x.clamp(0.0, 1.0) * 255.0).round() as u8;
                out[idx + 1] = (color.y.clamp(0.0, 1.0) * 255.0).round() as u8;
                out[idx + 2] = (color.z.clamp(0.0, 1.0) * 255.0).round() as u8;
                out[idx + 3] = 255;
            }
        }
        out
    }
}

impl Default for Renderer {
    fn default() -> Renderer {
        Renderer::new()
    }
}
