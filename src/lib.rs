pub mod bvh;
pub mod camera;
pub mod driver;
pub mod geometry;
pub mod integrator;
pub mod light;
pub mod material;
pub mod math;
pub mod mesh;
pub mod render_target;
pub mod renderer;
pub mod rng;
pub mod scene;
pub mod texture;

pub use renderer::Renderer;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Installs the console logger and panic hook. Hosts should call this once
/// before constructing a `Renderer`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_log::init_with_level(log::Level::Warn).expect("failed to initialize console logger");
    console_error_panic_hook::set_once();
}
