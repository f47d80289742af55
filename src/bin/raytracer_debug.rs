//! Native debug entry point. Renders a small demo scene to a PNG so the
//! core renderer can be exercised and inspected without a browser host.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use pathtracer_wasm::camera::Camera;
use pathtracer_wasm::driver::Driver;
use pathtracer_wasm::geometry::{Triangle, Vertex};
use pathtracer_wasm::integrator::Integrator;
use pathtracer_wasm::light::AreaLight;
use pathtracer_wasm::material::Material;
use pathtracer_wasm::math::{Mat4, Vec2, Vec3};
use pathtracer_wasm::scene::Stage;
use pathtracer_wasm::texture::TextureStore;

#[derive(Parser, Debug)]
#[command(about = "Renders a demo scene with the path tracer core and writes a PNG")]
struct Args {
    /// Output image width
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Output image height
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Samples per pixel
    #[arg(long, default_value_t = 32)]
    spp: u32,

    /// Output PNG path
    #[arg(long, default_value = "out.png")]
    out: String,

    /// Render normals instead of path traced radiance
    #[arg(long)]
    debug_normals: bool,
}

fn floor_and_glass_sphere_proxy(stage: &mut Stage) {
    // A floor plane plus a small diffuse triangle standing in for a more
    // elaborate demo mesh; enough to exercise the BVH, the scene composer,
    // and both material variants.
    let floor_vertices = vec![
        Vertex { position: Vec3::new(-5.0, 0.0, -5.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::new(0.0, 0.0) },
        Vertex { position: Vec3::new(5.0, 0.0, -5.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::new(1.0, 0.0) },
        Vertex { position: Vec3::new(5.0, 0.0, 5.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::new(1.0, 1.0) },
        Vertex { position: Vec3::new(-5.0, 0.0, 5.0), normal: Vec3::new(0.0, 1.0, 0.0), texcoord: Vec2::new(0.0, 1.0) },
    ];
    let floor_triangles = vec![Triangle { v0: 0, v1: 1, v2: 2 }, Triangle { v0: 0, v1: 2, v2: 3 }];
    stage.add(
        floor_vertices,
        &floor_triangles,
        Mat4::IDENTITY,
        Mat4::IDENTITY,
        Material::Diffuse { albedo: Vec3::splat(0.8), tex_id: -1 },
    );

    let glass_vertices = vec![
        Vertex { position: Vec3::new(-1.0, 1.0, 0.0), normal: Vec3::new(0.0, 0.0, 1.0), texcoord: Vec2::ZERO },
        Vertex { position: Vec3::new(1.0, 1.0, 0.0), normal: Vec3::new(0.0, 0.0, 1.0), texcoord: Vec2::ZERO },
        Vertex { position: Vec3::new(0.0, 3.0, 0.0), normal: Vec3::new(0.0, 0.0, 1.0), texcoord: Vec2::ZERO },
    ];
    let glass_triangles = vec![Triangle { v0: 0, v1: 1, v2: 2 }];
    stage.add(glass_vertices, &glass_triangles, Mat4::IDENTITY, Mat4::IDENTITY, Material::Glass { ior: 1.5 });
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut stage = Stage::new();
    floor_and_glass_sphere_proxy(&mut stage);
    let textures = TextureStore::new();
    let light = AreaLight { center: Vec3::new(0.0, 5.0, 0.0), half_size: 1.0, emission: Vec3::splat(8.0) };

    let camera = Camera {
        position: Vec3::new(0.0, 2.5, 6.0),
        forward: Vec3::new(0.0, -0.2, -1.0).normalize(),
        up: Vec3::new(0.0, 1.0, -0.2).normalize(),
        right: Vec3::new(1.0, 0.0, 0.0),
        sensor_distance: 1.5,
    };

    let pixels = if args.debug_normals {
        info!("rendering shading normals for a {}x{} frame", args.width, args.height);
        render_normals(&stage, &camera, args.width, args.height)
    } else {
        info!("path tracing a {}x{} frame at {} spp", args.width, args.height, args.spp);
        let mut driver = Driver::new(args.width, args.height, 0xC0FFEE);
        driver.samples_per_pixel = args.spp;
        driver.start();
        let mut target = pathtracer_wasm::render_target::RenderTarget::new(args.width as usize, args.height as usize);
        let integrator = Integrator { stage: &stage, textures: &textures, light: &light };
        while !driver.is_done() {
            driver.step(&camera, &integrator, &mut target);
        }
        target.pack_rgba8(false)
    };

    image::save_buffer(&args.out, &pixels, args.width, args.height, image::ColorType::Rgba8)
        .with_context(|| format!("failed to write PNG to {}", args.out))?;
    info!("wrote {}", args.out);
    Ok(())
}

fn render_normals(stage: &Stage, camera: &Camera, width: u32, height: u32) -> Vec<u8> {
    let mut out = vec![0u8; (width * height * 4) as usize];
    for j in 0..height {
        for i in 0..width {
            let (u, v) = pathtracer_wasm::camera::pixel_to_sensor(i, j, width, height, 0.5, 0.5);
            let ray = camera.ray(u, v);
            let color = match stage.intersect_stage(ray.origin, ray.dir) {
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
