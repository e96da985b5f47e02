use clap::Parser;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use softras::io::config::Config;
use softras::io::image::save_framebuffer;
use softras::io::obj_loader::load_obj;
use softras::pipeline::renderer::SoftwareRenderer;
use softras::scene::camera::Camera;
use softras::scene::material::Material;
use softras::scene::mesh::Mesh;
use softras::scene::texture::Texture;

/// Software rasterizer: renders a configured scene to an image file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML scene configuration; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Output image path, overriding the configured one.
    #[arg(short, long)]
    output: Option<String>,

    /// Mesh yaw in degrees for this frame.
    #[arg(long, default_value_t = 0.0)]
    yaw: f32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = config.settings()?;

    let width = config.render.width;
    let height = config.render.height;
    let aspect_ratio = width as f32 / height as f32;

    let camera = Camera::new(
        Point3::from(config.camera.position),
        config.camera.fov_angle,
        aspect_ratio,
    );

    let mut mesh = match &config.scene.mesh {
        Some(path) => load_obj(path)?,
        None => {
            warn!("no mesh configured, rendering the built-in test triangle");
            Mesh::create_test_triangle()
        }
    };
    mesh.set_translation(Vector3::from(config.scene.position));
    if args.yaw != 0.0 {
        mesh.rotation_speed = args.yaw.to_radians();
        mesh.update(1.0);
    }
    if let Some(material) = load_material(&config)? {
        mesh = mesh.with_material(material);
    }

    let mut renderer = SoftwareRenderer::new(width, height);
    renderer.begin_frame(&settings);
    renderer.draw_mesh(&settings, &camera, &mut mesh);

    let output = args.output.as_ref().unwrap_or(&config.render.output);
    save_framebuffer(&renderer.framebuffer, output)?;
    info!("frame written to {output}");
    Ok(())
}

/// Builds the mesh's texture set from the configured paths: the full
/// four-map set when every map is present, a bare diffuse map otherwise.
fn load_material(config: &Config) -> Result<Option<Material>, String> {
    let scene = &config.scene;
    let Some(diffuse_path) = &scene.diffuse_map else {
        return Ok(None);
    };
    let diffuse = Texture::load(diffuse_path)?;

    match (&scene.normal_map, &scene.specular_map, &scene.glossiness_map) {
        (Some(normal), Some(specular), Some(glossiness)) => Ok(Some(Material::Mapped {
            diffuse,
            normal: Texture::load(normal)?,
            specular: Texture::load(specular)?,
            glossiness: Texture::load(glossiness)?,
        })),
        (None, None, None) => Ok(Some(Material::Diffuse { diffuse })),
        _ => Err("normal, specular and glossiness maps must be configured together".to_string()),
    }
}
