//! Meshloader - load a model file and report how it flattens
//!
//! Runs the same pipeline the C ABI uses and prints buffer sizes, bounds and
//! the resolved material.

mod settings;

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use meshloader_assets::{load_mesh, AttributeLayout, FlatMesh, LoaderConfig, PostProcess};
use meshloader_core::Vec3f;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Load a 3D model and print a summary of the flattened buffers
#[derive(Debug, Parser)]
#[command(name = "meshloader", version, about)]
struct Args {
    /// Model file (.gltf, .glb, .obj, .stl)
    file: PathBuf,

    /// Loader settings file (defaults to ~/.config/meshloader/loader.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma separated post-process steps, e.g. `triangulate,flip-uvs`, or `none`
    #[arg(long)]
    flags: Option<String>,

    /// Attribute layout: padded or ragged
    #[arg(long)]
    layout: Option<AttributeLayout>,

    /// Write the effective settings to the user config file
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Settings file, then command line overrides
    fn loader_config(&self) -> Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::load(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?,
            None => settings::load_user(),
        };
        if let Some(flags) = &self.flags {
            config.post_process = PostProcess::from_names(flags)?;
        }
        if let Some(layout) = self.layout {
            config.attribute_layout = layout;
        }
        Ok(config)
    }
}

fn fmt_vec3(v: Vec3f) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

/// Human-readable report of a flattened load
fn summary(mesh: &FlatMesh) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "vertices:   {}", mesh.vertices.len());
    let _ = writeln!(out, "normals:    {}", mesh.normals.len());
    let _ = writeln!(out, "tex coords: {}", mesh.tex_coords.len());
    let _ = writeln!(out, "colors:     {}", mesh.colors.len());
    let _ = writeln!(out, "triangles:  {}", mesh.triangle_count());
    if let Some((min, max)) = mesh.bounds() {
        let _ = writeln!(out, "bounds:     {} .. {}", fmt_vec3(min), fmt_vec3(max));
    }

    let material = &mesh.material;
    if material.is_unset() {
        let _ = writeln!(out, "material:   none");
    } else {
        let _ = writeln!(out, "material:");
        let _ = writeln!(out, "  ambient:   {}", fmt_vec3(material.ambient));
        let _ = writeln!(out, "  diffuse:   {}", fmt_vec3(material.diffuse));
        let _ = writeln!(out, "  specular:  {}", fmt_vec3(material.specular));
        let _ = writeln!(out, "  shininess: {:.4}", material.shininess);
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = args.loader_config()?;
    info!(
        "Post-process: {:?}, layout: {}",
        config.post_process, config.attribute_layout
    );

    if args.save_config {
        let path = settings::save_user(&config)?;
        info!("Settings written to {}", path.display());
    }

    let mesh = load_mesh(&args.file, &config)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    print!("{}", summary(&mesh));
    Ok(())
}
