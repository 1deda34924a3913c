//! Vista CLI
//!
//! Open the viewer, inspect models, and write a starter configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vista_3d::loader::{GltfLoader, LoadedScene};
use vista_app::ViewerConfig;

#[derive(Parser)]
#[command(name = "vista")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vista 3D scene viewer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the viewer window
    View(ViewArgs),

    /// Print the contents of a glTF/GLB model
    Inspect {
        /// Model file
        model: PathBuf,
    },

    /// Write the default configuration
    Init {
        /// Output path
        #[arg(short, long, default_value = "viewer.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Default)]
struct ViewArgs {
    /// Configuration file
    #[arg(short, long, default_value = "viewer.toml")]
    config: PathBuf,

    /// glTF/GLB model to load
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Equirectangular HDR used as background and lighting
    #[arg(long)]
    hdr: Option<PathBuf>,

    /// Window width
    #[arg(long)]
    width: Option<u32>,

    /// Window height
    #[arg(long)]
    height: Option<u32>,

    /// Disable shadow maps
    #[arg(long)]
    no_shadows: bool,
}

impl ViewArgs {
    fn apply(&self, config: &mut ViewerConfig) {
        if let Some(model) = &self.model {
            config.model.path = Some(model.clone());
        }
        if let Some(hdr) = &self.hdr {
            config.environment.path = Some(hdr.clone());
            config.environment.background = true;
            config.environment.lighting = true;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if self.no_shadows {
            config.render.shadows = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug,wgpu_core=warn,wgpu_hal=warn,naga=warn")
        } else {
            EnvFilter::new("info,wgpu_core=warn,wgpu_hal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::View(args) => cmd_view(&args),
        Commands::Inspect { model } => cmd_inspect(&model),
        Commands::Init { output, force } => cmd_init(&output, force),
    }
}

fn cmd_view(args: &ViewArgs) -> Result<()> {
    let mut config = ViewerConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    args.apply(&mut config);

    info!(
        "Opening {}x{} viewer{}",
        config.window.width,
        config.window.height,
        config
            .model
            .path
            .as_ref()
            .map(|p| format!(" with {}", p.display()))
            .unwrap_or_default()
    );

    vista_app::run_desktop(config).context("viewer exited with an error")
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let scene = GltfLoader::new()
        .load_path(path, |_| {})
        .with_context(|| format!("failed to load {}", path.display()))?;
    print!("{}", summarize(&scene));
    Ok(())
}

fn summarize(scene: &LoadedScene) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", scene.name);

    let primitives: usize = scene.meshes.iter().map(|m| m.primitives.len()).sum();
    let _ = writeln!(out, "  meshes: {} ({} primitives)", scene.meshes.len(), primitives);
    for mesh in &scene.meshes {
        let vertices: usize = mesh.primitives.iter().map(|p| p.geometry.vertex_count()).sum();
        let _ = writeln!(out, "    {} - {} vertices", display_name(&mesh.name), vertices);
    }

    let _ = writeln!(out, "  nodes: {} ({} roots)", scene.nodes.len(), scene.root_nodes.len());
    let _ = writeln!(out, "  materials: {}", scene.materials.len());
    let _ = writeln!(out, "  textures: {}", scene.textures.len());

    let _ = writeln!(out, "  skins: {}", scene.skins.len());
    for skin in &scene.skins {
        let name = skin.name.as_deref().unwrap_or("");
        let _ = writeln!(out, "    {} - {} joints", display_name(name), skin.joints.len());
    }

    let _ = writeln!(out, "  animations: {}", scene.animations.len());
    for clip in &scene.animations {
        let _ = writeln!(
            out,
            "    {} - {:.2}s, {} channels",
            display_name(&clip.name),
            clip.duration,
            clip.channels.len()
        );
    }

    if scene.bounds.is_empty() {
        let _ = writeln!(out, "  bounds: empty");
    } else {
        let (min, max) = (scene.bounds.min, scene.bounds.max);
        let _ = writeln!(
            out,
            "  bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    out
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<unnamed>"
    } else {
        name
    }
}

fn cmd_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }
    ViewerConfig::default()
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());
    info!("Run `vista view --config {}` to open the viewer", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use vista_3d::animation::{AnimationClip, Channel};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_view_flags() {
        let cli = Cli::parse_from([
            "vista",
            "view",
            "--model",
            "robot.glb",
            "--hdr",
            "sky.hdr",
            "--width",
            "640",
            "--no-shadows",
        ]);
        let Commands::View(args) = cli.command else {
            panic!("expected view");
        };
        let mut config = ViewerConfig::default();
        args.apply(&mut config);

        assert_eq!(config.model.path, Some(PathBuf::from("robot.glb")));
        assert_eq!(config.environment.path, Some(PathBuf::from("sky.hdr")));
        assert!(config.environment.is_used());
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert!(!config.render.shadows);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = ViewerConfig::default();
        ViewArgs::default().apply(&mut config);
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_summary_lists_clips() {
        let mut scene = LoadedScene::new("frame");
        scene.animations = vec![AnimationClip::new("Walk", Vec::<Channel>::new())];
        let summary = summarize(&scene);
        assert!(summary.starts_with("frame\n"));
        assert!(summary.contains("animations: 1"));
        assert!(summary.contains("Walk - 0.00s, 0 channels"));
        assert!(summary.contains("bounds: empty"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let path = std::env::temp_dir().join(format!("vista-init-{}.toml", std::process::id()));
        cmd_init(&path, true).unwrap();
        assert!(cmd_init(&path, false).is_err());
        let written = ViewerConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, ViewerConfig::default());
    }
}
