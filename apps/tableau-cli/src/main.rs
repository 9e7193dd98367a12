use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tableau_common::{GoblinCount, Preset};
use tableau_input::{Key, KeyInput};
use tableau_render::{DebugTextRenderer, Renderer};
use tableau_stage::{Stage, StageConfig};
use tableau_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tableau-cli", about = "Headless tableau scene runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List the presets and their keys
    Presets,
    /// Build a preset, replay keys against it and print the result
    Render(RenderArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Preset to build; defaults to the configured startup preset
    #[arg(short, long)]
    preset: Option<Preset>,

    /// Keys pressed after setup, in order (e.g. `up up plus w 3`)
    #[arg(short, long, num_args = 1..)]
    keys: Vec<Key>,

    /// Print the scene summary and objects as JSON
    #[arg(long)]
    json: bool,

    /// List at most this many objects in text output
    #[arg(long)]
    max_objects: Option<usize>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model directory, overrides the configured asset root
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Seed for the army's pose picks
    #[arg(long)]
    seed: Option<u64>,
}

impl RenderArgs {
    fn stage_config(&self) -> anyhow::Result<StageConfig> {
        let mut config = match &self.config {
            Some(path) => StageConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => StageConfig::default(),
        };
        if let Some(assets) = &self.assets {
            config.asset_root = assets.clone();
        }
        if let Some(preset) = self.preset {
            config.startup_preset = preset;
        }
        if let Some(seed) = self.seed {
            config.army_seed = seed;
        }
        Ok(config)
    }
}

fn preset_key(preset: Preset) -> Option<&'static str> {
    match preset {
        Preset::Goblin(GoblinCount::Single) => Some("1"),
        Preset::Goblin(GoblinCount::Trio) => Some("2"),
        Preset::Goblin(GoblinCount::Army) => Some("3"),
        Preset::Human => Some("4"),
        Preset::Sphere | Preset::Outlander => None,
    }
}

fn run_render(args: &RenderArgs) -> anyhow::Result<String> {
    let config = args.stage_config()?;
    let mut stage = Stage::from_config(config);
    stage.setup_camera();
    stage
        .setup_scene()
        .with_context(|| format!("setting up {}", stage.config().startup_preset))?;

    for key in &args.keys {
        stage.handle_input(KeyInput::pressed(*key));
        if stage.exit_requested() {
            tracing::info!("escape pressed, ignoring remaining keys");
            break;
        }
    }

    if args.json {
        let value = serde_json::json!({
            "preset": stage.preset().map(|p| p.to_string()),
            "current": stage.current_object(),
            "summary": SceneInspector::summary(stage.scene(), stage.camera()),
            "objects": SceneInspector::list_objects(stage.scene()),
        });
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        let renderer = match args.max_objects {
            Some(n) => DebugTextRenderer::with_max_objects(n),
            None => DebugTextRenderer::new(),
        };
        Ok(renderer.render(stage.scene(), stage.camera()))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("tableau-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", tableau_scene::crate_info());
            println!("assets: {}", tableau_assets::crate_info());
            println!("input: {}", tableau_input::crate_info());
            println!("render: {}", tableau_render::crate_info());
            println!("stage: {}", tableau_stage::crate_info());
            println!("tools: {}", tableau_tools::crate_info());
        }
        Commands::Presets => {
            for preset in Preset::ALL {
                let key = preset_key(preset).unwrap_or("-");
                println!("{:<10} key {key}", preset.name());
            }
        }
        Commands::Render(args) => {
            print!("{}", run_render(&args)?);
        }
    }

    Ok(())
}
