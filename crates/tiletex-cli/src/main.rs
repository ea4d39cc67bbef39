use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::PathBuf;
use tiletex_core::RenderConfig;
use tiletex_render::MarkdownTiler;

#[derive(Parser)]
#[command(name = "tiletex")]
#[command(about = "Render Markdown + LaTeX answers into square PNG tiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Markdown file into numbered PNG tiles
    Render {
        /// Path to the Markdown file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Directory to write tile-NNN.png files into
        #[arg(long, default_value = "tiles")]
        out_dir: PathBuf,

        /// Use the lightweight math mode even when a LaTeX toolchain is
        /// installed
        #[arg(long)]
        force_fallback: bool,
    },
    /// Probe the system and print the effective configuration as JSON
    Probe,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Render {
            path,
            out_dir,
            force_fallback,
        } => {
            let markdown = fs::read_to_string(path)?;
            let mut cfg = RenderConfig::detect();
            if *force_fallback {
                cfg.full_latex = false;
            }
            let tiler = MarkdownTiler::new(cfg)?;
            let tiles = tiler.render(&markdown);
            info!("rendered {} tiles from {}", tiles.len(), path.display());

            fs::create_dir_all(out_dir)?;
            for (index, tile) in tiles.iter().enumerate() {
                let file = out_dir.join(format!("tile-{index:03}.png"));
                fs::write(&file, &tile.png)?;
                println!("{}", file.display());
            }
        }
        Commands::Probe => {
            let cfg = RenderConfig::detect();
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
    }
    Ok(())
}
