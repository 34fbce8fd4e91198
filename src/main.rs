//! Inspect scene path declarations and agent goal files

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use steerpath::core::{AgentConfig, load_path_set};

/// Validate and summarize steering configuration files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the paths a scene file declares
    Paths {
        /// `.json` or `.ron` scene file
        file: PathBuf,
    },
    /// Build the goals of an agent file
    Agent {
        /// `.json` or `.ron` agent file
        file: PathBuf,
        /// Scene file whose paths `follow` goals refer to
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn show_paths(file: PathBuf) -> Result<(), Box<dyn Error>> {
    let paths = load_path_set(&file)?;
    for path in paths.iter() {
        println!(
            "{}\t{}\t{}\t{}",
            path.name(),
            path.orientation(),
            if path.forward_direction() { "forward" } else { "reverse" },
            if path.is_cyclical() { "loop" } else { "open" },
        );
    }
    Ok(())
}

fn show_agent(file: PathBuf, scene: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let config = AgentConfig::load(&file)?;
    let behavior = match scene {
        Some(scene) => config.build_behavior_with_paths(&load_path_set(scene)?)?,
        None => config.build_behavior()?,
    };

    println!("{} ({} goals, total weight {})", config.name, behavior.len(), behavior.total_weight());
    for goal in behavior.iter() {
        if !goal.is_consistent() {
            log::warn!("`{}` goal wraps a goal of another kind", goal.name());
        }
        println!("  {}\t{}", goal.name(), goal.weight());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Paths { file } => show_paths(file),
        Command::Agent { file, scene } => show_agent(file, scene),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
