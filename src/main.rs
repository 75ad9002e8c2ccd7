//! Main CLI application for the grid generator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grid_carver::{
    automaton::{AutomatonRule, RULE_PRESETS},
    config::{AutomatonConfig, CaveConfig, CliOverrides, Settings},
    generators::Algorithm,
    pipeline::Pipeline,
    utils::{ColorOutput, GridFormatter},
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_carver")]
#[command(about = "Procedural maze, room and cave generator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a grid
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Generation algorithm (overrides config)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Skip the structural generator
        #[arg(long, conflicts_with = "algorithm")]
        no_generator: bool,

        /// Automaton rule notation or preset name (overrides config)
        #[arg(short, long)]
        rule: Option<String>,

        /// Number of automaton generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Grid width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Grid height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Random seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the grid after every automaton generation
        #[arg(long)]
        show_generations: bool,

        /// Frame the final grid with row and column indices
        #[arg(long)]
        coords: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the named automaton rules
    Presets,

    /// Parse and describe a rule
    Rule {
        /// Rule notation (`23/3`, `B3/S23`) or preset name
        notation: String,
    },

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    init_tracing(verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            algorithm,
            no_generator,
            rule,
            generations,
            width,
            height,
            seed,
            output,
            show_generations,
            coords,
            verbose,
        } => {
            let overrides = CliOverrides {
                width,
                height,
                algorithm,
                no_generator,
                rule,
                generations,
                seed,
                output_dir: output,
                show_generations,
            };
            run_command(config, overrides, coords, verbose)
        }
        Commands::Presets => presets_command(),
        Commands::Rule { notation } => rule_command(&notation),
        Commands::Setup { directory, force } => setup_command(directory, force),
    };

    if let Err(err) = result {
        eprintln!("{}", ColorOutput::error(&format!("Error: {:#}", err)));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "grid_carver=debug"
    } else {
        "grid_carver=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    coords: bool,
    verbose: bool,
) -> Result<()> {
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        eprintln!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };
    settings.merge_with_cli(&overrides);

    if verbose {
        eprintln!("Configuration:");
        eprintln!("  Grid: {}x{}", settings.grid.width, settings.grid.height);
        match settings.generation.algorithm {
            Some(algorithm) => eprintln!("  Generator: {}", algorithm),
            None => eprintln!("  Generator: none"),
        }
        if let Some(automaton) = &settings.automaton {
            eprintln!("  Rule: {} for {} generations", automaton.rule, automaton.generations);
        }
        eprintln!();
    }

    let show_generations = settings.output.show_generations;
    let pipeline = Pipeline::new(settings).context("Failed to prepare generation run")?;
    let report = pipeline
        .run_with(|stage, generation, grid| {
            if show_generations {
                println!("{}", GridFormatter::format_generation(&stage.to_string(), generation, grid));
            }
        })
        .context("Generation run failed")?;

    if coords {
        print!("{}", GridFormatter::format_grid_with_coords(&report.grid));
    } else {
        print!("{}", GridFormatter::render(&report.grid));
    }
    eprintln!("\n{}", report);

    if let Some(directory) = &pipeline.settings().output.directory {
        let path = GridFormatter::save_report(&report, directory, pipeline.settings().output.format)
            .context("Failed to save output")?;
        eprintln!("{}", ColorOutput::success(&format!("Saved to {}", path.display())));
    }

    Ok(())
}

fn presets_command() -> Result<()> {
    println!("{}", ColorOutput::info("Rule presets (survival/birth):"));
    let width = RULE_PRESETS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, rule) in RULE_PRESETS {
        println!("  {:width$}  {}", name, rule, width = width);
    }
    Ok(())
}

fn rule_command(notation: &str) -> Result<()> {
    let rule = AutomatonRule::parse(notation)?;
    println!("Rule: {}", rule);
    if let Some(name) = rule.preset_name() {
        println!("Preset: {}", name);
    }
    println!("Walls survive with {:?} wall neighbors", rule.survival());
    println!("Floors turn to wall with {:?} wall neighbors", rule.birth());
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration files..."));

    let config_dir = directory.join("config");
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)
        .with_context(|| format!("Failed to create directory {}", examples_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    for algorithm in Algorithm::ALL {
        let mut settings = Settings::default();
        settings.generation.algorithm = Some(algorithm);
        settings.to_file(&examples_dir.join(format!("{}.yaml", algorithm)))?;
    }

    let mut life = Settings::default();
    life.generation.algorithm = None;
    life.automaton = Some(AutomatonConfig {
        generations: 50,
        wall_probability: 0.2,
        ..AutomatonConfig::default()
    });
    life.output.show_generations = true;
    life.to_file(&examples_dir.join("game_of_life.yaml"))?;

    let mut caves = Settings::default();
    caves.generation.algorithm = None;
    caves.caves = Some(CaveConfig::default());
    caves.to_file(&examples_dir.join("caves.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());
    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("Run: grid_carver run --config {}", config_path.display());

    Ok(())
}
