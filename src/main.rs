//! gcd-graphs CLI: build and inspect cognitive-diagnosis graphs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use gcd_graphs::config::{PartialConfig, PartialInputs, PartialOutputs};
use gcd_graphs::export;
use gcd_graphs::persist;
use gcd_graphs::pipeline::GraphBuilder;

#[derive(Parser)]
#[command(
    name = "gcd-graphs",
    version,
    about = "Build interaction, relation and dependency graphs from assessment tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the three tables, build GI, GR and GD, and save them.
    Build {
        /// TOML file with [inputs] and [outputs] tables. Flags override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Response records (student_id, question_id, correct).
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Skill matrix: concept rows, question columns.
        #[arg(long)]
        skills: Option<PathBuf>,

        /// Prerequisite matrix: prerequisite rows, concept columns.
        #[arg(long)]
        prerequisites: Option<PathBuf>,

        /// Destination of the interaction graph.
        #[arg(long)]
        gi: Option<PathBuf>,

        /// Destination of the relation graph.
        #[arg(long)]
        gr: Option<PathBuf>,

        /// Destination of the dependency graph.
        #[arg(long)]
        gd: Option<PathBuf>,

        /// Field delimiter of the input files (one character, or \t).
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Show a saved graph.
    Inspect {
        /// Path to a graph artifact.
        file: PathBuf,

        /// Print the full graph as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            responses,
            skills,
            prerequisites,
            gi,
            gr,
            gd,
            delimiter,
        } => {
            let base = match config {
                Some(path) => PartialConfig::from_toml_file(&path)?,
                None => PartialConfig::default(),
            };
            let flags = PartialConfig {
                delimiter,
                inputs: PartialInputs {
                    responses,
                    skills,
                    prerequisites,
                },
                outputs: PartialOutputs {
                    interaction: gi,
                    relation: gr,
                    dependency: gd,
                },
            };
            let config = base.merge(flags).resolve()?;

            let report = GraphBuilder::new(config).run()?;
            for graph in &report.graphs {
                println!("{}  -> {}", graph.stats, graph.path.display());
            }
            println!("Graphs have been successfully built and saved.");
        }

        Commands::Inspect { file, json } => {
            let graph = persist::load_graph(&file)?;
            if json {
                println!("{}", export::to_json(&graph).into_diagnostic()?);
            } else {
                println!("{}", graph.stats());
            }
        }
    }

    Ok(())
}
