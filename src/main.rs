// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use kitgen::classify::CLASSIFIERS;
use kitgen::config::{self, Kit};
use kitgen::export;
use kitgen::pipeline::{self, PipelineError, RunSummary};
use kitgen::scan;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Generates DrumGizmo kits from sample folders."
)]
struct Cli {
    /// Enables debug logging and prints every generated instrument.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a kit from a sample library.
    Generate {
        /// The path to the kit config.
        config: PathBuf,
        /// The root path of the sample library.
        root: PathBuf,
        /// The directory to write the kit files to. Must not exist yet. If not given, the kit
        /// is generated but not written.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Makes sample paths relative to the instrument files instead of the library root.
        #[arg(short, long)]
        auto_relative: bool,
        /// The number of threads used to classify paths. Defaults to the number of CPUs.
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Overrides the kit name from the config.
        #[arg(long)]
        name: Option<String>,
        /// Overrides the kit description from the config.
        #[arg(long)]
        description: Option<String>,
    },
    /// Validates a kit config and prints it.
    Check {
        /// The path to the kit config.
        config: PathBuf,
    },
    /// Prints how the given library-relative paths are classified.
    Classify {
        /// The path to the kit config.
        config: PathBuf,
        /// The paths to classify, relative to the library root.
        paths: Vec<PathBuf>,
    },
    /// Lists the available classifiers.
    Classifiers {},
}

fn print_failures(summary: &RunSummary) {
    if summary.failures.is_empty() {
        return;
    }
    println!("Failed paths:");
    for failure in summary.failures.iter() {
        println!("- {}: {}", failure.path.display(), failure.error);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Generate {
            config,
            root,
            output_dir,
            auto_relative,
            jobs,
            name,
            description,
        } => {
            let config = config::load_kit_config(&config)?
                .with_name(name)
                .with_description(description);
            let paths = scan::scan_library(&root, config.extensions())?;
            let jobs = jobs.unwrap_or_else(num_cpus::get);

            let (kit, summary) = match pipeline::generate(&config, &paths, jobs) {
                Ok(generated) => generated,
                Err(PipelineError::Feature { source, summary }) => {
                    print_failures(&summary);
                    println!("{}", summary);
                    return Err(source.into());
                }
                Err(e) => return Err(e.into()),
            };

            print_failures(&summary);
            if cli.verbose {
                println!("All found instruments:");
                for instrument in kit.instruments.values() {
                    println!("{}", export::instrument_xml(instrument));
                }
            }
            println!("{}", summary);

            match output_dir {
                Some(output_dir) => {
                    let root = auto_relative.then_some(root.as_path());
                    let drumkit = export::write_kit(&kit, &output_dir, root)?;
                    println!("Wrote kit to {}", drumkit.display());
                }
                None => println!("No output directory specified, exiting."),
            }
        }
        Commands::Check { config } => {
            let kit = Kit::load(&config)?;
            let resolved = kit.to_kit_config()?;

            println!("{}", kit.to_yaml()?);
            println!("Classifier: {}", resolved.classifier().name());
            if resolved.features().is_empty() {
                println!("No features configured.");
            } else {
                println!("Features (count: {}):", resolved.features().len());
                for feature in resolved.features() {
                    println!("- {}", feature);
                }
            }
        }
        Commands::Classify { config, paths } => {
            let config = config::load_kit_config(&config)?;
            for path in paths {
                match pipeline::classify_path(config.classifier(), &path) {
                    Ok(samples) if samples.is_empty() => {
                        println!("{}: no samples", path.display())
                    }
                    Ok(samples) => {
                        println!("{}:", path.display());
                        for sample in samples {
                            println!("- {}", sample);
                        }
                    }
                    Err(e) => println!("{}: {}", path.display(), e),
                }
            }
        }
        Commands::Classifiers {} => {
            println!("Classifiers:");
            for (name, description) in CLASSIFIERS {
                println!("- {}: {}", name, description);
            }
        }
    }

    Ok(())
}
