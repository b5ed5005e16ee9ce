use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pathseq::{Grammar, LoosePathSequence, Mode, PathSequence, SequencePath};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pathseq")]
#[command(about = "Parse, expand and scan file sequence strings", long_about = None)]
struct Cli {
    /// Log parser decisions to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a name parses
    Validate {
        /// Sequence name, e.g. render.1-100####.exr
        name: String,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,
    },
    /// Print a name back in canonical form
    Fmt {
        /// Sequence name
        name: String,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,

        /// Rewrite each dimension into its fewest progressions
        #[arg(short, long)]
        normalize: bool,
    },
    /// Show the parsed structure of a name
    Ast {
        /// Sequence name
        name: String,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,

        /// Output format (json or debug)
        #[arg(long, default_value = "debug")]
        format: String,
    },
    /// List every file path of a sequence
    Expand {
        /// Sequence path, e.g. shots/render.1-10#.exr
        path: PathBuf,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,

        /// Output format (json or debug)
        #[arg(long, default_value = "debug")]
        format: String,
    },
    /// Print a glob pattern matching the files of a sequence
    Glob {
        /// Sequence name
        name: String,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,
    },
    /// Print a regular expression matching the files of a sequence
    Regex {
        /// Sequence name
        name: String,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,
    },
    /// Rebuild a sequence from the files present on disk
    Scan {
        /// Sequence path; the ranges written in it are ignored
        path: PathBuf,

        /// Use the loose grammar
        #[arg(long)]
        loose: bool,
    },
}

fn mode(loose: bool) -> Mode {
    if loose {
        Mode::Loose
    } else {
        Mode::Strict
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { name, loose } => match pathseq::parse(&name, mode(loose)) {
            Ok(parsed) => {
                println!("✓ Sequence is valid ({})", parsed.shape());
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Fmt { name, loose, normalize } => match pathseq::parse(&name, mode(loose)) {
            Ok(parsed) => {
                let parsed = if normalize { parsed.normalized() } else { parsed };
                println!("{}", parsed);
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Ast { name, loose, format } => match pathseq::parse(&name, mode(loose)) {
            Ok(parsed) => {
                match format.as_str() {
                    "json" => {
                        let json = serde_json::to_string_pretty(&parsed)?;
                        println!("{}", json);
                    }
                    _ => {
                        println!("{:#?}", parsed);
                    }
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Expand { path, loose, format } => {
            if loose {
                expand::<pathseq::LooseGrammar>(&path, &format)
            } else {
                expand::<pathseq::StrictGrammar>(&path, &format)
            }
        }
        Commands::Glob { name, loose } => match pathseq::parse(&name, mode(loose)) {
            Ok(parsed) => {
                println!("{}", parsed.as_glob()?);
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Regex { name, loose } => match pathseq::parse(&name, mode(loose)) {
            Ok(parsed) => {
                println!("{}", parsed.as_regex()?);
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Scan { path, loose } => {
            let found = if loose {
                scan(LoosePathSequence::new(&path))?
            } else {
                scan(PathSequence::new(&path))?
            };
            println!("{}", found);
            Ok(())
        }
    }
}

#[derive(Serialize)]
#[serde(bound = "")]
struct ExpandReport<'a, G: Grammar> {
    sequence: &'a SequencePath<G>,
    files: &'a [PathBuf],
}

fn expand<G: Grammar>(path: &Path, format: &str) -> Result<()> {
    let seq = match SequencePath::<G>::new(path) {
        Ok(seq) => seq,
        Err(e) => {
            eprintln!("✗ Parse error: {}", e);
            std::process::exit(1);
        }
    };
    let paths: Vec<PathBuf> = seq
        .paths()
        .with_context(|| format!("Failed to expand '{}'", path.display()))?
        .collect();

    match format {
        "json" => {
            let report = ExpandReport {
                sequence: &seq,
                files: &paths,
            };
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            println!("Files: {}", paths.len());
            for path in &paths {
                println!("  {}", path.display());
            }
        }
    }
    Ok(())
}

fn scan<G: Grammar>(seq: pathseq::Result<SequencePath<G>>) -> Result<String> {
    let seq = match seq {
        Ok(seq) => seq,
        Err(e) => {
            eprintln!("✗ Parse error: {}", e);
            std::process::exit(1);
        }
    };
    let found = seq
        .with_existing_paths()
        .with_context(|| format!("Failed to scan for '{}'", seq))?;
    Ok(found.to_string())
}
