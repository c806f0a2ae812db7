//! Bytebpe CLI - learn, save, and load BPE models from the command line.
//!
//! Actions are evaluated in a fixed order: load, then learn, then save.

use anyhow::Result;
use bytebpe::ByteBpe;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bytebpe")]
#[command(about = "Learn a byte-pair encoding over whitespace-separated tokens", long_about = None)]
#[command(version, disable_help_flag = true)]
struct Cli {
    /// Produce this help message and exit with a nonzero status
    #[arg(long)]
    help: bool,

    /// Load a previously saved model from PATH
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Train on the corpus at PATH, clearing any loaded model
    #[arg(long, value_name = "PATH")]
    learn: Option<PathBuf>,

    /// Target vocabulary size for --learn
    #[arg(long, value_name = "N", default_value_t = 320)]
    vocab: usize,

    /// Save the current model to PATH
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    let mut model = ByteBpe::new();

    if let Some(path) = &cli.load {
        model.load(path, false)?;
        println!(
            "Loaded {} symbols from {}",
            model.vocab_size(),
            path.display()
        );
    }

    if let Some(path) = &cli.learn {
        println!("Learning BPE on: {}", path.display());
        model.learn(path, cli.vocab)?;
        println!("Learned {} symbols", model.vocab_size());
    }

    if let Some(path) = &cli.save {
        model.save(path)?;
        println!("Saved model to {}", path.display());
    }

    Ok(())
}
