//! wikify - batch entity tagging and encyclopedia linking.
//!
//! Runs the full pipeline over a corpus directory: noun extraction, entity
//! classification, sense disambiguation, category resolution, Wikipedia
//! lookup, and `.ent` output files. The resolved category-tag map is printed
//! to stdout, one `form<TAB>code` line per tagged surface form.
//!
//! # Usage
//!
//! ```bash
//! # Heuristic tagger, WordNet under ./dict
//! wikify corpus/ --wordnet dict/
//!
//! # With the Stanford classifier
//! wikify corpus/ --wordnet dict/ \
//!     --ner-model classifiers/english.all.3class.distsim.crf.ser.gz \
//!     --ner-jar stanford-ner.jar
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use wikify::{Pipeline, PipelineConfig};

/// Annotate a tokenized corpus with entity categories and Wikipedia links.
#[derive(Parser)]
#[command(name = "wikify", author, version)]
#[command(about = "Annotate a tokenized corpus with entity categories and Wikipedia links")]
struct Cli {
    /// Corpus root, searched recursively for *.tok.off.pos and *.raw files.
    root: PathBuf,

    /// WordNet dict directory (index.noun, data.noun, optionally noun.exc).
    #[arg(long, value_name = "DIR")]
    wordnet: PathBuf,

    /// Serialized Stanford CRF classifier; requires --ner-jar.
    #[arg(long, value_name = "PATH", requires = "ner_jar")]
    ner_model: Option<PathBuf>,

    /// Stanford NER jar; requires --ner-model.
    #[arg(long, value_name = "PATH", requires = "ner_model")]
    ner_jar: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wikify: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> wikify::Result<()> {
    let mut config = PipelineConfig::new(&cli.root, &cli.wordnet);
    if let (Some(model), Some(jar)) = (&cli.ner_model, &cli.ner_jar) {
        config = config.with_tagger(model, jar);
    }

    let annotations = Pipeline::from_config(config)?.run()?;

    for (form, code) in &annotations.tags {
        println!("{form}\t{code}");
    }
    log::info!(
        "wrote {} annotated files, {} links",
        annotations.outputs.len(),
        annotations.links.len()
    );
    Ok(())
}
