//! # foldmap
//!
//! A terminal mind-map viewer for Logseq-flavored markdown outlines.
//!
//! ## Usage
//!
//! Browse a notes directory:
//! ```sh
//! foldmap ~/logseq
//! ```
//!
//! Print an outline with two levels revealed:
//! ```sh
//! foldmap --tree --keys 3 pages/idea.md
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::Cli;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use foldmap::Config;
use foldmap::logging::{self, LogConfig};
use foldmap::source::{DocumentSource, find_document, read_document};
use foldmap::tui::{self, App};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let _log_guard = logging::init(LogConfig {
        log_file_path: args.log_file.clone(),
        stderr: args.is_headless(),
    })
    .map_err(|e| eyre!("failed to initialize logging: {e}"))?;

    let config = Config::load_from(args.config.as_deref())?;

    let source = DocumentSource::open(&args.path)?;
    let documents = source.documents(&config.source)?;
    let initial = match args.doc.as_deref() {
        Some(name) => find_document(&documents, name)?,
        None => 0,
    };
    info!(
        source = %source.path().display(),
        documents = documents.len(),
        "starting foldmap"
    );

    if args.is_headless() {
        let entry = &documents[initial];
        let text = read_document(entry)?;
        let output = if args.normalize {
            cli::normalized_output(&text, &entry.name)
        } else {
            cli::tree_output(&text, &entry.name, args.keys.as_deref(), args.output)?
        };
        print!("{output}");
        return Ok(());
    }

    let keybindings = config.keybindings()?;
    let app = App::new(config, keybindings, documents, initial);
    tui::run_app(app)
}
