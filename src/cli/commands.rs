use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "foldmap")]
#[command(version)]
#[command(about = "A terminal mind-map viewer for markdown outlines")]
#[command(
    long_about = "foldmap - Browse markdown outlines (Logseq pages, notes, READMEs) as a mind map.\n\n\
    Headings start folded. Single keys fold and reveal the tree: ',' unfolds everything,\n\
    '1' folds everything, '2'-'7' show that many levels, '9' hides everything below the\n\
    root, '=' '-' zoom and '0' fits the map to the window.\n\n\
    Examples:\n  \
    foldmap notes.md                  # Open one document\n  \
    foldmap ~/logseq                  # Browse a directory (and its sub-directories)\n  \
    foldmap ~/logseq --doc pages/idea # Open a specific document of a directory\n  \
    foldmap --normalize page.md       # Print the normalized markdown\n  \
    foldmap --tree --keys 3 page.md   # Print the outline after pressing '3'"
)]
pub struct Cli {
    /// Markdown file or directory of markdown files
    ///
    /// A directory lists its markdown files and those of its immediate
    /// sub-directories. README files are skipped unless enabled in the config.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Document to open first when PATH is a directory
    ///
    /// Accepts the listed name with or without extension, percent-encoded or
    /// not, e.g. `pages/My%20Page` or `journals/2024_01_01.md`.
    #[arg(short = 'd', long = "doc", value_name = "NAME")]
    pub doc: Option<String>,

    /// Print the normalized markdown and exit (non-interactive)
    #[arg(long = "normalize", conflicts_with = "tree")]
    pub normalize: bool,

    /// Print the outline with its fold state and exit (non-interactive)
    ///
    /// Folded nodes hide their children and are marked with [+].
    #[arg(long = "tree")]
    pub tree: bool,

    /// Command keys to replay before printing the tree
    ///
    /// Example: --keys ",3" unfolds everything, then shows two levels.
    #[arg(long = "keys", value_name = "KEYS", requires = "tree")]
    pub keys: Option<String>,

    /// Output format for --tree
    #[arg(short = 'o', long = "output", value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log file (or directory for per-process log files)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether this run prints and exits instead of opening the TUI.
    pub fn is_headless(&self) -> bool {
        self.normalize || self.tree
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawing tree
    Plain,
    /// The tree as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["foldmap"]);
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.output, OutputFormat::Plain);
        assert!(!cli.is_headless());
    }

    #[test]
    fn test_tree_with_keys() {
        let cli = Cli::parse_from(["foldmap", "--tree", "--keys", ",3", "-o", "json", "notes"]);
        assert!(cli.is_headless());
        assert_eq!(cli.keys.as_deref(), Some(",3"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.path, PathBuf::from("notes"));
    }

    #[test]
    fn test_keys_require_tree() {
        assert!(Cli::try_parse_from(["foldmap", "--keys", "1"]).is_err());
        assert!(Cli::try_parse_from(["foldmap", "--normalize", "--tree"]).is_err());
    }
}
