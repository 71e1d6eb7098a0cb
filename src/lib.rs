//! # foldmap
//!
//! Mind maps of markdown outlines, navigated with single-key fold commands.
//!
//! Logseq pages are first normalized into plain markdown
//! ([`parser::dialect`]), then parsed into a [`MindMap`] whose nodes carry a
//! typed fold flag. Keyboard [`Command`](mindmap::command::Command)s change
//! which subtrees are visible and drive a [`View`](mindmap::command::View),
//! the terminal one living in [`tui`].
//!
//! ## Example
//!
//! ```rust
//! use foldmap::mindmap::command::{Command, DetachedView, dispatch};
//! use foldmap::parser::build_mind_map;
//!
//! let page = "- Projects\n  - foldmap\n  - notes\n- Reading";
//! let mut map = build_mind_map(Some(page), "Inbox.md").unwrap();
//!
//! // a page without headings gets a folded title
//! assert_eq!(map.visible_count(), 1);
//!
//! dispatch(Command::UnfoldAll, Some(&mut map), &mut DetachedView);
//! assert_eq!(map.visible_count(), 5);
//!
//! dispatch(Command::ShowLevel(2), Some(&mut map), &mut DetachedView);
//! println!("{}", map.render_box_tree());
//! ```

/// Configuration file: UI limits, document filtering, theme and keys.
pub mod config;

pub mod error;

/// Keybindings module for customizable shell keys.
///
/// Fold and zoom keys are fixed; everything else can be rebound in the
/// configuration file.
pub mod keybindings;

pub mod logging;

/// Tree model, visibility controller and keyboard command language.
pub mod mindmap;

/// Dialect normalization and markdown-to-tree parsing.
pub mod parser;

pub mod session;

pub mod source;

/// Interactive terminal interface.
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};
pub use mindmap::{MindMap, TreeNode};
pub use parser::{build_mind_map, parse_file, parse_markdown};
pub use session::Visualization;
