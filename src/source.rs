//! Where documents come from: a single markdown file or a notes directory.
//!
//! A directory lists its own markdown files plus those of its immediate
//! sub-directories (one level, like a Logseq graph's `pages/` and
//! `journals/`). Entries are named by their path relative to the directory.

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// What the user pointed foldmap at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Directory(PathBuf),
}

/// One listed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Display name: `file.md` or `subdir/file.md`
    pub name: String,
    pub path: PathBuf,
    /// Sub-directory the document lives in, if any
    pub group: Option<String>,
}

impl DocumentSource {
    /// Classify `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the path does not exist or cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if metadata.is_dir() {
            Ok(DocumentSource::Directory(path.to_path_buf()))
        } else {
            Ok(DocumentSource::File(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DocumentSource::File(path) | DocumentSource::Directory(path) => path,
        }
    }

    /// List the documents of this source, sorted by name.
    ///
    /// A file source always lists exactly that file, whatever its extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDocuments`] when a directory holds no markdown, or
    /// [`Error::Io`] when it cannot be listed.
    pub fn documents(&self, config: &SourceConfig) -> Result<Vec<DocumentEntry>> {
        match self {
            DocumentSource::File(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                Ok(vec![DocumentEntry {
                    name,
                    path: path.clone(),
                    group: None,
                }])
            }
            DocumentSource::Directory(root) => {
                let mut entries = Vec::new();
                for (path, is_dir) in list_dir(root)? {
                    let file_name = file_name_of(&path);
                    if is_dir {
                        if file_name.starts_with('.') {
                            trace!(dir = %path.display(), "skipping hidden directory");
                            continue;
                        }
                        collect_group(&path, &file_name, config, &mut entries)?;
                    } else if is_markdown(&file_name, config) {
                        entries.push(DocumentEntry {
                            name: file_name,
                            path,
                            group: None,
                        });
                    }
                }

                if entries.is_empty() {
                    return Err(Error::NoDocuments(root.clone()));
                }
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                debug!(dir = %root.display(), count = entries.len(), "listed documents");
                Ok(entries)
            }
        }
    }
}

fn collect_group(
    dir: &Path,
    group: &str,
    config: &SourceConfig,
    entries: &mut Vec<DocumentEntry>,
) -> Result<()> {
    for (path, is_dir) in list_dir(dir)? {
        let file_name = file_name_of(&path);
        if !is_dir && is_markdown(&file_name, config) {
            entries.push(DocumentEntry {
                name: format!("{group}/{file_name}"),
                path,
                group: Some(group.to_string()),
            });
        }
    }
    Ok(())
}

fn list_dir(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let read = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut items = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        items.push((entry.path(), is_dir));
    }
    Ok(items)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether a directory entry counts as a document: a configured markdown
/// extension, and no `readme` anywhere in the name unless READMEs are
/// included.
pub fn is_markdown(file_name: &str, config: &SourceConfig) -> bool {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    let known = config
        .extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext));
    known && (config.include_readme || !file_name.to_lowercase().contains("readme"))
}

/// Find a document by display name.
///
/// Accepts the exact name, the name without its extension, or a
/// percent-encoded form of either (as in `#user/page%20name` routes).
pub fn find_document(entries: &[DocumentEntry], wanted: &str) -> Result<usize> {
    let decoded = urlencoding::decode(wanted)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| wanted.to_string());
    let wanted = decoded.trim_start_matches("./");

    entries
        .iter()
        .position(|entry| entry.name == wanted)
        .or_else(|| {
            entries.iter().position(|entry| {
                entry
                    .name
                    .rsplit_once('.')
                    .is_some_and(|(stem, _)| stem == wanted)
            })
        })
        .ok_or_else(|| Error::UnknownDocument(wanted.to_string()))
}

/// Read a document's text.
pub fn read_document(entry: &DocumentEntry) -> Result<String> {
    fs::read_to_string(&entry.path).map_err(|e| Error::io(&entry.path, e))
}
