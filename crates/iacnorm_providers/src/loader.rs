//! File access and document parsing shared by the bundled providers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use iacnorm_core::{LoadError, LoadResult, NormalizedTree};

use crate::records::ResourceConfigs;

/// How strictly a source must match the provider's dialect.
///
/// Explicitly named files must match; files discovered while walking a
/// directory are skipped when they are valid documents of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Lenient,
}

/// Outcome of loading one source file.
pub enum FileOutcome {
    Loaded(ResourceConfigs),
    /// Parsed fine but is not a document of this dialect.
    Skipped(String),
}

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".terraform", "node_modules"];

/// Read a file that must exist and not be a directory.
pub fn read_source(path: &Path) -> LoadResult<String> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Case-insensitive suffix match on the file name.
pub fn has_suffix(path: &Path, suffixes: &[&str]) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return false,
    };
    suffixes.iter().any(|suffix| name.ends_with(suffix))
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.iter().any(|d| name == *d))
}

/// All files under `dir` with one of `suffixes`, in sorted walk order.
pub fn collect_files(dir: &Path, suffixes: &[&str]) -> LoadResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(LoadError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = entry.map_err(|e| LoadError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && has_suffix(entry.path(), suffixes) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} candidate file(s) in {:?}", files.len(), dir);
    Ok(files)
}

/// Load every matching file under `dir` and merge the records.
///
/// Fails with [`LoadError::NoIacFiles`] when no file contributed.
pub fn load_dir_with<F>(dir: &Path, suffixes: &[&str], load_one: F) -> LoadResult<NormalizedTree>
where
    F: Fn(&Path) -> LoadResult<FileOutcome>,
{
    let mut merged = ResourceConfigs::new();
    let mut loaded = 0usize;

    for file in collect_files(dir, suffixes)? {
        match load_one(&file)? {
            FileOutcome::Loaded(records) => {
                debug!("Loaded {} resource(s) from {:?}", records.len(), file);
                merged.merge(records);
                loaded += 1;
            }
            FileOutcome::Skipped(reason) => {
                debug!("Skipping {:?}: {}", file, reason);
            }
        }
    }

    if loaded == 0 {
        return Err(LoadError::NoIacFiles(dir.to_path_buf()));
    }
    merged.into_tree().map_err(|e| parse_error(dir, e))
}

/// Unwrap a single-file outcome; a skip is an error for a named file.
pub fn expect_loaded(path: &Path, outcome: FileOutcome) -> LoadResult<NormalizedTree> {
    match outcome {
        FileOutcome::Loaded(records) => records.into_tree().map_err(|e| parse_error(path, e)),
        FileOutcome::Skipped(reason) => Err(LoadError::Parse {
            path: path.to_path_buf(),
            message: reason,
        }),
    }
}

pub fn parse_error(path: &Path, message: impl std::fmt::Display) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

pub fn parse_json(path: &Path, content: &str) -> LoadResult<serde_json::Value> {
    serde_json::from_str(content).map_err(|e| parse_error(path, e))
}

/// Parse a YAML stream into JSON values, dropping empty documents.
///
/// Tagged nodes such as `!Ref name` become single-key objects
/// (`{"!Ref": "name"}`).
pub fn parse_yaml_documents(path: &Path, content: &str) -> LoadResult<Vec<serde_json::Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let yaml = serde_yaml::Value::deserialize(document).map_err(|e| parse_error(path, e))?;
        let json = serde_json::to_value(yaml).map_err(|e| parse_error(path, e))?;
        if !json.is_null() {
            documents.push(json);
        }
    }
    Ok(documents)
}

pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
