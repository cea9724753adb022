//! Artifact writing.

use std::fs;
use std::path::{Path, PathBuf};

use eventb_syntax::SourceKind;

use crate::{compile_source, Artifact, CompileError};

/// Default output subdirectory for compiled artifacts.
pub const OUTPUT_DIR: &str = "rodin-project";

/// Write an artifact into `directory`, creating the directory if absent.
///
/// The write is all-or-nothing: the document lands in a staging file inside
/// the target directory and is renamed into place, so a partially written
/// artifact is never visible under the final name.
///
/// # Errors
///
/// Returns [`CompileError::Io`] when the directory cannot be created or the
/// file cannot be written.
pub fn write_artifact(directory: &Path, artifact: &Artifact) -> Result<PathBuf, CompileError> {
    fs::create_dir_all(directory).map_err(|error| CompileError::Io {
        path: directory.to_path_buf(),
        source: error,
    })?;

    let path = directory.join(&artifact.file_name);
    let staging = directory.join(format!(".{}.tmp", artifact.file_name));
    fs::write(&staging, &artifact.xml).map_err(|error| CompileError::Io {
        path: staging.clone(),
        source: error,
    })?;
    fs::rename(&staging, &path).map_err(|error| CompileError::Io {
        path: path.clone(),
        source: error,
    })?;

    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(path)
}

/// Compile one source file and write its artifact into `directory`.
///
/// # Errors
///
/// Returns [`CompileError::UnsupportedPath`] for non-Event-B extensions,
/// [`CompileError::Syntax`] when parsing fails (nothing is written), and
/// [`CompileError::Io`] for read or write failures.
pub fn compile_file(source_path: &Path, directory: &Path) -> Result<PathBuf, CompileError> {
    let kind =
        SourceKind::from_path(source_path).ok_or_else(|| CompileError::UnsupportedPath {
            path: source_path.to_path_buf(),
        })?;

    tracing::info!(file = %source_path.display(), "compiling");
    let source = fs::read_to_string(source_path).map_err(|error| CompileError::Io {
        path: source_path.to_path_buf(),
        source: error,
    })?;

    let artifact = compile_source(&source, kind)?;
    write_artifact(directory, &artifact)
}
