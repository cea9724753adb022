//! Compilation of Event-B sources into Rodin document artifacts.
//!
//! The pipeline is a pure function per file: normalize the text, parse it
//! with the grammar for its kind, emit the ordered document tree, and
//! serialize it as XML. A syntax error aborts compilation of that file
//! only and never produces a partial artifact.
//!
//! # Example
//!
//! ```
//! use eventb_compile::compile_source;
//! use eventb_syntax::SourceKind;
//!
//! let artifact = compile_source("machine m\nend\n", SourceKind::Machine).unwrap();
//! assert_eq!(artifact.file_name, "m.bum");
//! assert!(artifact.xml.contains("org.eventb.core.machineFile"));
//! ```

pub mod document;
pub mod emit;
pub mod output;
pub mod xml;

use std::path::PathBuf;

use thiserror::Error;

use eventb_syntax::{normalize, parse_context, parse_machine, ParseError, SourceKind};

pub use document::Element;
pub use emit::{emit_context, emit_machine};
pub use output::{compile_file, write_artifact, OUTPUT_DIR};
pub use xml::to_xml;

/// Artifact extension for compiled machines.
pub const MACHINE_ARTIFACT_EXTENSION: &str = "bum";

/// Artifact extension for compiled contexts.
pub const CONTEXT_ARTIFACT_EXTENSION: &str = "buc";

/// Errors that abort compilation of a single source file.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The source text did not match its grammar.
    #[error(transparent)]
    Syntax(#[from] ParseError),
    /// The file's extension names no known source kind.
    #[error("{}: not an Event-B source file (expected .bm or .bc)", path.display())]
    UnsupportedPath {
        /// The offending path.
        path: PathBuf,
    },
    /// A file-system operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A serialized document ready to be written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The model name, taken from the source's `machine`/`context` header.
    pub model_name: String,
    /// Output file name: `<model-name>.<bum|buc>`.
    pub file_name: String,
    /// The serialized document.
    pub xml: String,
}

/// Compile one source text into its serialized document.
///
/// # Errors
///
/// Returns [`CompileError::Syntax`] when parsing fails. No partial
/// artifact is produced.
pub fn compile_source(source: &str, kind: SourceKind) -> Result<Artifact, CompileError> {
    let normalized = normalize(source);
    let (model_name, extension, root) = match kind {
        SourceKind::Machine => {
            let machine = parse_machine(normalized.text())?;
            let root = emit_machine(&machine);
            (machine.name, MACHINE_ARTIFACT_EXTENSION, root)
        }
        SourceKind::Context => {
            let context = parse_context(normalized.text())?;
            let root = emit_context(&context);
            (context.name, CONTEXT_ARTIFACT_EXTENSION, root)
        }
    };
    let file_name = format!("{model_name}.{extension}");
    Ok(Artifact {
        model_name,
        file_name,
        xml: to_xml(&root),
    })
}
