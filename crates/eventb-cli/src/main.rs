//! The `eventb` binary: check, build, serve, and project utilities.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::diagnostic::{Diagnostic as ReportDiagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use colored::Colorize;

use eventb_analysis::Severity;
use eventb_compile::{compile_file, CompileError};
use eventb_syntax::SourceKind;

mod config;

use config::Config;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Event-B - compile machine and context files into Rodin artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a source file for problems
    Check {
        /// Path to the .bm or .bc file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output format
        #[arg(long, short, default_value = "text")]
        format: CheckFormat,
    },
    /// Compile source files into Rodin artifacts
    Build {
        /// A .bm/.bc file, or a directory to scan recursively
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Output directory (defaults to rodin-project under the root)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Start the Language Server
    Lsp,
    /// Scaffold a Rodin project directory
    New {
        /// Project name (letters, digits, underscores)
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Open the workspace in the Rodin IDE
    Rodin {
        /// Workspace directory (defaults to the current directory)
        #[arg(long)]
        workspace: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckFormat {
    /// Human-readable, source-annotated text
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {e:#}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check { file, format } => check_file(&file, format),
        Commands::Build { path, out } => build(&path, out.as_deref()),
        Commands::Lsp => {
            eventb_lsp::run_server().await;
            Ok(true)
        }
        Commands::New { name } => new_project(&name),
        Commands::Rodin { workspace } => open_in_rodin(workspace.as_deref()),
    }
}

fn check_file(path: &Path, format: CheckFormat) -> Result<bool> {
    let kind = SourceKind::from_path(path).ok_or_else(|| {
        anyhow::anyhow!(
            "{}: not an Event-B source file (expected .bm or .bc)",
            path.display()
        )
    })?;
    let source = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    let diagnostics = eventb_analysis::check(&source, kind);

    match format {
        CheckFormat::Json => {
            let report: Vec<_> = diagnostics
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "range": { "start": d.range.start, "end": d.range.end },
                        "severity": match d.severity {
                            Severity::Error => "error",
                            Severity::Warning => "warning",
                        },
                        "message": d.message,
                        "hint": d.hint,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Array(report))?
            );
        }
        CheckFormat::Text => {
            if diagnostics.is_empty() {
                println!("{} {}", "✓".green().bold(), path.display());
            } else {
                render_diagnostics(path, &source, &diagnostics)?;
            }
        }
    }

    Ok(!diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error))
}

fn render_diagnostics(
    path: &Path,
    source: &str,
    diagnostics: &[eventb_analysis::Diagnostic],
) -> Result<()> {
    let file = SimpleFile::new(path.display().to_string(), source);
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();

    for diagnostic in diagnostics {
        let start = (diagnostic.range.start as usize).min(source.len());
        let end = (diagnostic.range.end as usize).clamp(start, source.len());
        let mut report = match diagnostic.severity {
            Severity::Error => ReportDiagnostic::error(),
            Severity::Warning => ReportDiagnostic::warning(),
        }
        .with_message(diagnostic.message.clone())
        .with_labels(vec![Label::primary((), start..end)]);
        if let Some(hint) = &diagnostic.hint {
            report = report.with_notes(vec![format!("hint: {hint}")]);
        }
        term::emit(&mut writer.lock(), &config, &file, &report)?;
    }
    Ok(())
}

fn build(path: &Path, out: Option<&Path>) -> Result<bool> {
    let root = if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    };
    let config = Config::load(&root)?;
    let out_dir = out.map_or_else(|| root.join(config.output_dir()), Path::to_path_buf);

    let sources = collect_sources(path)?;
    if sources.is_empty() {
        eprintln!(
            "{}: no .bm or .bc files under {}",
            "error".red().bold(),
            path.display()
        );
        return Ok(false);
    }
    tracing::debug!(files = sources.len(), out = %out_dir.display(), "building");

    let mut all_ok = true;
    for source_path in sources {
        match compile_file(&source_path, &out_dir) {
            Ok(artifact) => {
                println!(
                    "{} {} → {}",
                    "✓".green().bold(),
                    source_path.display(),
                    artifact.display()
                );
            }
            Err(CompileError::Syntax(_)) => {
                // Re-validate to render the positioned diagnostics.
                if let Some(kind) = SourceKind::from_path(&source_path) {
                    let source = fs::read_to_string(&source_path).with_context(|| {
                        format!("Failed to read {}", source_path.display())
                    })?;
                    let diagnostics = eventb_analysis::check(&source, kind);
                    render_diagnostics(&source_path, &source, &diagnostics)?;
                }
                all_ok = false;
            }
            Err(error) => {
                eprintln!("{}: {error}", "error".red().bold());
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

fn collect_sources(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && SourceKind::from_path(entry.path()).is_some() {
            sources.push(entry.path().to_path_buf());
        }
    }
    Ok(sources)
}

fn new_project(name: &str) -> Result<bool> {
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        eprintln!(
            "{}: a project name must contain only letters, digits or underscores",
            "error".red().bold()
        );
        return Ok(false);
    }

    let directory = PathBuf::from(name);
    if directory.exists() {
        eprintln!("{}: {} already exists", "error".red().bold(), name);
        return Ok(false);
    }
    fs::create_dir(&directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;
    fs::write(directory.join(".project"), project_descriptor(name))
        .with_context(|| format!("Failed to write {}", directory.join(".project").display()))?;

    println!("{} created project {}", "✓".green().bold(), name);
    Ok(true)
}

/// The Rodin `.project` descriptor: the rodinbuilder build spec plus the
/// rodinnature marker.
fn project_descriptor(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<projectDescription>
    <name>{name}</name>
    <comment></comment>
    <projects></projects>
    <buildSpec>
        <buildCommand>
            <name>org.rodinp.core.rodinbuilder</name>
            <arguments></arguments>
        </buildCommand>
    </buildSpec>
    <natures>
        <nature>org.rodinp.core.rodinnature</nature>
    </natures>
</projectDescription>
"#
    )
}

fn open_in_rodin(workspace: Option<&Path>) -> Result<bool> {
    let directory = match workspace {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let config = Config::load(&directory)?;

    let mut child = std::process::Command::new(config.rodin_path())
        .arg("-data")
        .arg(&directory)
        .stderr(std::process::Stdio::piped())
        .spawn()
        .with_context(|| {
            format!(
                "failed to launch '{}'; make sure Rodin is installed and on the PATH, \
                 or set rodin_path in eventb.toml",
                config.rodin_path()
            )
        })?;

    // Surface the IDE's stderr: its own chatter mentions Rodin, anything
    // else is a launch problem.
    if let Some(stderr) = child.stderr.take() {
        for line in BufReader::new(stderr).lines() {
            let line = line?;
            if line.contains("Rodin") {
                println!("{} {line}", "info".blue().bold());
            } else {
                eprintln!("{} {line}", "error".red().bold());
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_descriptor_embeds_the_name() {
        let descriptor = project_descriptor("hello_world");
        assert!(descriptor.contains("<name>hello_world</name>"));
        assert!(descriptor.contains("org.rodinp.core.rodinbuilder"));
        assert!(descriptor.contains("org.rodinp.core.rodinnature"));
    }
}
