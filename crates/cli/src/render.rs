//! Terminal and JSON output for the CLI.
//!
//! JSON load errors are rendered with ariadne so the operator sees the
//! offending line of the catalog or settings file. Everything else is plain
//! text on stderr in pretty mode, or a JSON envelope on stdout.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use food_label_catalog::JsonCatalog;
use food_label_core::{LabelKind, ResolvedLabel};
use serde::Serialize;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable terminal output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pretty for terminals and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Source-annotated JSON errors ────────────────────────────────────────

/// Byte offset of a 1-based line/column position reported by serde_json.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Render a JSON syntax or shape error against its source text on stderr.
pub(crate) fn render_json_error(filename: &str, source: &str, err: &serde_json::Error) {
    let start = offset_of(source, err.line(), err.column());
    let end = (start + 1).min(source.len()).max(start);

    let report = Report::build(ReportKind::Error, (filename, start..end))
        .with_message(format!("cannot load {filename}"))
        .with_config(Config::default().with_compact(false))
        .with_label(
            Label::new((filename, start..end))
                .with_message(err.to_string())
                .with_color(Color::Red),
        )
        .finish();
    let mut cache = (filename, Source::from(source));
    report.eprint(&mut cache).ok();
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Report a command failure in the requested format.
///
/// Pretty mode writes the error chain to stderr; JSON mode writes an
/// envelope to stdout so scripted callers always get parseable output.
pub(crate) fn report_error(kind: &str, err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": kind,
                "message": format!("{err:#}"),
            });
            match serde_json::to_string_pretty(&out) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{out}"),
            }
        }
        Format::Pretty => {
            eprintln!("{}: {err:#}", "error".fg(Color::Red));
        }
    }
}

// ── Pretty renderers ────────────────────────────────────────────────────

/// Summary of a resolved label.
pub(crate) fn print_label(label: &ResolvedLabel) {
    let kind = match label.kind {
        LabelKind::Normal => label.kind.as_str().fg(Color::Green),
        LabelKind::Soup => label.kind.as_str().fg(Color::Cyan),
    };
    println!("code:        {}", label.code);
    println!("description: {}", label.description);
    println!("kind:        {kind}");
    println!("shelf life:  {} days", label.shelf_life_days);
    println!("expires:     {}", label.expiry_text());
    if let Some(batch) = &label.batch_code {
        println!("batch:       {batch}");
    }
    for line in &label.care_instructions {
        println!("  {line}");
    }
}

/// One line per material, ordered by code.
pub(crate) fn print_materials(catalog: &JsonCatalog) {
    let materials = catalog.list();
    let width = materials.iter().map(|m| m.code.len()).max().unwrap_or(4);
    for m in materials {
        let special = if m.special { "*" } else { " " };
        println!(
            "{:<width$}  {:>3}d{special}  {}  ({})",
            m.code, m.base_shelf_life_days, m.description, m.category
        );
    }
    eprintln!("{} materials (* = special)", catalog.len());
}

/// Installed printers, marking the configured one.
pub(crate) fn print_printers(printers: &[String], configured: Option<&str>) {
    if printers.is_empty() {
        eprintln!("no printers found");
        return;
    }
    for name in printers {
        if Some(name.as_str()) == configured {
            println!("{} {}", "*".fg(Color::Green), name);
        } else {
            println!("  {name}");
        }
    }
}
