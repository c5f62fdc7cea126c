mod logging;
mod render;

use std::fmt;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use food_label_catalog::{CatalogFileError, JsonCatalog};
use food_label_core::markup::TIMESTAMP_FORMAT;
use food_label_core::{
    BatchCode, Clock, FixedClock, LabelError, LabelKind, MaterialRecord, ResolvedLabel, Resolver,
    Shift, SystemClock, generate, test_label,
};
use food_label_print_client::{
    PrintError, PrinterConfig, PrinterTarget, PrinterTimeouts, RetryConfig, open_printer,
    send_batch, system_directory,
};
use food_label_settings::{Settings, SettingsError};
use tracing::{info, warn};

use crate::render::{Format, print_json};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "food-label",
    version,
    about = "Resolve, preview, and print food-storage labels for Zebra printers"
)]
struct Cli {
    /// Output mode: "pretty" for terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Settings file. Defaults apply when the file does not exist.
    #[arg(long, global = true, default_value = "food-label.json")]
    settings: PathBuf,

    /// Material catalog file.
    #[arg(long, global = true, default_value = "materials.json")]
    catalog: PathBuf,

    /// Treat this moment ("dd/mm/YYYY HH:MM") as now, for production
    /// date and print timestamp.
    #[arg(long, global = true, value_parser = parse_timestamp)]
    at: Option<NaiveDateTime>,

    /// Log debug events to stderr (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Look a material up and show its classification and expiry.
    Resolve { code: String },

    /// Generate the label markup without printing it.
    Preview {
        code: String,
        #[command(flatten)]
        batch: BatchArgs,
        /// Write the markup to this file instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Generate the label markup and send it to the printer.
    Print {
        code: String,
        #[command(flatten)]
        batch: BatchArgs,
        /// Printer target, overriding the settings file.
        #[arg(long)]
        printer: Option<String>,
        /// Number of identical labels to print.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=100))]
        copies: u16,
    },

    /// Send the fixed self-test label to the printer.
    TestPrint {
        /// Printer target, overriding the settings file.
        #[arg(long)]
        printer: Option<String>,
    },

    /// List the printers installed on this machine.
    Printers,

    /// List the catalog, or register and remove materials.
    Materials {
        #[command(subcommand)]
        action: Option<MaterialsCmd>,
    },

    /// Show the effective settings.
    Settings {
        /// Save them to the settings file, filling in defaults.
        #[arg(long)]
        write: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MaterialsCmd {
    /// List every material, ordered by code (the default).
    List,

    /// Register a new material in the catalog file.
    Add {
        code: String,
        #[arg(long)]
        description: String,
        /// Shelf life in days.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=365))]
        days: u32,
        #[arg(long)]
        category: String,
        /// Eligible for the extended soup shelf life.
        #[arg(long)]
        special: bool,
    },

    /// Remove a material from the catalog file.
    Remove { code: String },
}

/// Batch code for soup labels, either whole or from its parts.
#[derive(Args, Debug, Default)]
struct BatchArgs {
    /// Complete batch code, e.g. 01M007.
    #[arg(long, conflicts_with_all = ["boiler", "shift", "lot"])]
    batch_code: Option<String>,
    /// Boiler number.
    #[arg(long, requires_all = ["shift", "lot"])]
    boiler: Option<String>,
    /// Production shift: M (manha), T (tarde), or N (noite).
    #[arg(long, requires_all = ["boiler", "lot"])]
    shift: Option<Shift>,
    /// Lot number.
    #[arg(long, requires_all = ["boiler", "shift"])]
    lot: Option<String>,
}

impl BatchArgs {
    fn batch_code(&self) -> Result<Option<String>> {
        if let Some(code) = &self.batch_code {
            return Ok(Some(code.clone()));
        }
        match (&self.boiler, self.shift, &self.lot) {
            (Some(boiler), Some(shift), Some(lot)) => {
                Ok(Some(BatchCode::new(boiler, shift, lot)?.to_string()))
            }
            _ => Ok(None),
        }
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| format!("expected dd/mm/YYYY HH:MM: {e}"))
}

/// A code absent from the catalog. Exits with status 2.
#[derive(Debug)]
struct MaterialNotFound(String);

impl fmt::Display for MaterialNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material not found: {}", self.0)
    }
}

impl std::error::Error for MaterialNotFound {}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match run(cli, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (kind, code) = classify_error(&err);
            render::report_error(kind, &err, format);
            ExitCode::from(code)
        }
    }
}

fn classify_error(err: &anyhow::Error) -> (&'static str, u8) {
    if err.downcast_ref::<MaterialNotFound>().is_some() {
        return ("material_not_found", 2);
    }
    if let Some(LabelError::MissingBatchCode { .. }) = err.downcast_ref::<LabelError>() {
        return ("missing_batch_code", 1);
    }
    if let Some(e) = err.downcast_ref::<PrintError>() {
        let kind = match e {
            PrintError::NoPrinterConfigured => "no_printer_configured",
            _ => "print_failed",
        };
        return (kind, 1);
    }
    match err.downcast_ref::<CatalogFileError>() {
        Some(CatalogFileError::DuplicateCode(_)) => return ("duplicate_material", 1),
        Some(CatalogFileError::InvalidMaterial { .. }) => return ("invalid_material", 1),
        Some(_) => return ("invalid_file", 1),
        None => {}
    }
    if err.downcast_ref::<SettingsError>().is_some() {
        return ("invalid_file", 1);
    }
    ("command_failed", 1)
}

fn run(cli: Cli, format: Format) -> Result<()> {
    let ctx = Session::load(&cli, format)?;

    match cli.cmd {
        Cmd::Resolve { code } => cmd_resolve(&ctx, &code),
        Cmd::Preview { code, batch, out } => cmd_preview(&ctx, &code, &batch, out.as_deref()),
        Cmd::Print {
            code,
            batch,
            printer,
            copies,
        } => cmd_print(&ctx, &code, &batch, printer.as_deref(), copies),
        Cmd::TestPrint { printer } => cmd_test_print(&ctx, printer.as_deref()),
        Cmd::Printers => cmd_printers(&ctx),
        Cmd::Materials { action } => match action.unwrap_or(MaterialsCmd::List) {
            MaterialsCmd::List => cmd_materials(&ctx),
            MaterialsCmd::Add {
                code,
                description,
                days,
                category,
                special,
            } => cmd_material_add(
                &ctx,
                MaterialRecord {
                    code,
                    description,
                    base_shelf_life_days: days,
                    category,
                    special,
                },
            ),
            MaterialsCmd::Remove { code } => cmd_material_remove(&ctx, &code),
        },
        Cmd::Settings { write } => cmd_settings(&ctx, write),
    }
}

// ── Shared state ────────────────────────────────────────────────────────

struct Session {
    format: Format,
    settings: Settings,
    settings_path: PathBuf,
    catalog_path: PathBuf,
    clock: FixedClock,
}

impl Session {
    fn load(cli: &Cli, format: Format) -> Result<Self> {
        let settings = load_settings(&cli.settings, format)?;
        Ok(Self {
            format,
            settings,
            settings_path: cli.settings.clone(),
            catalog_path: cli.catalog.clone(),
            clock: FixedClock(cli.at.unwrap_or_else(|| SystemClock.now())),
        })
    }

    fn catalog(&self) -> Result<JsonCatalog> {
        load_catalog(&self.catalog_path, self.format, false)
    }

    fn save_catalog(&self, catalog: &JsonCatalog) -> Result<()> {
        catalog
            .save(&self.catalog_path)
            .with_context(|| format!("cannot save catalog {}", self.catalog_path.display()))
    }

    /// Resolve `code` and attach the batch code, failing when absent.
    fn label(&self, code: &str, batch: &BatchArgs) -> Result<ResolvedLabel> {
        let catalog = self.catalog()?;
        let resolver = Resolver::new(&catalog, self.clock);
        let label = resolver
            .resolve(code)?
            .ok_or_else(|| MaterialNotFound(code.to_string()))?;

        match (label.kind, batch.batch_code()?) {
            (LabelKind::Soup, Some(batch_code)) => Ok(label.with_batch_code(batch_code)),
            (LabelKind::Normal, Some(_)) => {
                warn!(code, "batch code ignored for a normal label");
                Ok(label)
            }
            (_, None) => Ok(label),
        }
    }

    fn markup(&self, label: &ResolvedLabel) -> Result<String> {
        Ok(generate(label, &self.settings.layout, self.clock.now())?)
    }

    fn printer_target(&self, explicit: Option<&str>) -> Result<PrinterTarget> {
        let name = explicit
            .or(self.settings.printer_target())
            .ok_or(PrintError::NoPrinterConfigured)?;
        let target = PrinterTarget::parse(name)?;

        if let PrinterTarget::Queue(queue) = &target {
            match system_directory().list_printers() {
                Ok(installed) if !installed.iter().any(|p| p == queue) => {
                    warn!(%queue, ?installed, "printer is not in the installed list, trying anyway");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "cannot list installed printers"),
            }
        }
        Ok(target)
    }

    fn printer_config(&self) -> PrinterConfig {
        let transport = &self.settings.transport;
        PrinterConfig::new(
            PrinterTimeouts::new(transport.connect_timeout(), transport.write_timeout()),
            RetryConfig::with_attempts(transport.retry_attempts),
        )
    }

    fn send(&self, target: &PrinterTarget, markup: &str, copies: u16) -> Result<()> {
        let mut printer = open_printer(target, self.printer_config())?;
        let labels = vec![markup; usize::from(copies)];
        let result = send_batch(&mut *printer, &labels, |_| ControlFlow::Continue(()))
            .with_context(|| format!("printing to {target}"))?;
        info!(%target, sent = result.sent, "labels sent");
        Ok(())
    }
}

fn load_settings(path: &Path, format: Format) -> Result<Settings> {
    Settings::open_or_default(path)
        .inspect_err(|e| {
            if let SettingsError::InvalidJson(json) = e {
                show_json_error(path, json, format);
            }
        })
        .with_context(|| format!("cannot load settings {}", path.display()))
}

fn load_catalog(path: &Path, format: Format, missing_is_empty: bool) -> Result<JsonCatalog> {
    let loaded = if missing_is_empty {
        JsonCatalog::open_or_default(path)
    } else {
        JsonCatalog::open(path)
    };
    loaded
        .inspect_err(|e| {
            if let CatalogFileError::InvalidJson(json) = e {
                show_json_error(path, json, format);
            }
        })
        .with_context(|| format!("cannot load catalog {}", path.display()))
}

/// Point at the offending spot of a JSON file in pretty mode.
fn show_json_error(path: &Path, err: &serde_json::Error, format: Format) {
    if format != Format::Pretty {
        return;
    }
    match fs::read_to_string(path) {
        Ok(text) => render::render_json_error(&path.display().to_string(), &text, err),
        Err(e) => warn!(path = %path.display(), error = %e, "cannot re-read file for the error report"),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_resolve(ctx: &Session, code: &str) -> Result<()> {
    let label = ctx.label(code, &BatchArgs::default())?;
    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "label": label,
            "expiry": label.expiry_text(),
        })),
        Format::Pretty => {
            render::print_label(&label);
            Ok(())
        }
    }
}

fn cmd_preview(ctx: &Session, code: &str, batch: &BatchArgs, out: Option<&Path>) -> Result<()> {
    let label = ctx.label(code, batch)?;
    let markup = ctx.markup(&label)?;

    if let Some(path) = out {
        fs::write(path, &markup).with_context(|| format!("cannot write {}", path.display()))?;
        return match ctx.format {
            Format::Json => print_json(&serde_json::json!({
                "success": true,
                "code": label.code,
                "file": path.display().to_string(),
            })),
            Format::Pretty => {
                eprintln!("wrote {}", path.display());
                Ok(())
            }
        };
    }

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "code": label.code,
            "kind": label.kind,
            "markup": markup,
        })),
        Format::Pretty => {
            println!("{markup}");
            Ok(())
        }
    }
}

fn cmd_print(
    ctx: &Session,
    code: &str,
    batch: &BatchArgs,
    printer: Option<&str>,
    copies: u16,
) -> Result<()> {
    let label = ctx.label(code, batch)?;
    let markup = ctx.markup(&label)?;
    let target = ctx.printer_target(printer)?;
    ctx.send(&target, &markup, copies)?;

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "code": label.code,
            "printer": target.to_string(),
            "copies": copies,
        })),
        Format::Pretty => {
            eprintln!("printed {copies} x {} on {target}", label.code);
            Ok(())
        }
    }
}

fn cmd_test_print(ctx: &Session, printer: Option<&str>) -> Result<()> {
    let target = ctx.printer_target(printer)?;
    ctx.send(&target, &test_label(), 1)?;

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "printer": target.to_string(),
        })),
        Format::Pretty => {
            eprintln!("test label sent to {target}");
            Ok(())
        }
    }
}

fn cmd_printers(ctx: &Session) -> Result<()> {
    let printers = system_directory()
        .list_printers()
        .context("cannot list printers")?;
    let configured = ctx.settings.printer_target();

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "printers": printers,
            "configured": configured,
        })),
        Format::Pretty => {
            render::print_printers(&printers, configured);
            Ok(())
        }
    }
}

fn cmd_materials(ctx: &Session) -> Result<()> {
    let catalog = ctx.catalog()?;
    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "materials": catalog.list(),
        })),
        Format::Pretty => {
            render::print_materials(&catalog);
            Ok(())
        }
    }
}

fn cmd_material_add(ctx: &Session, record: MaterialRecord) -> Result<()> {
    let mut catalog = load_catalog(&ctx.catalog_path, ctx.format, true)?;
    let code = record.code.clone();
    catalog.add(record)?;
    ctx.save_catalog(&catalog)?;
    info!(%code, "material registered");

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "added": code,
            "materials": catalog.len(),
        })),
        Format::Pretty => {
            eprintln!("added {code} ({} materials)", catalog.len());
            Ok(())
        }
    }
}

fn cmd_material_remove(ctx: &Session, code: &str) -> Result<()> {
    let mut catalog = ctx.catalog()?;
    if catalog.remove(code).is_none() {
        return Err(MaterialNotFound(code.to_string()).into());
    }
    ctx.save_catalog(&catalog)?;
    info!(code, "material removed");

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "removed": code,
            "materials": catalog.len(),
        })),
        Format::Pretty => {
            eprintln!("removed {code} ({} materials)", catalog.len());
            Ok(())
        }
    }
}

fn cmd_settings(ctx: &Session, write: bool) -> Result<()> {
    if write {
        ctx.settings
            .save(&ctx.settings_path)
            .with_context(|| format!("cannot save settings {}", ctx.settings_path.display()))?;
        info!(path = %ctx.settings_path.display(), "settings saved");
    }

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "file": ctx.settings_path.display().to_string(),
            "written": write,
            "settings": ctx.settings,
        })),
        Format::Pretty => {
            println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
            if write {
                eprintln!("wrote {}", ctx.settings_path.display());
            }
            Ok(())
        }
    }
}
