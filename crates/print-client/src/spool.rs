//! OS print spooler transport and printer directory.
//!
//! Jobs are submitted as raw data so the spooler passes the markup to the
//! printer untouched.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{FallbackPrinter, PrintError, Printer, PrinterDirectory};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delivery {
    /// Markup is written to the command's standard input.
    Stdin,
    /// Markup is written to a temporary file whose path is appended to the
    /// arguments.
    File,
}

/// Submits jobs to an OS print queue by running a spooler command.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    queue: String,
    program: String,
    args: Vec<String>,
    delivery: Delivery,
}

impl SpoolPrinter {
    /// CUPS `lp -d <queue> -o raw`, markup on stdin.
    pub fn lp(queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            args: vec!["-d".into(), queue.clone(), "-o".into(), "raw".into()],
            queue,
            program: "lp".into(),
            delivery: Delivery::Stdin,
        }
    }

    /// BSD-style `lpr -P <queue> -o raw`, markup on stdin.
    pub fn lpr(queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            args: vec!["-P".into(), queue.clone(), "-o".into(), "raw".into()],
            queue,
            program: "lpr".into(),
            delivery: Delivery::Stdin,
        }
    }

    /// Windows `copy /B <file> \\localhost\<queue>` through `cmd`.
    pub fn windows_share(queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            args: vec!["/C".into(), "copy".into(), "/B".into()],
            queue,
            program: "cmd".into(),
            delivery: Delivery::File,
        }
    }

    /// Run an arbitrary command and write the markup to its stdin.
    pub fn command<I, S>(queue: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: queue.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            delivery: Delivery::Stdin,
        }
    }

    /// Spooler commands for the current platform, tried in order.
    pub fn for_platform(queue: &str) -> FallbackPrinter {
        let mut chain = FallbackPrinter::new();
        if cfg!(windows) {
            chain.push(Self::windows_share(queue));
        } else {
            chain.push(Self::lp(queue));
            chain.push(Self::lpr(queue));
        }
        chain
    }

    /// Queue the jobs are submitted to.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    fn submit_stdin(&self, data: &[u8]) -> Result<Output, PrintError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_failed(source))?;

        // Dropping the handle closes the pipe before waiting.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(data),
            None => Ok(()),
        };
        let output = child
            .wait_with_output()
            .map_err(|source| self.spawn_failed(source))?;

        match written {
            // A spooler that exits early reports its own failure on stderr.
            Err(_) if !output.status.success() => Ok(output),
            Err(e) => Err(PrintError::WriteFailed(e)),
            Ok(()) => Ok(output),
        }
    }

    fn submit_file(&self, data: &[u8]) -> Result<Output, PrintError> {
        // Removed when `job` is dropped.
        let mut job = tempfile::Builder::new()
            .prefix("food-label-")
            .suffix(".zpl")
            .tempfile()
            .map_err(PrintError::WriteFailed)?;
        write_job(&mut job, data).map_err(PrintError::WriteFailed)?;

        let share = format!(r"\\localhost\{}", self.queue);
        Command::new(&self.program)
            .args(&self.args)
            .arg(job.path())
            .arg(&share)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| self.spawn_failed(source))
    }

    fn spawn_failed(&self, source: std::io::Error) -> PrintError {
        PrintError::SpawnFailed {
            program: self.program.clone(),
            source,
        }
    }
}

impl Printer for SpoolPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        let output = match self.delivery {
            Delivery::Stdin => self.submit_stdin(data)?,
            Delivery::File => self.submit_file(data)?,
        };

        if !output.status.success() {
            return Err(PrintError::SpoolerFailed {
                program: self.program.clone(),
                queue: self.queue.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!(program = %self.program, queue = %self.queue, bytes = data.len(), "job spooled");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} {}", self.program, self.queue)
    }
}

fn write_job(job: &mut NamedTempFile, data: &[u8]) -> std::io::Result<()> {
    job.write_all(data)?;
    job.flush()
}

// ── Printer directory ───────────────────────────────────────────────────

/// Lists CUPS queues with `lpstat -p`.
#[derive(Debug, Clone, Default)]
pub struct LpstatDirectory;

impl PrinterDirectory for LpstatDirectory {
    fn list_printers(&self) -> Result<Vec<String>, PrintError> {
        let stdout = run_listing("lpstat", &["-p"])?;
        Ok(parse_lpstat(&stdout))
    }
}

/// Lists Windows queues with PowerShell `Get-Printer`.
#[derive(Debug, Clone, Default)]
pub struct WindowsDirectory;

impl PrinterDirectory for WindowsDirectory {
    fn list_printers(&self) -> Result<Vec<String>, PrintError> {
        let stdout = run_listing(
            "powershell",
            &["-NoProfile", "-Command", "Get-Printer | ForEach-Object Name"],
        )?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Directory for the current platform.
pub fn system_directory() -> Box<dyn PrinterDirectory> {
    if cfg!(windows) {
        Box::new(WindowsDirectory)
    } else {
        Box::new(LpstatDirectory)
    }
}

/// Extract queue names from `lpstat -p` output.
///
/// Each queue is reported on a line starting with `printer <name>`.
pub fn parse_lpstat(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("printer "))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn run_listing(program: &str, args: &[&str]) -> Result<String, PrintError> {
    let output = Command::new(program)
        .args(args)
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .output()
        .map_err(|source| PrintError::SpawnFailed {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(PrintError::SpoolerFailed {
            program: program.to_string(),
            queue: String::new(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
