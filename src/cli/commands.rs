//! Command implementations

use super::Args;
use crate::config::{self, parser, CliArgs};
use crate::core::Scanner;
use crate::error::{ErrorSeverity, PulseError, Result};
use crate::models::{ScanResult, Settings};
use crate::output::{
    create_formatter, create_progress_callback, create_writer, Formatter, OutputWriter,
    ProgressReporter,
};
use crate::watch::{ProjectWatcher, WatchHandle, WatchHandler};
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Scan once and print a report
    Scan(Args),
    /// Scan, then re-scan after every burst of changes
    Watch(Args),
    /// Write a default configuration file
    Init,
}

impl Command {
    pub fn from_args(args: Args) -> Self {
        if args.init {
            Command::Init
        } else if args.watch {
            Command::Watch(args)
        } else {
            Command::Scan(args)
        }
    }

    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Scan(args) => {
                let settings = load_settings(args)?;
                let scanner = Scanner::new(settings)?;
                let result = scan_with_reporter(&scanner)?;
                emit_report(scanner.settings(), &result)
            }
            Command::Watch(args) => {
                let settings = load_settings(args)?;
                let scanner = Scanner::new(settings.clone())?;
                let result = scan_with_reporter(&scanner)?;
                emit_report(&settings, &result)?;

                let handler = ReportingHandler::new(&settings);
                let handle = ProjectWatcher::spawn(scanner, handler)?;
                if !settings.quiet {
                    eprintln!(
                        "Watching {} (p = pause, r = resume, q = quit)",
                        settings.project_root.display()
                    );
                }
                drive_watch(&handle, io::stdin().lock());
                handle.stop();
                Ok(())
            }
            Command::Init => init_config(Path::new(parser::DEFAULT_CONFIG_FILE)),
        }
    }

    /// Run the command, printing any error, and return the process exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                exit_code(&err)
            }
        }
    }
}

/// Exit status for an error that reached the top level
pub fn exit_code(err: &PulseError) -> i32 {
    match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = config::load_config(CliArgs::from(args))?;
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn scan_with_reporter(scanner: &Scanner) -> Result<ScanResult> {
    let settings = scanner.settings();
    let reporter = Arc::new(ProgressReporter::new(settings.quiet, settings.show_progress));
    reporter.start(&format!("Scanning {}", settings.project_root.display()));

    let result = scanner.scan_with_progress(create_progress_callback(Arc::clone(&reporter)))?;

    reporter.finish(&format!("Analysed {} files", result.files.len()));
    Ok(result)
}

fn emit_report(settings: &Settings, result: &ScanResult) -> Result<()> {
    let report = create_formatter(settings).format(result)?;
    create_writer(settings.output_file.as_ref()).write(&report)
}

/// Write the default configuration unless a file already exists there
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(());
    }

    parser::create_default_config(path)?;
    info!(path = %path.display(), "created configuration file");
    println!("Created default configuration file at: {}", path.display());
    println!("Edit project_root, ignore and [thresholds] to suit the project.");
    Ok(())
}

/// Apply `p`/`r`/`q` commands read from `input` until quit or end of input
///
/// End of input leaves the watch running until the process is interrupted.
pub fn drive_watch(handle: &WatchHandle, input: impl BufRead) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "p" | "pause" => {
                handle.pause();
                eprintln!("Paused");
            }
            "r" | "resume" => {
                handle.resume();
                eprintln!("Resumed");
            }
            "q" | "quit" | "exit" => return,
            "" => {}
            other => eprintln!("Unknown command '{}' (p = pause, r = resume, q = quit)", other),
        }
    }
    loop {
        std::thread::park();
    }
}

/// Prints a fresh report after every re-scan
pub struct ReportingHandler {
    formatter: Box<dyn Formatter>,
    writer: Box<dyn OutputWriter>,
    verbose: bool,
    quiet: bool,
}

impl ReportingHandler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            formatter: create_formatter(settings),
            writer: create_writer(settings.output_file.as_ref()),
            verbose: settings.verbose,
            quiet: settings.quiet,
        }
    }

    fn note(&self, verb: &str, path: &Path) {
        if self.verbose {
            eprintln!("{} {}", verb, path.display());
        }
    }
}

impl WatchHandler for ReportingHandler {
    fn on_added(&mut self, path: &Path) {
        self.note("added", path);
    }

    fn on_changed(&mut self, path: &Path) {
        self.note("changed", path);
    }

    fn on_deleted(&mut self, path: &Path) {
        self.note("deleted", path);
    }

    fn on_scan_started(&mut self) {
        if !self.quiet {
            eprintln!("Re-scanning...");
        }
    }

    fn on_scan_complete(&mut self, result: &ScanResult) {
        let written = self
            .formatter
            .format(result)
            .and_then(|report| self.writer.write(&report));
        if let Err(err) = written {
            eprintln!("{}: {}", err.severity(), err.user_message());
        }
    }

    fn on_scan_failed(&mut self, error: &PulseError) {
        eprintln!("{}: {}", error.severity(), error.user_message());
    }
}
