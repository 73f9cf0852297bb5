//! CLI definition, tracing setup, and the refactor command.

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use disclose_core::discovery::discover_documents;
use disclose_core::pipeline::{self, ProgressReporter};
use disclose_shared::{
    AppConfig, DocumentOutcome, DocumentReport, RefactorConfig, RunReport, load_config,
    load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// disclose: split long skill documents into a concise summary plus references.
#[derive(Parser)]
#[command(
    name = "disclose",
    version,
    about = "Refactor long SKILL.md files into a concise primary document with reference files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Skill directory, SKILL.md file, or a root to search (defaults to `plugins`).
    pub path: Option<String>,

    /// Show what would be done without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Documents at or below this many lines are left alone.
    #[arg(long, value_name = "N")]
    pub min_lines: Option<usize>,

    /// Skip documents whose headings collide instead of keeping the last one.
    #[arg(long)]
    pub strict: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Config file (defaults to ~/.disclose/disclose.toml).
    #[arg(long, env = "DISCLOSE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// clean for the report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "disclose=info",
        1 => "disclose=debug",
        _ => "disclose=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the refactor over everything found under the requested path.
///
/// Per-document failures are part of the report, not an error exit.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let app_config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let path = cli
        .path
        .clone()
        .unwrap_or_else(|| app_config.defaults.path.clone());
    let config = refactor_config(&cli, &app_config);

    let dirs = discover_documents(Path::new(&path), &config.document_name)
        .wrap_err_with(|| format!("cannot search {path}"))?;
    info!(%path, found = dirs.len(), dry_run = config.dry_run, "starting run");

    let report = if cli.json {
        pipeline::run(&dirs, &config, &pipeline::SilentProgress)
    } else {
        println!("Found {} skills to analyze", dirs.len());
        println!("{}", rule());
        pipeline::run(&dirs, &config, &CliProgress::new())
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Merge CLI flags over the loaded config.
fn refactor_config(cli: &Cli, app_config: &AppConfig) -> RefactorConfig {
    let mut config = RefactorConfig::from(app_config);
    config.dry_run = cli.dry_run;
    config.strict = cli.strict;
    if let Some(min_lines) = cli.min_lines {
        config.eligibility.concise_max_lines = min_lines;
    }
    config
}

// ---------------------------------------------------------------------------
// Console output
// ---------------------------------------------------------------------------

fn rule() -> String {
    "=".repeat(80)
}

fn print_report(report: &RunReport) {
    for doc in &report.documents {
        for line in document_lines(doc) {
            println!("{line}");
        }
    }

    println!("{}", rule());
    println!("Refactored: {}", report.stats.refactored);
    println!("Skipped: {}", report.stats.skipped);
    println!("Errors: {}", report.stats.errors);
}

/// Console lines for one document. Skipped documents print nothing.
fn document_lines(doc: &DocumentReport) -> Vec<String> {
    let dir = doc.path.display();

    if let Some(error) = &doc.error {
        return vec![format!("ERROR: {dir}: {error}")];
    }

    match &doc.outcome {
        Some(DocumentOutcome::WouldRefactor {
            original_lines,
            new_lines,
            sections,
        }) => vec![
            format!("Would refactor: {dir}"),
            format!("  Lines: {original_lines} → {new_lines}"),
            format!("  Sections: {}", sections.join(", ")),
        ],
        Some(DocumentOutcome::Refactored {
            original_lines,
            new_lines,
            references,
        }) => {
            let mut lines = vec![
                format!("Refactored: {dir}"),
                format!("  Lines: {original_lines} → {new_lines}"),
            ];
            if !references.is_empty() {
                let names: Vec<_> = references.iter().map(|r| r.filename.as_str()).collect();
                lines.push(format!("  Created: {}", names.join(", ")));
            }
            lines
        }
        Some(DocumentOutcome::Skipped { .. }) | None => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn started(&self, total: usize) {
        self.spinner.set_message(format!("Analyzing {total} skills"));
    }

    fn document_started(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {}", path.display()));
    }

    fn document_finished(&self, report: &DocumentReport) {
        let label = match (&report.outcome, &report.error) {
            (_, Some(_)) => "failed".to_string(),
            (Some(DocumentOutcome::Skipped { reason }), None) => format!("skipped ({reason})"),
            (Some(_), None) => "done".to_string(),
            (None, None) => String::new(),
        };
        self.spinner
            .set_message(format!("{} {label}", report.path.display()));
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disclose_shared::{SkipReason, WrittenFile};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("disclose").chain(args.iter().copied()))
    }

    #[test]
    fn parses_flags() {
        let cli = cli(&["skills/pdf", "--dry-run", "--min-lines", "120", "--strict", "-vv"]);
        assert_eq!(cli.path.as_deref(), Some("skills/pdf"));
        assert!(cli.dry_run);
        assert!(cli.strict);
        assert!(!cli.json);
        assert_eq!(cli.min_lines, Some(120));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn min_lines_overrides_concise_threshold_only() {
        let app = AppConfig::default();

        let config = refactor_config(&cli(&[]), &app);
        assert_eq!(config.eligibility.concise_max_lines, 100);
        assert_eq!(config.eligibility.optimized_max_lines, 150);
        assert!(!config.dry_run);

        let config = refactor_config(&cli(&["--min-lines", "40", "--dry-run"]), &app);
        assert_eq!(config.eligibility.concise_max_lines, 40);
        assert_eq!(config.eligibility.optimized_max_lines, 150);
        assert!(config.dry_run);
    }

    #[test]
    fn refactored_lines() {
        let doc = DocumentReport {
            path: PathBuf::from("plugins/pdf"),
            outcome: Some(DocumentOutcome::Refactored {
                original_lines: 240,
                new_lines: 61,
                references: vec![
                    WrittenFile {
                        filename: "errors.md".into(),
                        sha256: String::new(),
                        size_bytes: 0,
                    },
                    WrittenFile {
                        filename: "examples.md".into(),
                        sha256: String::new(),
                        size_bytes: 0,
                    },
                ],
            }),
            error: None,
        };

        assert_eq!(
            document_lines(&doc),
            vec![
                "Refactored: plugins/pdf",
                "  Lines: 240 → 61",
                "  Created: errors.md, examples.md"
            ]
        );
    }

    #[test]
    fn error_and_skip_lines() {
        let failed = DocumentReport {
            path: PathBuf::from("plugins/x"),
            outcome: None,
            error: Some("permission denied".into()),
        };
        assert_eq!(document_lines(&failed), vec!["ERROR: plugins/x: permission denied"]);

        let skipped = DocumentReport {
            path: PathBuf::from("plugins/y"),
            outcome: Some(DocumentOutcome::Skipped {
                reason: SkipReason::AlreadyConcise,
            }),
            error: None,
        };
        assert!(document_lines(&skipped).is_empty());
    }
}
