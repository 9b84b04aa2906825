use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use transcheck::config::{resolve_base_ref, CheckConfig, OutputFormat, Platform};
use transcheck::parsers::ResourceFormat;
use transcheck::protocol;
use transcheck::services::checker::Checker;
use transcheck::services::extraction::{self, ExtractionVerifier};
use transcheck::services::git::{self, GitSnapshots};
use transcheck::services::locator::{find_locations, find_source_string_files};
use transcheck::services::report;

#[derive(Parser)]
#[command(name = "transcheck", version, about = "Find untranslated strings in changed localization files")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff a git checkout against its base branch and report missing translations.
    Check(RunArgs),
    /// Check that localized keys added or edited in Swift sources made it into the string files.
    VerifyExtraction(RunArgs),
    /// Answer JSON-line requests on stdin.
    Serve,
}

#[derive(Args)]
struct RunArgs {
    /// Target platform (iOS or macOS).
    #[arg(long)]
    platform: Platform,
    /// Repository root.
    #[arg(long, default_value = ".")]
    repo: PathBuf,
    /// Base ref to diff against. Defaults to origin/$GITHUB_BASE_REF, then origin/main.
    #[arg(long)]
    base: Option<String>,
    /// Pull request target branch, as set by CI.
    #[arg(long, env = "GITHUB_BASE_REF", hide_env_values = true)]
    pr_base: Option<String>,
    /// Override the search roots (repeatable).
    #[arg(long = "path")]
    paths: Vec<String>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    #[arg(short, long)]
    verbose: bool,
}

impl RunArgs {
    fn into_config(self) -> CheckConfig {
        let mut config = CheckConfig::new(self.platform, self.repo);
        config.base_ref = resolve_base_ref(self.base.as_deref(), self.pr_base.as_deref());
        if !self.paths.is_empty() {
            config.search_roots = self.paths;
        }
        config.output = self.format.into();
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "transcheck=debug" } else { "transcheck=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// 1 when issues were found, 2 on errors.
fn exit_code(outcome: Result<bool>) -> ExitCode {
    match outcome {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check(args) => {
            init_tracing(args.verbose);
            exit_code(run_check(&args.into_config()))
        }
        Commands::VerifyExtraction(args) => {
            init_tracing(args.verbose);
            exit_code(run_verify_extraction(&args.into_config()))
        }
        Commands::Serve => {
            init_tracing(false);
            serve();
            ExitCode::SUCCESS
        }
    }
}

/// Returns whether any issue was found.
fn run_check(config: &CheckConfig) -> Result<bool> {
    info!(
        "checking {} against {} under {:?}",
        config.platform, config.base_ref, config.search_roots
    );

    let changed = git::changed_files(
        &config.repo_root,
        &config.base_ref,
        &config.search_roots,
        &git::resource_extensions(),
    )
    .with_context(|| format!("listing changed files against {}", config.base_ref))?;

    let required = config.required_locales();

    if changed.is_empty() {
        match config.output {
            OutputFormat::Text => println!("✅ No localization files changed"),
            OutputFormat::Json => println!("{}", report::render_json(&[], &required)?),
        }
        return Ok(false);
    }
    debug!("{} changed file(s)", changed.len());

    let mut locations = find_locations(&config.repo_root, &config.search_roots, ResourceFormat::Strings);
    locations.extend(find_locations(
        &config.repo_root,
        &config.search_roots,
        ResourceFormat::StringsDict,
    ));

    let provider = GitSnapshots::new(&config.repo_root, &config.base_ref);
    let mut checker = Checker::new(&provider, required);
    let issues = checker.run(&changed, &locations);

    match config.output {
        OutputFormat::Text if issues.is_empty() => println!("✅ All strings have translations"),
        OutputFormat::Text => println!("{}", report::render_text(&issues, checker.required())),
        OutputFormat::Json => println!("{}", report::render_json(&issues, checker.required())?),
    }

    Ok(!issues.is_empty())
}

/// Returns whether any issue was found.
fn run_verify_extraction(config: &CheckConfig) -> Result<bool> {
    info!(
        "verifying string extraction for {} against {}",
        config.platform, config.base_ref
    );

    let sources = git::changed_files(
        &config.repo_root,
        &config.base_ref,
        &config.search_roots,
        &[extraction::SOURCE_EXTENSION],
    )
    .with_context(|| format!("listing changed sources against {}", config.base_ref))?;
    debug!("{} changed source file(s)", sources.len());

    let string_files = find_source_string_files(&config.repo_root, &config.search_roots);
    let provider = GitSnapshots::new(&config.repo_root, &config.base_ref);
    let outcome = ExtractionVerifier::new(&provider, string_files).run(&sources);

    for path in &outcome.sources_with_changes {
        info!("localized keys changed in {path}");
    }

    match config.output {
        OutputFormat::Text if outcome.sources_with_changes.is_empty() => {
            println!("✅ No NSLocalizedString changes detected")
        }
        OutputFormat::Text if outcome.issues.is_empty() => {
            println!("✅ All NSLocalizedString calls have been extracted to string files")
        }
        OutputFormat::Text => println!("{}", report::render_extraction_text(&outcome.issues)),
        OutputFormat::Json => println!("{}", report::render_extraction_json(&outcome)?),
    }

    Ok(!outcome.issues.is_empty())
}

fn serve() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(|| protocol::handle(&line));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => serde_json::json!({
                "status": "error",
                "message": "internal error"
            })
            .to_string(),
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
