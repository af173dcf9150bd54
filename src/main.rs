use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

use scenario_ref_core::comparison::{compare_environments, list_collections};
use scenario_ref_core::report_formatter;
use scenario_ref_core::{
    match_across_environments, search, validate_references, Environment, EnvironmentStore,
    IndexSet, ReferenceParser, Settings,
};

#[derive(Parser)]
#[command(name = "scenario-ref")]
#[command(about = "Validate block references and compare scenarios across dev, prod and stg")]
struct Cli {
    /// YAML config file with per-environment snapshot paths
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// DEV snapshot file (overrides config and environment)
    #[arg(long, global = true)]
    dev: Option<PathBuf>,

    /// PROD snapshot file (overrides config and environment)
    #[arg(long, global = true)]
    prod: Option<PathBuf>,

    /// STG snapshot file (overrides config and environment)
    #[arg(long, global = true)]
    stg: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    /// Output file path (stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract block references from indented reference text
    Parse {
        /// Text file to parse (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Check every block reference against one environment
    Validate {
        /// Text file to validate (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Environment to validate against
        #[arg(short, long)]
        env: Environment,
    },

    /// Search blocks by id or by name across all environments
    Search {
        /// Block id, or part of a block name
        #[arg(short, long)]
        term: String,
    },

    /// Find the same block in every environment, starting from a known id
    Match {
        /// Block id as known in the source environment
        #[arg(short, long)]
        id: String,

        /// Environment the id belongs to
        #[arg(short, long)]
        env: Environment,
    },

    /// List all scenarios and blocks of one environment
    List {
        #[arg(short, long)]
        env: Environment,
    },

    /// Compare scenarios across all environments
    Compare,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Parse { .. } => "parse",
            Commands::Validate { .. } => "validate",
            Commands::Search { .. } => "search",
            Commands::Match { .. } => "match",
            Commands::List { .. } => "list",
            Commands::Compare => "compare",
        }
    }
}

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    // .env never overrides variables that are already set
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error in '{}' command: {}", cli.command.name(), e);
        eprintln!("Hint: Use --help for usage information");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CommandResult {
    let settings = load_settings(cli)?;
    let source = settings.snapshot_source();
    let mut store = EnvironmentStore::new();
    let command_name = cli.command.name();

    match &cli.command {
        Commands::Parse { file } => {
            let text = read_input(file.as_ref())?;
            let references = ReferenceParser::new().parse(&text);
            emit(cli, &references, || report_formatter::format_references(&references), command_name)
        }
        Commands::Validate { file, env } => {
            let text = read_input(file.as_ref())?;
            let references = ReferenceParser::new().parse(&text);
            if references.is_empty() {
                tracing::warn!("no block references found in input");
            }
            store.ensure_loaded(*env, &source);
            let indexes = IndexSet::from_store(&store);
            let index = indexes
                .get(*env)
                .ok_or_else(|| format!("{} snapshot could not be loaded", env.label()))?;
            let report = validate_references(&references, index, *env);
            emit(cli, &report, || report_formatter::format_validation(&report), command_name)
        }
        Commands::Search { term } => {
            let term = term.trim();
            if term.is_empty() {
                return Err("search term is empty".into());
            }
            store.ensure_all_loaded(&source);
            require_any_loaded(&store)?;
            let indexes = IndexSet::from_store(&store);
            let outcome = search(term, &indexes);
            emit(cli, &outcome, || report_formatter::format_search(&outcome), command_name)
        }
        Commands::Match { id, env } => {
            store.ensure_all_loaded(&source);
            require_any_loaded(&store)?;
            let indexes = IndexSet::from_store(&store);
            let result = match_across_environments(id.trim(), *env, &indexes);
            emit(cli, &result, || report_formatter::format_match(&result), command_name)
        }
        Commands::List { env } => {
            if !store.ensure_loaded(*env, &source) {
                return Err(format!("{} snapshot could not be loaded", env.label()).into());
            }
            let listing = list_collections(*env, store.snapshot(*env).unwrap_or_default());
            emit(cli, &listing, || report_formatter::format_listing(&listing), command_name)
        }
        Commands::Compare => {
            store.ensure_all_loaded(&source);
            require_any_loaded(&store)?;
            let comparison = compare_environments(&store);
            emit(cli, &comparison, || report_formatter::format_comparison(&comparison), command_name)
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::discover(cli.config.as_deref())?;
    settings.apply_env_overrides(|key| std::env::var(key).ok());

    for (env, path) in [
        (Environment::Dev, &cli.dev),
        (Environment::Prod, &cli.prod),
        (Environment::Stg, &cli.stg),
    ] {
        if let Some(path) = path {
            settings.set_snapshot(env, path.clone());
        }
    }

    for env in Environment::ALL {
        if settings.snapshot_path(env).is_none() {
            tracing::debug!(%env, "no snapshot configured");
        }
    }
    Ok(settings)
}

fn require_any_loaded(store: &EnvironmentStore) -> CommandResult {
    if store.is_empty() {
        return Err("no environment snapshot could be loaded".into());
    }
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            format!("Failed to read input file '{}': {}", path.display(), e).into()
        }),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(text)
        }
    }
}

fn emit<T, F>(cli: &Cli, result: &T, render_text: F, command_name: &str) -> CommandResult
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match cli.format {
        OutputFormat::Json => output_result(result, cli.output.as_ref(), command_name),
        OutputFormat::Text => output_text(&render_text(), cli.output.as_ref(), command_name),
    }
}

fn output_text(text: &str, output_path: Option<&PathBuf>, command_name: &str) -> CommandResult {
    match output_path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text)).map_err(|e| {
                format!(
                    "Failed to write {} output to '{}': {} (check directory exists and permissions)",
                    command_name,
                    path.display(),
                    e
                )
            })?;
            println!("Output written to: {}", path.display());
        }
        None => {
            println!("{}", text);
        }
    }
    Ok(())
}

fn output_result<T: Serialize>(
    result: &T,
    output_path: Option<&PathBuf>,
    command_name: &str,
) -> CommandResult {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| format!("Failed to serialize {} result to JSON: {}", command_name, e))?;
    output_text(&json, output_path, command_name)
}
