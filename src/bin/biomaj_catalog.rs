use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use biomaj_catalog::client::{BiomajHttpClient, CatalogQuery};
use biomaj_catalog::config::{ConfigLoader, ResolvedConfig};
use biomaj_catalog::dblist::{DbListRequest, handle_dblist};
use biomaj_catalog::domain::Bank;
use biomaj_catalog::error::BiomajError;
use biomaj_catalog::output::{JsonOutput, render_options};
use biomaj_catalog::service::CatalogService;
use biomaj_catalog::tree::{TreeDocument, TreeOptions};
use biomaj_catalog::validate::{CatalogConstraint, PrefixConstraint};

#[derive(Parser)]
#[command(name = "biomaj-catalog")]
#[command(about = "Browse the banks of a BioMaj server and check bank paths against them")]
#[command(version, author)]
struct Cli {
    /// Config file (defaults to ./biomaj.json, then the user config dir)
    #[arg(long, global = true)]
    config: Option<String>,

    /// BioMaj server base URL, overrides the config file
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List banks as JSON")]
    Banks(BanksArgs),
    #[command(about = "Print the bank tree of a format")]
    Tree(TreeArgs),
    #[command(about = "Answer a bank list request (dbtype/dbformat/cleanup/filterall)")]
    Dblist(DblistArgs),
    #[command(about = "Check that a value is one of the available bank paths")]
    Validate(ValidateArgs),
    #[command(about = "Check that a path lives below a trusted directory")]
    CheckPrefix(CheckPrefixArgs),
}

#[derive(Args)]
struct BanksArgs {
    #[arg(long = "name")]
    names: Vec<String>,

    #[arg(long)]
    format: Option<String>,

    #[arg(long = "type")]
    types: Vec<String>,

    #[arg(long)]
    light: bool,
}

#[derive(Args)]
struct TreeArgs {
    #[arg(long = "type", required = true)]
    types: Vec<String>,

    #[arg(long)]
    format: String,

    #[arg(long)]
    cleanup: bool,

    #[arg(long)]
    filter_all: bool,

    /// Print <optgroup>/<option> markup instead of JSON
    #[arg(long)]
    html: bool,
}

#[derive(Args)]
struct DblistArgs {
    dbtype: Option<String>,
    dbformat: Option<String>,
    cleanup: Option<String>,
    filterall: Option<String>,

    /// Also print the response headers on stderr
    #[arg(long)]
    headers: bool,
}

#[derive(Args)]
struct ValidateArgs {
    #[arg(long = "type", required = true)]
    types: Vec<String>,

    #[arg(long, default_value = "")]
    format: String,

    #[arg(long)]
    no_cleanup: bool,

    value: String,
}

#[derive(Args)]
struct CheckPrefixArgs {
    /// Trusted directory (defaults to `trusted_prefix` from the config)
    #[arg(long)]
    prefix: Option<String>,

    value: String,
}

#[derive(Serialize)]
struct BankSummary<'a> {
    name: &'a str,
    db_type: &'a str,
    last_update: &'a str,
    last_update_time: Option<String>,
    current_release: &'a str,
    formats: &'a [String],
}

impl<'a> From<&'a Bank> for BankSummary<'a> {
    fn from(bank: &'a Bank) -> Self {
        Self {
            name: &bank.name,
            db_type: &bank.db_type,
            last_update: &bank.last_update,
            last_update_time: bank.last_update_time().map(|time| time.to_rfc3339()),
            current_release: &bank.current_release,
            formats: bank.formats(""),
        }
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<BiomajError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &BiomajError) -> u8 {
    match error {
        BiomajError::ValidationFailed(_)
        | BiomajError::PathNotFound(_)
        | BiomajError::PrefixMismatch { .. } => 2,
        BiomajError::UnreachableServer { .. } | BiomajError::MalformedResponse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref())?.with_server(cli.server.as_deref());

    match cli.command {
        Commands::Banks(args) => run_banks(args, &config),
        Commands::Tree(args) => run_tree(args, &config),
        Commands::Dblist(args) => run_dblist(args, &config),
        Commands::Validate(args) => run_validate(args, &config),
        Commands::CheckPrefix(args) => run_check_prefix(args, &config),
    }
}

fn service(config: &ResolvedConfig) -> miette::Result<CatalogService<BiomajHttpClient>> {
    let timeout = config.timeout_secs.map(Duration::from_secs);
    let client = BiomajHttpClient::with_timeout(config.server()?, timeout)?;
    Ok(CatalogService::new(client))
}

fn run_banks(args: BanksArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let service = service(config)?;
    let query = CatalogQuery::new()
        .names(args.names)
        .formats(args.format)
        .types(args.types)
        .light(args.light);
    let catalog = service.banks(&query)?;
    let summaries: Vec<BankSummary<'_>> = catalog.banks().iter().map(BankSummary::from).collect();
    JsonOutput::print(&summaries).into_diagnostic()
}

fn run_tree(args: TreeArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let service = service(config)?;
    let options = TreeOptions {
        clean_up: args.cleanup,
        filter_all: args.filter_all,
    };
    let tree = service.bank_tree(&args.types, &args.format, options)?;
    if args.html {
        JsonOutput::print_raw(&render_options(&tree)).into_diagnostic()
    } else {
        JsonOutput::print(&TreeDocument { tree }).into_diagnostic()
    }
}

fn run_dblist(args: DblistArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let service = service(config)?;
    let request = DbListRequest::from_params(
        args.dbtype.as_deref(),
        args.dbformat.as_deref(),
        args.cleanup.as_deref(),
        args.filterall.as_deref(),
    );
    let response = handle_dblist(&service, &request)?;
    if args.headers {
        eprintln!("Content-Type: {}", response.content_type);
        eprintln!("Cache-Control: {}", response.cache_control);
    }
    JsonOutput::print_raw(&response.body).into_diagnostic()
}

fn run_validate(args: ValidateArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let service = service(config)?;
    let constraint = CatalogConstraint::new(args.types, &args.format)?.clean_up(!args.no_cleanup);
    constraint.validate(&service, Some(&args.value))?;
    println!("{}: ok", args.value);
    Ok(())
}

fn run_check_prefix(args: CheckPrefixArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let prefix = match args.prefix {
        Some(prefix) => prefix,
        None => config
            .trusted_prefix
            .as_ref()
            .map(|prefix| prefix.to_string())
            .ok_or_else(|| miette::Report::msg("no --prefix given and no trusted_prefix configured"))?,
    };
    PrefixConstraint::new(prefix)?.validate(Some(&args.value))?;
    println!("{}: ok", args.value);
    Ok(())
}
