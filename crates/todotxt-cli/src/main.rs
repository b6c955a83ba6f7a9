use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use todotxt_core::action::Action;
use todotxt_core::config;
use todotxt_core::store::TodoStore;
use todotxt_core::{commands, query};
use todotxt_render::{Palette, Renderer};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod help;
mod output;
mod setup;

#[derive(Parser, Debug)]
#[command(
    name = "todotxt",
    version,
    about = "Plain-text todo list manager",
    long_about = "Plain-text todo list manager.\n\nFor detailed instructions on actions use: todotxt help",
    after_help = help::SHORT_HELP
)]
struct Cli {
    /// Colour mode
    #[arg(short = 'c', long = "colour", conflicts_with = "plain")]
    colour: bool,
    /// Plain mode
    #[arg(short = 'p', long)]
    plain: bool,
    /// Output extra debug information
    #[arg(short, long)]
    verbose: bool,
    /// Config file (defaults to $TODOTXT_CONFIG or ~/.todotxt.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print the task listing as JSON
    #[arg(long)]
    json: bool,
    /// Action to perform, see the "help" action
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    action: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("--\nTODO:\tERROR: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    debug!(?cli, "parsed arguments");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let config_path = config::resolve_config_path(cli.config.as_deref())
        .context("cannot locate a config file; pass --config or set TODOTXT_CONFIG")?;
    let config = setup::load_or_create_config(&config_path, &mut input, &mut out)?;
    let todo_dir = config.todo_dir(&config_path)?;
    setup::ensure_todo_dir(&todo_dir, &mut input, &mut out)?;

    let colour = !cli.plain && (cli.colour || config.colour_mode());
    let palette = Palette::from_config(&config.colours, &config.task_colours)?;
    let renderer = Renderer::new(&palette, colour);

    let args = if cli.action.is_empty() {
        config
            .default_action()
            .unwrap_or_else(|| vec!["help".to_string()])
    } else {
        cli.action
    };
    let action = Action::parse(&args)?;

    let mut store = TodoStore::load(&todo_dir)
        .with_context(|| format!("failed to load {}", todo_dir.display()))?;
    let report = commands::execute(&mut store, &action, Local::now().date_naive())?;
    let listing_terms = action.listing_terms();
    // With --json, stdout carries only the JSON listing.
    if cli.json && listing_terms.is_some() {
        output::print_report(&mut io::stderr().lock(), &report, &renderer)?;
    } else {
        output::print_report(&mut out, &report, &renderer)?;
    }

    if let Some(terms) = listing_terms {
        let listing = query::list(&store, terms)?;
        if cli.json {
            output::print_json(&mut out, &listing)?;
        } else {
            output::print_listing(&mut out, &listing, &renderer)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn install_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
