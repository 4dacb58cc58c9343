use anyhow::{Context, Result};
use clap::Parser;
use sln_downgrade::config::{discover, load_config, resolve_options, Overrides};
use sln_downgrade::{convert_solution, describe};
use sln_downgrade::report::render_text;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Reject an unknown --target before touching the file system.
    if let Some(target) = cli.target.as_deref() {
        describe(target)?;
    }

    let config_path = cli.config.clone().or_else(|| discover(&cli.solution));
    let file_config = config_path
        .as_deref()
        .map(load_config)
        .transpose()
        .context("failed to load configuration")?;

    let overrides = Overrides {
        target: cli.target,
        output: cli.output,
        solution_postfix: cli.solution_postfix,
        replace_solution_postfix: cli.replace_solution_postfix,
        project_postfix: cli.project_postfix,
        replace_project_postfix: cli.replace_project_postfix,
        fix_bootstrapper: cli.fix_bootstrapper,
    };
    let options = resolve_options(&cli.solution, file_config.as_ref(), &overrides)?;

    let report = convert_solution(&options)
        .with_context(|| format!("failed to convert {}", cli.solution.display()))?;

    match cli.format {
        OutputFormat::Text => println!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
