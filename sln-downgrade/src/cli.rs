use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "sln-downgrade")]
#[command(about = "Downgrade a Visual Studio solution and its C#/VB.NET projects to an older format")]
pub struct Cli {
    /// Solution file to convert.
    pub solution: PathBuf,
    /// Target Visual Studio version: 2005, 2008, 2010 or 2012 [default: 2008].
    #[arg(long)]
    pub target: Option<String>,
    /// Output directory [default: the solution's directory].
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Postfix for the converted solution's file name.
    #[arg(long)]
    pub solution_postfix: Option<String>,
    /// Substring of the solution name to replace with --solution-postfix.
    #[arg(long)]
    pub replace_solution_postfix: Option<String>,
    /// Postfix for converted project file names.
    #[arg(long)]
    pub project_postfix: Option<String>,
    /// Substring of project names to replace with --project-postfix.
    #[arg(long)]
    pub replace_project_postfix: Option<String>,
    /// Drop bootstrapper packages the target's setup cannot install.
    #[arg(long)]
    pub fix_bootstrapper: bool,
    /// Settings file. Defaults to sln-downgrade.toml next to the solution if present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Log each step (same as RUST_LOG=debug).
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
