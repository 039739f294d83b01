//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// skillcheck - Check which skills this machine can run and install what's missing.
#[derive(Debug, Parser)]
#[command(name = "skillcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (used instead of the discovered config files)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to workspace root (overrides current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show skill readiness (default if no command specified)
    Status(StatusArgs),

    /// Install missing requirements for skills
    Install(InstallArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Show a single skill
    #[arg(short, long)]
    pub skill: Option<String>,

    /// Only show skills whose name, description or source matches
    #[arg(short, long, value_name = "QUERY")]
    pub filter: Option<String>,

    /// Only show skills that are not ready
    #[arg(long)]
    pub missing_only: bool,

    /// Platform of a remote that can run skills (repeatable)
    #[arg(long = "remote-platform", value_name = "PLATFORM")]
    pub remote_platforms: Vec<String>,

    /// Binary available on that remote (repeatable)
    #[arg(long = "remote-bin", value_name = "BIN")]
    pub remote_bins: Vec<String>,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Install only this skill
    #[arg(short, long)]
    pub skill: Option<String>,

    /// Install option id to use (defaults to the preferred option)
    #[arg(short, long, requires = "skill", value_name = "ID")]
    pub option: Option<String>,

    /// Show what would be installed without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
