//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kitgen",
    bin_name = "kitgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Kitura project generation from a declarative spec",
    long_about = "Kitgen compiles an application specification into a complete \
                  Kitura/Swift server project: package manifest, application \
                  bootstrap, service wiring, CRUD models, and deployment files.",
    after_help = "EXAMPLES:\n\
        \x20 kitgen generate notes\n\
        \x20 kitgen generate --spec-file spec.json --dir ./out\n\
        \x20 kitgen generate todo --spec '{\"appType\":\"crud\",\"appName\":\"todo\"}'\n\
        \x20 kitgen completions bash > /usr/share/bash-completion/completions/kitgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project from a spec.
    #[command(
        visible_alias = "g",
        about = "Generate a project",
        after_help = "EXAMPLES:\n\
            \x20 kitgen generate notes                         # minimal scaffold named 'notes'\n\
            \x20 kitgen generate --spec-file spec.json         # full spec from a file\n\
            \x20 kitgen generate renamed --spec-file spec.json # same, app renamed\n\
            \x20 kitgen generate notes --dry-run               # plan without writing"
    )]
    Generate(GenerateArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kitgen completions bash > ~/.local/share/bash-completion/completions/kitgen\n\
            \x20 kitgen completions zsh  > ~/.zfunc/_kitgen\n\
            \x20 kitgen completions fish > ~/.config/fish/completions/kitgen.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `kitgen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Application name.  Required when no spec is given; overrides the
    /// spec's `appName` otherwise.
    #[arg(value_name = "NAME", help = "Application name")]
    pub name: Option<String>,

    /// Read the spec from a JSON file.
    #[arg(
        long = "spec-file",
        value_name = "PATH",
        conflicts_with = "spec",
        help = "Path to a JSON spec file"
    )]
    pub spec_file: Option<PathBuf>,

    /// Inline JSON spec.
    #[arg(long = "spec", value_name = "JSON", help = "Inline JSON spec")]
    pub spec: Option<String>,

    /// Target directory (default: the application name).
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Directory to generate into"
    )]
    pub dir: Option<PathBuf>,

    /// Skip the `swift build` step after writing files.
    #[arg(long = "skip-build", help = "Do not build the generated project")]
    pub skip_build: bool,

    /// Omit generator metadata (project marker, spec snapshot).
    #[arg(long = "single-shot", help = "Omit generator metadata files")]
    pub single_shot: bool,

    /// Overwrite protected files that already exist (destructive).
    #[arg(long = "force", help = "Overwrite existing protected files")]
    pub force: bool,

    /// Preview what would be written without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kitgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
