//! Clap derive structures for the `vapix` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vapix -- read-only CLI for VAPIX-style network cameras
#[derive(Debug, Parser)]
#[command(
    name = "vapix",
    version,
    about = "Query network cameras over their VAPIX admin API",
    long_about = "Reads diagnostics, parameters, user groups and snapshots from a\n\
        network camera's CGI endpoints using HTTP basic auth.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Camera profile to use
    #[arg(long, short = 'p', env = "VAPIX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// CGI root URL, e.g. http://192.168.0.90/axis-cgi (overrides profile)
    #[arg(long, short = 'e', env = "VAPIX_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Username (overrides profile)
    #[arg(long, short = 'u', env = "VAPIX_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (overrides profile)
    #[arg(long, env = "VAPIX_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VAPIX_OUTPUT",
        default_value = "plain",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VAPIX_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VAPIX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Plain,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

/// User group a parameter listing is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Level {
    Admin,
    Operator,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RotationArg {
    #[value(name = "0")]
    R0,
    #[value(name = "90")]
    R90,
    #[value(name = "180")]
    R180,
    #[value(name = "270")]
    R270,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the diagnostic server report
    Report(ReportArgs),

    /// Print the system log
    Log,

    /// List configuration parameters
    #[command(alias = "param")]
    Params(ParamsArgs),

    /// List user groups and their members
    Users,

    /// Save a snapshot image
    #[command(alias = "snapshot")]
    Image(ImageArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Show only this section (by display name or normalized key)
    #[arg(long, short = 's')]
    pub section: Option<String>,
}

#[derive(Debug, Args)]
pub struct ParamsArgs {
    /// Parameter group, e.g. Network.RTSP
    #[arg(long, short = 'g')]
    pub group: Option<String>,

    /// Evaluate the listing for this user group
    #[arg(long, short = 'l', default_value = "admin")]
    pub level: Level,

    /// Nest the listing by dotted path
    #[arg(long)]
    pub tree: bool,
}

#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Output file (use - for stdout)
    #[arg(long, short = 'O')]
    pub out: PathBuf,

    /// Fetch a bitmap instead of a JPEG
    #[arg(long)]
    pub bitmap: bool,

    /// Resolution, e.g. 640x480
    #[arg(long, short = 'r')]
    pub resolution: Option<String>,

    /// Video source on multi-sensor devices (1-based)
    #[arg(long)]
    pub camera: Option<u8>,

    /// JPEG compression (0-100)
    #[arg(long)]
    pub compression: Option<u8>,

    /// Colour (true) or greyscale (false)
    #[arg(long)]
    pub color: Option<bool>,

    /// Colour saturation (0-100)
    #[arg(long)]
    pub color_level: Option<u8>,

    /// Clock overlay
    #[arg(long)]
    pub clock: Option<bool>,

    /// Date overlay
    #[arg(long)]
    pub date: Option<bool>,

    /// Text overlay
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub rotation: Option<RotationArg>,

    #[arg(long)]
    pub mirror: Option<bool>,

    #[arg(long)]
    pub square_pixel: Option<bool>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
