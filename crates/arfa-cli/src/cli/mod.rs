//! CLI argument definitions using the clap derive API.
//!
//! Argument names, aliases, help text and value enums live here. No
//! business logic does.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "arfa",
    bin_name = "arfa",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "File-based routing for the browser, without a framework",
    long_about = "Arfa scaffolds Vite starter apps that route from a pages/ \
                  directory, and inspects the route table a pages directory \
                  produces.",
    after_help = "EXAMPLES:\n\
        \x20 arfa new my-app\n\
        \x20 arfa new my-app --yes --template-dir ./my-template\n\
        \x20 arfa routes src/pages --match /blog/42\n\
        \x20 arfa completions bash > /usr/share/bash-completion/completions/arfa",
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
    /// Create a new Arfa app from the starter template.
    #[command(
        visible_alias = "n",
        about = "Create a new Arfa app",
        after_help = "EXAMPLES:\n\
            \x20 arfa new              # prompts for a name\n\
            \x20 arfa new my-app --yes\n\
            \x20 arfa new my-app --dry-run"
    )]
    New(NewArgs),

    /// Print the route table of a pages directory.
    #[command(
        visible_alias = "r",
        about = "Inspect the routes of a pages directory",
        after_help = "EXAMPLES:\n\
            \x20 arfa routes src/pages\n\
            \x20 arfa routes src/pages --match /blog/hello\n\
            \x20 arfa routes src/pages --format json"
    )]
    Routes(RoutesArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 arfa completions bash > ~/.local/share/bash-completion/completions/arfa\n\
            \x20 arfa completions zsh  > ~/.zfunc/_arfa\n\
            \x20 arfa completions fish > ~/.config/fish/completions/arfa.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Arfa configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 arfa config get router.guard_policy\n\
            \x20 arfa config list\n\
            \x20 arfa config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `arfa new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name; also the directory created under the current one.
    #[arg(
        value_name = "NAME",
        help = "Project name (lowercase letters, digits and hyphens)"
    )]
    pub name: Option<String>,

    /// Never prompt; a missing name falls back to `project.default_name`.
    #[arg(short = 'y', long = "yes", help = "Skip prompts and use defaults")]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Copy this directory instead of the built-in starter.
    #[arg(
        long = "template-dir",
        value_name = "DIR",
        help = "Use a template directory instead of the built-in starter"
    )]
    pub template_dir: Option<PathBuf>,
}

// ── routes ────────────────────────────────────────────────────────────────────

/// Arguments for `arfa routes`.
#[derive(Debug, Args)]
pub struct RoutesArgs {
    /// Directory holding page, layout and special files.
    #[arg(
        value_name = "PAGES_DIR",
        default_value = "src/pages",
        help = "Pages directory to scan"
    )]
    pub pages_dir: PathBuf,

    /// Resolve one pathname instead of listing the table.
    #[arg(
        short = 'm',
        long = "match",
        value_name = "PATH",
        help = "Show the route, params and layouts a path resolves to"
    )]
    pub match_path: Option<String>,

    /// Output format; defaults to `json` under `--output-format json`.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<RoutesFormat>,
}

/// Output format for the `routes` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoutesFormat {
    /// Human-readable table.
    Table,
    /// JSON document.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `arfa completions`.
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

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `arfa config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `router.pages_root`.
        key: String,
    },
    /// Print all configuration values as TOML.
    List,
    /// Print the path of the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_new_with_name() {
        let cli = Cli::parse_from(["arfa", "new", "my-app", "--yes"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name.as_deref(), Some("my-app"));
        assert!(args.yes);
        assert!(!args.dry_run);
    }

    #[test]
    fn new_name_is_optional() {
        let cli = Cli::parse_from(["arfa", "n"]);
        assert!(matches!(cli.command, Commands::New(NewArgs { name: None, .. })));
    }

    #[test]
    fn routes_defaults_to_src_pages() {
        let cli = Cli::parse_from(["arfa", "routes"]);
        let Commands::Routes(args) = cli.command else {
            panic!("expected Routes command");
        };
        assert_eq!(args.pages_dir, PathBuf::from("src/pages"));
        assert_eq!(args.match_path, None);
        assert_eq!(args.format, None);
    }

    #[test]
    fn routes_match_and_format() {
        let cli = Cli::parse_from([
            "arfa", "routes", "pages", "--match", "/blog/1", "--format", "json",
        ]);
        let Commands::Routes(args) = cli.command else {
            panic!("expected Routes command");
        };
        assert_eq!(args.match_path.as_deref(), Some("/blog/1"));
        assert_eq!(args.format, Some(RoutesFormat::Json));
    }

    #[test]
    fn config_get_takes_key() {
        let cli = Cli::parse_from(["arfa", "config", "get", "router.pages_root"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Get { key }) if key == "router.pages_root"
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["arfa", "--quiet", "--verbose", "routes"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["arfa", "routes", "-vv", "--no-color"]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }
}
