//! `arfa config`: read configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.emit(&get_config_value(&config, &key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = config
                .to_toml()
                .with_cli_context(|| "failed to serialise configuration")?;
            output.emit(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            let path = global.config.unwrap_or_else(AppConfig::config_path);
            output.emit(&path.display().to_string())?;
            if !path.exists() {
                output.info("File does not exist yet; built-in defaults apply")?;
            }
        }
    }

    Ok(())
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    config.get(key).ok_or_else(|| CliError::UnknownConfigKey { key: key.into() })
}

// ── tests ─────────────────────────────────────────────────────────────────────
