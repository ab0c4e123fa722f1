//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let shown = zonesmith_config::load(global.config.as_deref())?.redacted();
            let rendered = match global.output {
                // TOML is the file's own syntax, the natural "table" view.
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&shown).map_err(|err| CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to serialize config: {err}"),
                    })?
                }
                OutputFormat::Json => output::render_json_pretty(&shown),
                OutputFormat::Yaml => output::render_yaml(&shown),
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = zonesmith_config::active_config_path(global.config.as_deref());
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = zonesmith_config::active_config_path(global.config.as_deref());
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    ),
                });
            }
            zonesmith_config::write_starter_config(&path)?;
            if !global.quiet {
                eprintln!("Wrote starter config to {}", path.display());
            }
            Ok(())
        }
    }
}
