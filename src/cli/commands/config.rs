use super::open_store;
use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::core::config::ConfigLogic;
use crate::db::log::LogOp;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: run_migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration ({}):\n", path.display());
            println!("{yaml}");
        }

        if *check {
            let missing = ConfigLogic::check(&path)?;
            if missing.is_empty() {
                success("Configuration file is complete.");
            } else {
                warning(format!("Missing fields: {}", missing.join(", ")));
                info("Run `qrattend config --migrate` to add them with default values.");
            }
        }

        if *run_migrate {
            let added = ConfigLogic::migrate(&path, cfg)?;
            if added.is_empty() {
                info("Configuration already up to date.");
            } else {
                open_store(cfg)?.log(
                    LogOp::MigrationApplied,
                    migrate::VERSION,
                    &format!("config fields added: {}", added.join(", ")),
                );
                success(format!("Added fields: {}", added.join(", ")));
            }
        }

        if *edit_config {
            let requested = ConfigLogic::resolve_editor(editor.as_deref());
            let fallback = ConfigLogic::resolve_editor(None);

            match ConfigLogic::edit(&path, &requested) {
                Ok(()) => success(format!(
                    "Configuration file edited successfully using '{requested}'"
                )),
                Err(e) if requested != fallback => {
                    warning(format!("{e}; falling back to '{fallback}'"));
                    ConfigLogic::edit(&path, &fallback)?;
                    success(format!(
                        "Configuration file edited successfully using fallback '{fallback}'"
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
