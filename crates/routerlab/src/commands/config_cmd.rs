//! Config subcommand handlers.

use routerlab_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = config::config_path(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let toml_text = toml::to_string_pretty(&cfg)?;
            let rendered = output::render_single(
                global.output,
                &cfg,
                |_| toml_text.trim_end().to_owned(),
                |_| toml_text.trim_end().to_owned(),
            )?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists { path });
            }
            routerlab_config::save_config_to(&Config::default(), &path)?;
            tracing::info!(path = %path.display(), "wrote default config");
            output::print_output(&format!("Wrote {}", path.display()), global.quiet);
            Ok(())
        }
    }
}
