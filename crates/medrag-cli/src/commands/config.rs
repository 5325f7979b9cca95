//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    custom_path: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let path = Config::resolve_path(custom_path)?;
    let output = match args.action {
        ConfigAction::Init { force } => init_config(&path, force, formatter)?,
        ConfigAction::Show => config.redacted().to_toml()?,
        ConfigAction::Path => path.display().to_string(),
    };
    println!("{}", output);
    Ok(())
}

/// Write a default configuration file.
pub fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<String> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(path)?;
    Ok(formatter.success(&format!("Wrote {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("medrag").join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);

        let message = init_config(&path, false, &formatter).unwrap();
        assert!(message.starts_with("✓ Wrote"));
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\ncolor = false\n").unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        assert!(matches!(
            init_config(&path, false, &formatter),
            Err(CliError::InvalidInput(_))
        ));
        assert!(init_config(&path, true, &formatter).is_ok());
        assert!(Config::load_from(&path).unwrap().settings.color);
    }
}
