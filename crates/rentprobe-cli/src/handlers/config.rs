//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use rentprobe::SuiteConfig;

/// Execute the config command.
///
/// With no flags the effective configuration is shown.
pub fn execute_config(config: &CliConfig, args: &ConfigArgs, reporter: &Reporter) -> CliResult<()> {
    if args.defaults {
        print!("{}", SuiteConfig::default().to_yaml()?);
        return Ok(());
    }

    let suite = config.suite()?;
    if args.validate {
        let source = config
            .suite_path
            .as_ref()
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
        reporter.success(&format!("configuration is valid ({source})"));
        println!("ok");
        if !args.show {
            return Ok(());
        }
    }

    print!("{}", suite.to_yaml()?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(show: bool, validate: bool, defaults: bool) -> ConfigArgs {
        ConfigArgs {
            show,
            validate,
            defaults,
        }
    }

    #[test]
    fn test_defaults_print() {
        let reporter = Reporter::new(false, true);
        execute_config(&CliConfig::new(), &args(false, false, true), &reporter).unwrap();
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeouts:\n  widget_ms: 0").unwrap();
        let config = CliConfig::new().with_suite_path(Some(file.path().to_path_buf()));
        let err = execute_config(&config, &args(false, true, false), &Reporter::new(false, true)).unwrap_err();
        assert!(err.to_string().contains("timeouts"));
    }
}
