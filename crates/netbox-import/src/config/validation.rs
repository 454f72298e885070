//! Configuration validation.

use super::{Config, NetboxVersion, SUPPORTED_NETBOX_VERSIONS};
use crate::error::{ImportError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.source.path.as_os_str().is_empty() {
        return Err(ImportError::Config("source.path is required".into()));
    }

    let version: NetboxVersion = config.source.netbox_version.parse()?;
    if !version.is_supported() {
        return Err(ImportError::Config(format!(
            "source.netbox_version {} is not supported (supported: {})",
            version,
            SUPPORTED_NETBOX_VERSIONS.join(", ")
        )));
    }

    if config.output.path.is_none() && !config.import.dry_run {
        return Err(ImportError::Config(
            "output.path is required unless import.dry_run is set".into(),
        ));
    }

    if let (Some(output), Some(summary)) = (&config.output.path, &config.output.summary_path) {
        if output == summary {
            return Err(ImportError::Config(
                "output.path and output.summary_path cannot be the same file".into(),
            ));
        }
    }

    if config.output.path.as_ref() == Some(&config.source.path) {
        return Err(ImportError::Config(
            "output.path cannot overwrite source.path".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImportConfig, OutputConfig, SourceConfig};

    fn valid_config() -> Config {
        Config {
            source: SourceConfig {
                path: "netbox.json".into(),
                netbox_version: "2.10.8".to_string(),
            },
            output: OutputConfig {
                path: Some("nautobot.jsonl".into()),
                summary_path: Some("summary.json".into()),
            },
            import: ImportConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_source_path() {
        let mut config = valid_config();
        config.source.path = "".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unsupported_version() {
        let mut config = valid_config();
        config.source.netbox_version = "2.9.0".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_output_required_unless_dry_run() {
        let mut config = valid_config();
        config.output.path = None;
        assert!(validate(&config).is_err());

        config.import.dry_run = true;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_output_collisions() {
        let mut config = valid_config();
        config.output.summary_path = config.output.path.clone();
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.output.path = Some(config.source.path.clone());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_from_yaml_validates() {
        let yaml = "source:\n  path: dump.json\n  netbox_version: '3.4'\noutput:\n  path: out.jsonl\n";
        assert!(Config::from_yaml(yaml).is_ok());

        let yaml = "source:\n  path: dump.json\n  netbox_version: '4.0'\noutput:\n  path: out.jsonl\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ImportError::Config(_))));
    }
}
