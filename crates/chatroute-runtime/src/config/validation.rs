//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{AgentConfig, ChatrouteConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &ChatrouteConfig) -> ConfigResult<()> {
    validate_agent_config(&config.agent)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_agent_config(agent: &AgentConfig) -> ConfigResult<()> {
    if agent.id.trim().is_empty() {
        return Err(ConfigError::missing_field("agent.id"));
    }
    if agent.id.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Agent id must not contain whitespace: {:?}",
            agent.id
        )));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    if let Some(target) = logging.filters.keys().find(|k| k.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Empty log filter target: {target:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    fn valid() -> ChatrouteConfig {
        ChatrouteConfig {
            agent: AgentConfig {
                id: "U024BE7LH".into(),
                name: Some("pingbot".into()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_missing_agent_id() {
        let mut config = valid();
        config.agent.id = "  ".into();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { ref field }) if field == "agent.id"
        ));
    }

    #[test]
    fn test_agent_id_with_whitespace() {
        let mut config = valid();
        config.agent.id = "two words".into();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = valid();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("chatroute.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_filter_target() {
        let mut config = valid();
        config.logging.filters.insert(String::new(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
