//! Tunable rules configuration.
//!
//! Rules are loaded from RON and validated at load time:
//!
//! ```ron
//! (
//!     retreat_distance: 2,
//!     max_turns: 200,
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};

/// Rule parameters that scenarios may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Hexes a unit falls back on a retreat result.
    pub retreat_distance: u32,
    /// Turn limit for [`crate::game::Game::play`].
    pub max_turns: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            retreat_distance: 2,
            max_turns: 200,
        }
    }
}

impl RulesConfig {
    /// Parse and validate a RON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] if the document does not parse
    /// or a value is out of range.
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(source).map_err(|e| BattleError::InvalidConfig(e.to_string()))?;
        config.check()?;

        tracing::debug!(
            retreat_distance = config.retreat_distance,
            max_turns = config.max_turns,
            "Loaded rules configuration"
        );
        Ok(config)
    }

    /// Fail with every problem joined into one message.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] if [`RulesConfig::validate`]
    /// reports anything.
    pub fn check(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BattleError::InvalidConfig(errors.join("; ")))
        }
    }

    /// List every problem with this configuration; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.retreat_distance == 0 {
            errors.push("retreat_distance must be at least 1".to_string());
        }
        if self.max_turns == 0 {
            errors.push("max_turns must be at least 1".to_string());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(config.retreat_distance, 2);
        assert_eq!(config.max_turns, 200);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_from_ron() {
        let config = RulesConfig::from_ron("(retreat_distance: 3, max_turns: 50)").unwrap();
        assert_eq!(config.retreat_distance, 3);
        assert_eq!(config.max_turns, 50);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = RulesConfig::from_ron("(max_turns: 10)").unwrap();
        assert_eq!(config.retreat_distance, 2);
        assert_eq!(config.max_turns, 10);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            RulesConfig::from_ron("(retreat_distance: \"far\")"),
            Err(BattleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = RulesConfig::from_ron("(retreat_distance: 0, max_turns: 0)").unwrap_err();
        let BattleError::InvalidConfig(message) = err else {
            panic!("expected InvalidConfig, got {err:?}");
        };
        assert!(message.contains("retreat_distance"));
        assert!(message.contains("max_turns"));
    }

    #[test]
    fn test_check_matches_validate() {
        assert!(RulesConfig::default().check().is_ok());
        let config = RulesConfig {
            retreat_distance: 0,
            ..RulesConfig::default()
        };
        assert_eq!(
            config.check(),
            Err(BattleError::InvalidConfig(
                "retreat_distance must be at least 1".to_string()
            ))
        );
    }
}
