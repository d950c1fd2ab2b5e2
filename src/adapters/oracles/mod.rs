//! Risk and advisory oracle implementations.

pub mod anthropic;
pub mod prompts;
pub mod stub;

use std::sync::Arc;

pub use anthropic::{AnthropicAdvisoryOracle, AnthropicClient, AnthropicRiskOracle};
pub use stub::{StubAdvisoryOracle, StubBehavior, StubRiskOracle};

use crate::domain::errors::OracleResult;
use crate::domain::models::{OracleConfig, OracleProvider};
use crate::domain::ports::{AdvisoryOracle, RiskOracle};

/// Risk and advisory oracles built for one provider.
pub struct OraclePair {
    pub risk: Arc<dyn RiskOracle>,
    pub advisory: Arc<dyn AdvisoryOracle>,
}

/// Build both oracles for the configured provider.
pub fn build_oracles(config: &OracleConfig) -> OracleResult<OraclePair> {
    match config.provider {
        OracleProvider::Stub => Ok(stub_oracles()),
        OracleProvider::Anthropic => {
            let client = Arc::new(AnthropicClient::from_config(config)?);
            Ok(OraclePair {
                risk: Arc::new(AnthropicRiskOracle::new(client.clone())),
                advisory: Arc::new(AnthropicAdvisoryOracle::new(client)),
            })
        }
    }
}

/// Rule-based oracles that need no network access.
pub fn stub_oracles() -> OraclePair {
    OraclePair {
        risk: Arc::new(StubRiskOracle::rules()),
        advisory: Arc::new(StubAdvisoryOracle::rules()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_builds_stubs() {
        let pair = build_oracles(&OracleConfig::default()).unwrap();
        assert_eq!(pair.risk.name(), "stub");
        assert_eq!(pair.advisory.name(), "stub");
    }

    #[test]
    fn test_anthropic_provider_with_key() {
        let mut config = OracleConfig {
            provider: OracleProvider::Anthropic,
            ..OracleConfig::default()
        };
        config.anthropic.api_key = Some("test-key".to_string());
        let pair = build_oracles(&config).unwrap();
        assert_eq!(pair.risk.name(), "anthropic");
        assert_eq!(pair.advisory.name(), "anthropic");
    }
}
