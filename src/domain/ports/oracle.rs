//! Oracle ports - interfaces for the external reasoning service.
//!
//! Both oracles are opaque: they either return structured output or fail.
//! Callers own timeouts and fallbacks.

use async_trait::async_trait;

use crate::domain::errors::OracleResult;
use crate::domain::models::{AiAnalysisResult, ClusterContext, RiskContext};

/// Classifies a village's risk from its prior state and a new report.
#[async_trait]
pub trait RiskOracle: Send + Sync {
    /// Get the oracle name for logging.
    fn name(&self) -> &'static str;

    /// Analyze a report in the context of the village it targets.
    async fn analyze(&self, context: &RiskContext) -> OracleResult<AiAnalysisResult>;
}

/// Produces a coordinated action plan for an outbreak cluster.
#[async_trait]
pub trait AdvisoryOracle: Send + Sync {
    /// Get the oracle name for logging.
    fn name(&self) -> &'static str;

    /// Generate free-text advice for a cluster.
    async fn advise(&self, context: &ClusterContext) -> OracleResult<String>;
}
