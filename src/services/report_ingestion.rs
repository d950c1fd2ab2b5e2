//! Report ingestion: turns a field report plus prior village state into an
//! updated village.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AiAnalysisResult, CaseReport, Coordinates, IngestionConfig, RiskContext, Village,
};
use crate::domain::ports::{RiskOracle, VillageRepository};

/// Where the analysis applied to a village came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Oracle,
    Fallback,
}

/// Result of ingesting a single report.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    /// The village as committed to the repository
    pub village: Village,
    /// True if the report created the village
    pub created: bool,
    /// True if a new village's location could not be parsed and the
    /// default coordinates were used
    pub location_fallback: bool,
    pub analysis_source: AnalysisSource,
}

/// Applies case reports to villages.
///
/// Each ingestion performs exactly one oracle call and one repository
/// write. Oracle failures, timeouts and out-of-contract answers all degrade
/// to [`AiAnalysisResult::fallback`].
pub struct ReportIngestionEngine<R: VillageRepository> {
    repository: Arc<R>,
    oracle: Arc<dyn RiskOracle>,
    settings: IngestionConfig,
    oracle_timeout: Duration,
}

impl<R: VillageRepository> ReportIngestionEngine<R> {
    pub fn new(repository: Arc<R>, oracle: Arc<dyn RiskOracle>) -> Self {
        Self {
            repository,
            oracle,
            settings: IngestionConfig::default(),
            oracle_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_settings(mut self, settings: IngestionConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn oracle_timeout(&self) -> Duration {
        self.oracle_timeout
    }

    /// Ingest a report and return the committed village.
    pub async fn ingest(&self, report: &CaseReport, village_name: &str) -> DomainResult<Village> {
        Ok(self.ingest_with_outcome(report, village_name).await?.village)
    }

    /// Ingest a report and describe how the result was obtained.
    #[instrument(skip(self, report), fields(report_id = %report.id, village_id = %report.village_id))]
    pub async fn ingest_with_outcome(
        &self,
        report: &CaseReport,
        village_name: &str,
    ) -> DomainResult<IngestionOutcome> {
        let (mut village, created, location_fallback) =
            match self.repository.get(&report.village_id).await? {
                Some(existing) => (existing, false, false),
                None => {
                    let (village, fallback) = self.materialize_village(report, village_name);
                    (village, true, fallback)
                }
            };

        let context = RiskContext::new(&village, report);
        let (analysis, analysis_source) = self.analyze_or_fallback(&context).await;

        village.add_cases(report.affected_count);
        village.status = analysis.risk_level;
        village.last_reported = Utc::now();
        village.last_reporter_name = Some(report.worker_name.clone());
        if let Some(symptom) = report.primary_symptom() {
            village.merge_symptom(symptom);
        }
        village.last_analysis = Some(analysis);

        self.repository.upsert(&village).await?;

        info!(
            village_id = %village.id,
            status = %village.status,
            active_cases = village.active_cases,
            created,
            source = ?analysis_source,
            "report ingested"
        );

        Ok(IngestionOutcome {
            village,
            created,
            location_fallback,
            analysis_source,
        })
    }

    /// Build a new village for a report naming an unknown village ID.
    fn materialize_village(&self, report: &CaseReport, village_name: &str) -> (Village, bool) {
        let (coordinates, fallback) = match Coordinates::parse_lat_lng(&report.worker_location) {
            Some(coords) => (coords, false),
            None => {
                warn!(
                    village_id = %report.village_id,
                    location = %report.worker_location,
                    "unparseable worker location, using default coordinates"
                );
                (self.settings.default_coordinates, true)
            }
        };

        let village = Village::new(
            report.village_id.clone(),
            village_name,
            self.settings.default_district.clone(),
            coordinates,
            self.settings.default_population,
        );
        (village, fallback)
    }

    async fn analyze_or_fallback(&self, context: &RiskContext) -> (AiAnalysisResult, AnalysisSource) {
        let oracle = self.oracle.name();
        match tokio::time::timeout(self.oracle_timeout, self.oracle.analyze(context)).await {
            Ok(Ok(analysis)) => match analysis.validate() {
                Ok(()) => {
                    debug!(oracle, risk_level = %analysis.risk_level, "risk analysis received");
                    (analysis, AnalysisSource::Oracle)
                }
                Err(reason) => {
                    warn!(oracle, %reason, "risk analysis violates contract, using fallback");
                    (AiAnalysisResult::fallback(), AnalysisSource::Fallback)
                }
            },
            Ok(Err(err)) => {
                warn!(oracle, error = %err, "risk analysis failed, using fallback");
                (AiAnalysisResult::fallback(), AnalysisSource::Fallback)
            }
            Err(_) => {
                warn!(
                    oracle,
                    timeout_secs = self.oracle_timeout.as_secs_f64(),
                    "risk analysis timed out, using fallback"
                );
                (AiAnalysisResult::fallback(), AnalysisSource::Fallback)
            }
        }
    }
}
