//! Surveillance service: the single writer over the village set.
//!
//! Every mutation (report ingestion, comment, bootstrap) is followed by a
//! full cluster recomputation, and the new cluster list is published to
//! subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{info, instrument};

use super::cluster_detector::ClusterDetector;
use super::report_ingestion::{IngestionOutcome, ReportIngestionEngine};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CaseReport, Comment, Config, OutbreakCluster, RiskLevel, Village};
use crate::domain::ports::{AdvisoryOracle, RiskOracle, VillageRepository};

/// Outcome of submitting a report: the ingestion result and the clusters
/// recomputed after it was committed.
#[derive(Debug, Clone)]
pub struct ReportSubmission {
    pub outcome: IngestionOutcome,
    pub clusters: Vec<OutbreakCluster>,
}

/// Aggregate counts over the village set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub villages: usize,
    pub by_status: HashMap<RiskLevel, usize>,
    pub total_active_cases: u64,
}

impl StatusSummary {
    pub fn from_villages(villages: &[Village]) -> Self {
        let mut summary = Self {
            villages: villages.len(),
            ..Self::default()
        };
        for village in villages {
            *summary.by_status.entry(village.status).or_insert(0) += 1;
            summary.total_active_cases += u64::from(village.active_cases);
        }
        summary
    }

    pub fn count(&self, status: RiskLevel) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

pub struct SurveillanceService<R: VillageRepository> {
    repository: Arc<R>,
    ingestion: ReportIngestionEngine<R>,
    detector: ClusterDetector,
    write_lock: Mutex<()>,
    clusters_tx: watch::Sender<Vec<OutbreakCluster>>,
}

impl<R: VillageRepository> SurveillanceService<R> {
    pub fn new(
        repository: Arc<R>,
        ingestion: ReportIngestionEngine<R>,
        detector: ClusterDetector,
    ) -> Self {
        let (clusters_tx, _) = watch::channel(Vec::new());
        Self {
            repository,
            ingestion,
            detector,
            write_lock: Mutex::new(()),
            clusters_tx,
        }
    }

    /// Wire the engine and detector from configuration.
    pub fn from_config(
        repository: Arc<R>,
        risk_oracle: Arc<dyn RiskOracle>,
        advisory_oracle: Arc<dyn AdvisoryOracle>,
        config: &Config,
    ) -> Self {
        let timeout = config.oracle.call_budget();
        let ingestion = ReportIngestionEngine::new(repository.clone(), risk_oracle)
            .with_settings(config.ingestion.clone())
            .with_oracle_timeout(timeout);
        let detector = ClusterDetector::new(advisory_oracle)
            .with_threshold(config.clustering.threshold_meters)
            .with_oracle_timeout(timeout);
        Self::new(repository, ingestion, detector)
    }

    /// Subscribe to cluster updates published after each mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<OutbreakCluster>> {
        self.clusters_tx.subscribe()
    }

    /// Clusters from the most recent detection pass.
    pub fn current_clusters(&self) -> Vec<OutbreakCluster> {
        self.clusters_tx.borrow().clone()
    }

    /// Load villages into the repository and run an initial detection pass.
    #[instrument(skip(self, villages), fields(count = villages.len()))]
    pub async fn bootstrap(&self, villages: Vec<Village>) -> DomainResult<Vec<OutbreakCluster>> {
        let _guard = self.write_lock.lock().await;
        for village in &villages {
            self.repository.upsert(village).await?;
        }
        info!("villages bootstrapped");
        self.recompute_clusters().await
    }

    /// Validate and ingest a report, then recompute clusters.
    pub async fn submit_report(
        &self,
        report: &CaseReport,
        village_name: &str,
    ) -> DomainResult<ReportSubmission> {
        report.validate().map_err(DomainError::ValidationFailed)?;

        let _guard = self.write_lock.lock().await;
        let outcome = self.ingestion.ingest_with_outcome(report, village_name).await?;
        let clusters = self.recompute_clusters().await?;
        Ok(ReportSubmission { outcome, clusters })
    }

    /// Add a comment to a village.
    ///
    /// Returns `None` without error if the village does not exist, in which
    /// case nothing is mutated and clusters are left as they were.
    pub async fn add_comment(
        &self,
        village_id: &str,
        author: &str,
        text: &str,
    ) -> DomainResult<Option<Comment>> {
        let comment = Comment::new(author, text);

        let _guard = self.write_lock.lock().await;
        if !self.repository.add_comment(village_id, &comment).await? {
            info!(village_id, "comment ignored, village not found");
            return Ok(None);
        }
        self.recompute_clusters().await?;
        Ok(Some(comment))
    }

    /// Re-run detection over the stored villages without mutating them.
    pub async fn refresh_clusters(&self) -> DomainResult<Vec<OutbreakCluster>> {
        let _guard = self.write_lock.lock().await;
        self.recompute_clusters().await
    }

    pub async fn village(&self, id: &str) -> DomainResult<Option<Village>> {
        self.repository.get(id).await
    }

    pub async fn villages(&self) -> DomainResult<Vec<Village>> {
        self.repository.all().await
    }

    pub async fn summary(&self) -> DomainResult<StatusSummary> {
        Ok(StatusSummary::from_villages(&self.repository.all().await?))
    }

    async fn recompute_clusters(&self) -> DomainResult<Vec<OutbreakCluster>> {
        let villages = self.repository.all().await?;
        let clusters = self.detector.detect(&villages).await;
        self.clusters_tx.send_replace(clusters.clone());
        Ok(clusters)
    }
}
