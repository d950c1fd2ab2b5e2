pub mod cluster_detector;
pub mod geo_math;
pub mod report_ingestion;
pub mod surveillance_service;

pub use cluster_detector::{group_villages, ClusterDetector, DEFAULT_THRESHOLD_METERS};
pub use geo_math::{distance_meters, EARTH_RADIUS_METERS};
pub use report_ingestion::{AnalysisSource, IngestionOutcome, ReportIngestionEngine};
pub use surveillance_service::{ReportSubmission, StatusSummary, SurveillanceService};
