//! Service layer: completion watching, report aggregation and run orchestration.

pub mod completion_watcher;
pub mod forensics_service;
pub mod report_aggregator;

pub use completion_watcher::CompletionWatcher;
pub use forensics_service::ForensicsService;
pub use report_aggregator::{parse_report, parse_reports, ReportAggregator, REPORT_EXTENSION};
