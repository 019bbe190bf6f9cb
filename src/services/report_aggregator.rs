//! Report aggregator.
//!
//! Reads every `*.xml` test report in a directory, folds them into a single
//! [`TestSuiteSummary`] keyed by suite name, and hands the summary to the
//! result sink. Files are visited in file-name order, so when two reports
//! declare the same suite name the one sorting last wins.

use roxmltree::{Document, Node, ParsingOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{AggregationError, ForensicsError};
use crate::domain::models::{Attributes, DetailKind, DetailRecord, SuiteEntry, TestSuiteSummary};
use crate::domain::ports::ResultSink;

/// Extension selecting report files; other files are ignored.
pub const REPORT_EXTENSION: &str = "xml";

const TESTCASE_TAG: &str = "testcase";

/// Parses a run's report files and records the merged summary.
pub struct ReportAggregator {
    sink: Arc<dyn ResultSink>,
}

impl ReportAggregator {
    pub fn new(sink: Arc<dyn ResultSink>) -> Self {
        Self { sink }
    }

    /// Parse every report under `reports_dir` and store the summary for `run_id`.
    ///
    /// Nothing is written to the sink unless every report parsed. The sink is
    /// called exactly once otherwise, and its failure is returned unchanged.
    #[instrument(skip(self), fields(reports_dir = %reports_dir.display()))]
    pub async fn aggregate(&self, run_id: &str, reports_dir: &Path) -> Result<TestSuiteSummary, ForensicsError> {
        let summary = parse_reports(reports_dir).await?;

        self.sink
            .update_run_results(run_id, &summary)
            .await
            .map_err(|source| ForensicsError::Sink {
                run_id: run_id.to_string(),
                source,
            })?;

        info!(suites = summary.len(), "Test results recorded");
        Ok(summary)
    }
}

/// Build a summary from every report file in `reports_dir`.
pub async fn parse_reports(reports_dir: &Path) -> Result<TestSuiteSummary, AggregationError> {
    let is_dir = tokio::fs::metadata(reports_dir)
        .await
        .is_ok_and(|metadata| metadata.is_dir());
    if !is_dir {
        return Err(AggregationError::NoReportDirectory(reports_dir.to_path_buf()));
    }

    let files = list_report_files(reports_dir).await?;
    if files.is_empty() {
        return Err(AggregationError::NoReportData(reports_dir.to_path_buf()));
    }

    let mut summary = TestSuiteSummary::new();
    for path in &files {
        let bytes = tokio::fs::read(path).await.map_err(|source| AggregationError::Io {
            path: path.clone(),
            source,
        })?;
        let content = std::str::from_utf8(&bytes).map_err(|source| AggregationError::InvalidEncoding {
            path: path.clone(),
            source,
        })?;

        let (name, entry) = parse_report(path, content)?;
        debug!(file = %path.display(), suite = %name, "Parsed test report");
        if summary.insert(name.clone(), entry).is_some() {
            warn!(file = %path.display(), suite = %name, "Duplicate suite name, replacing earlier report");
        }
    }

    Ok(summary)
}

/// Report files in `dir`, sorted by file name.
async fn list_report_files(dir: &Path) -> Result<Vec<PathBuf>, AggregationError> {
    let to_error = |source: std::io::Error| AggregationError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(to_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(to_error)? {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == REPORT_EXTENSION) {
            continue;
        }
        // Follows symlinks, so linked report files count
        let metadata = tokio::fs::metadata(&path).await.map_err(|source| AggregationError::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Parse one report document into its suite name and summary entry.
pub fn parse_report(path: &Path, content: &str) -> Result<(String, SuiteEntry), AggregationError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(content, options).map_err(|source| AggregationError::ParseFailure {
        path: path.to_path_buf(),
        source,
    })?;
    let root = document.root_element();

    let name = root
        .attribute("name")
        .ok_or_else(|| AggregationError::MissingSuiteName(path.to_path_buf()))?
        .to_string();

    let mut entry = SuiteEntry::new(attributes_of(root));
    for kind in DetailKind::ALL {
        entry.set_details(kind, collect_details(root, kind));
    }

    Ok((name, entry))
}

/// All `kind` elements whose parent is a test case, in document order.
fn collect_details(root: Node<'_, '_>, kind: DetailKind) -> Vec<DetailRecord> {
    root.descendants()
        .filter(|node| node.has_tag_name(kind.tag()))
        .filter(|node| {
            node.parent_element()
                .is_some_and(|parent| parent.has_tag_name(TESTCASE_TAG))
        })
        .map(|node| DetailRecord::new(attributes_of(node), node.text().map(str::to_string)))
        .collect()
}

fn attributes_of(node: Node<'_, '_>) -> Attributes {
    node.attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect()
}
