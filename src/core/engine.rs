use crate::app::report::AnalysisReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// What one audit run produced.
#[derive(Debug)]
pub struct AuditOutcome {
    pub report: AnalysisReport,
    pub outputs: Vec<String>,
}

pub struct AuditEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<AuditOutcome> {
        let started = Instant::now();
        tracing::info!("Starting dependency audit...");

        // Discover
        let discovery = self.pipeline.discover().await?;
        tracing::info!(
            "Discovered {} modules in {:?}",
            discovery.registry.len(),
            started.elapsed()
        );

        // Resolve
        let report = self.pipeline.resolve(discovery).await?;
        tracing::info!(
            "Resolved {} modules, {} with redundant dependencies",
            report.summary.modules_analyzed,
            report.summary.modules_with_redundancy
        );
        if !report.failures.is_empty() {
            tracing::warn!("⚠️ {} files or modules could not be processed", report.failures.len());
        }

        // Emit
        let outputs = self.pipeline.emit(&report).await?;
        tracing::info!("Audit finished in {:?}", started.elapsed());

        Ok(AuditOutcome { report, outputs })
    }
}
