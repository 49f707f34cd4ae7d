pub mod audit_pipeline;

pub use audit_pipeline::AuditPipeline;
