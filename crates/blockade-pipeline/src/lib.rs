//! # blockade-pipeline
//!
//! Recursive oracle-driven coloring and the orchestration around it.
//!
//! [`ColoringEngine`] branches over the candidates an oracle returns for
//! each remainder graph. [`PipelineOrchestrator`] runs partitions through
//! the radius check, embedding, coloring, and validation, and emits
//! JSONL telemetry.

pub mod config;
pub mod engine;
pub mod orchestrator;
pub mod telemetry;

// Re-export commonly used items
pub use config::{PipelineConfig, PipelineConfigBuilder, RunSettings, MAX_VERTICES};
pub use engine::{ColoringEngine, ColoringOutcome, EngineStats};
pub use orchestrator::{NodeReport, PartitionReport, PipelineOrchestrator};
pub use telemetry::{TelemetryEvent, TelemetryWriter};
