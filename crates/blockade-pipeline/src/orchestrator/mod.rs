//! Pipeline orchestrator: radius check, embedding, coloring, validation.

use crate::config::PipelineConfig;
use crate::engine::{ColoringEngine, EngineStats};
use crate::telemetry::{TelemetryEvent, TelemetryWriter, STAGE_COLOR, STAGE_EMBED};
use blockade_core::{
    BlockadeError, Coloring, Graph, IndependentSetOracle, Partition, Result,
};
use blockade_geometry::{Embedder, Embedding};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// One vertex of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub color: usize,
}

/// Result of running one partition through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionReport {
    pub partition: String,
    pub oracle: String,
    pub num_vertices: usize,
    pub num_edges: usize,
    pub num_colors: usize,
    pub elapsed_ms: f64,
    pub stats: EngineStats,
    pub nodes: Vec<NodeReport>,
    /// Node ids per color, index `c - 1` holding color `c`.
    pub classes: Vec<Vec<String>>,

    #[serde(skip)]
    pub coloring: Coloring,
}

impl PartitionReport {
    fn new(
        partition: &Partition,
        oracle: &str,
        embedding: &Embedding,
        coloring: Coloring,
        stats: EngineStats,
        elapsed_ms: f64,
    ) -> Self {
        let graph = &partition.graph;
        let nodes = embedding
            .nodes
            .iter()
            .map(|node| NodeReport {
                id: graph.label(node.vertex),
                x: node.position.x,
                y: node.position.y,
                color: coloring.colors[node.vertex],
            })
            .collect();
        let classes = coloring
            .classes()
            .into_iter()
            .map(|class| class.into_iter().map(|v| graph.label(v)).collect())
            .collect();

        Self {
            partition: partition.name.clone(),
            oracle: oracle.to_string(),
            num_vertices: graph.num_vertices,
            num_edges: graph.num_edges,
            num_colors: coloring.num_colors(),
            elapsed_ms,
            stats,
            nodes,
            classes,
            coloring,
        }
    }
}

/// Runs partitions through embed → color → validate, emitting telemetry.
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    oracle: Box<dyn IndependentSetOracle>,
    telemetry_writer: Option<TelemetryWriter>,
}

impl PipelineOrchestrator {
    /// Validates `config` and builds the configured oracle.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let oracle = config.oracle.build()?;
        Self::with_oracle(config, oracle)
    }

    /// Uses a caller-supplied oracle instead of the configured strategy.
    pub fn with_oracle(config: PipelineConfig, oracle: Box<dyn IndependentSetOracle>) -> Result<Self> {
        config.validate()?;
        let telemetry_writer = match &config.pipeline.telemetry_path {
            Some(path) => Some(TelemetryWriter::create(path)?),
            None => None,
        };
        Ok(Self {
            config,
            oracle,
            telemetry_writer,
        })
    }

    /// Colors one partition.
    ///
    /// # Errors
    /// Any embedding or coloring failure is returned as-is after its
    /// telemetry event has been written. A coloring that fails validation
    /// is reported as `Internal`.
    pub fn run_partition(&mut self, partition: &Partition) -> Result<PartitionReport> {
        let graph = &partition.graph;
        log::info!(
            "Partition '{}': {} vertices, {} edges (density {:.3})",
            partition.name,
            graph.num_vertices,
            graph.num_edges,
            graph.density()
        );

        graph.validate()?;
        self.config.check_graph(graph)?;

        let start = Instant::now();
        let embedding = self.embed(partition)?;

        let engine = ColoringEngine::new(self.oracle.as_ref())
            .with_timeout(self.config.oracle.timeout())
            .with_parallel_branches(self.config.pipeline.parallel_branches);
        let mut metrics = graph_metrics(graph);
        let outcome = match engine.color(graph).and_then(|outcome| {
            check_coloring(graph, &outcome.coloring)?;
            Ok(outcome)
        }) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.emit(TelemetryEvent::failure(STAGE_COLOR, &partition.name, metrics, &e));
                return Err(e);
            }
        };

        metrics.insert("colors".to_string(), outcome.num_colors() as f64);
        metrics.insert("oracle_calls".to_string(), outcome.stats.oracle_calls as f64);
        metrics.insert("timeouts".to_string(), outcome.stats.timeouts_skipped as f64);
        metrics.insert("leaves".to_string(), outcome.stats.leaves as f64);
        metrics.insert("elapsed_ms".to_string(), outcome.elapsed.as_secs_f64() * 1000.0);
        self.emit(TelemetryEvent::success(STAGE_COLOR, &partition.name, metrics));

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::info!(
            "Partition '{}': {} colors in {:.1} ms",
            partition.name,
            outcome.num_colors(),
            elapsed_ms
        );

        Ok(PartitionReport::new(
            partition,
            self.oracle.name(),
            &embedding,
            outcome.coloring,
            outcome.stats,
            elapsed_ms,
        ))
    }

    /// Colors every partition in order, stopping at the first failure.
    pub fn run_all(&mut self, partitions: &[Partition]) -> Result<Vec<PartitionReport>> {
        log::info!("Running {} partition(s)", partitions.len());
        partitions
            .iter()
            .map(|partition| self.run_partition(partition))
            .collect()
    }

    fn embed(&mut self, partition: &Partition) -> Result<Embedding> {
        let start = Instant::now();
        let mut metrics = graph_metrics(&partition.graph);
        match Embedder::new(self.config.geometry.clone()).embed(&partition.graph) {
            Ok(embedding) => {
                metrics.insert("elapsed_ms".to_string(), start.elapsed().as_secs_f64() * 1000.0);
                if let Some(bbox) = embedding.bounding_box() {
                    metrics.insert("width".to_string(), bbox.width());
                    metrics.insert("height".to_string(), bbox.height());
                }
                self.emit(TelemetryEvent::success(STAGE_EMBED, &partition.name, metrics));
                Ok(embedding)
            }
            Err(e) => {
                if let BlockadeError::PlacementInfeasible { vertex, attempts } = &e {
                    metrics.insert("failed_vertex".to_string(), *vertex as f64);
                    metrics.insert("attempts".to_string(), *attempts as f64);
                }
                self.emit(TelemetryEvent::failure(STAGE_EMBED, &partition.name, metrics, &e));
                Err(e)
            }
        }
    }

    /// Telemetry write failures are logged, never fatal.
    fn emit(&mut self, event: TelemetryEvent) {
        if let Some(writer) = self.telemetry_writer.as_mut() {
            if let Err(e) = writer.write(&event) {
                log::warn!("Failed to write telemetry to {}: {}", writer.path(), e);
            }
        }
    }
}

fn graph_metrics(graph: &Graph) -> HashMap<String, f64> {
    let mut metrics = HashMap::new();
    metrics.insert("vertices".to_string(), graph.num_vertices as f64);
    metrics.insert("edges".to_string(), graph.num_edges as f64);
    metrics
}

fn check_coloring(graph: &Graph, coloring: &Coloring) -> Result<()> {
    if !coloring.is_complete() {
        return Err(BlockadeError::internal(format!(
            "coloring left {} vertices unassigned",
            coloring.len() - coloring.assigned_count()
        )));
    }
    let conflicts = coloring.validate(graph);
    if conflicts > 0 {
        return Err(BlockadeError::internal(format!(
            "coloring has {} conflicting edges",
            conflicts
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(name: &str, graph: Graph) -> Partition {
        Partition {
            name: name.to_string(),
            graph,
        }
    }

    #[test]
    fn test_report_carries_positions_and_colors() {
        let mut orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)])
            .with_labels(vec!["a".into(), "b".into(), "c".into()]);
        let report = orchestrator.run_partition(&partition("path", graph)).unwrap();

        assert_eq!(report.num_colors, 2);
        assert_eq!(report.oracle, "exact");
        let ids: Vec<_> = report.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(report.nodes.iter().all(|n| n.x >= 0.0 && n.y >= 0.0 && n.color >= 1));
        assert_ne!(report.nodes[0].color, report.nodes[1].color);
        assert_eq!(report.classes.len(), 2);
        let b_class = &report.classes[report.nodes[1].color - 1];
        assert_eq!(b_class, &vec!["b".to_string()]);
        assert_eq!(report.classes.iter().flatten().count(), 3);
    }

    #[test]
    fn test_check_coloring() {
        let graph = Graph::from_edges(2, &[(0, 1)]);
        assert!(check_coloring(&graph, &Coloring::from_colors(vec![1, 2])).is_ok());
        assert!(check_coloring(&graph, &Coloring::from_colors(vec![1, 0])).is_err());
        assert!(check_coloring(&graph, &Coloring::from_colors(vec![2, 2])).is_err());
    }

    #[test]
    fn test_radius_mismatch_aborts_before_embedding() {
        let mut orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
        let graph = Graph::new(2).with_radius(3.0);
        assert!(matches!(
            orchestrator.run_partition(&partition("p", graph)),
            Err(BlockadeError::InconsistentConfiguration { .. })
        ));
    }
}
