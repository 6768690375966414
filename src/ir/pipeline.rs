use std::collections::HashMap;
use std::sync::Arc;

use petgraph::Graph;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use tracing::{debug, info};

use super::compilation_unit::CompilationUnit;
use super::errors::{PassError, PipelineError};
use super::transforms::{RelativesInjectionPass, SymbolTablePass, TypeFlatteningPass};
use crate::config::FrontendConfig;

/// A compilation step over a whole unit.
pub trait Pass: Send + Sync {
    fn run(&self, unit: &mut CompilationUnit) -> Result<(), PassError>;
}

/// Manages a pipeline of passes applied to a compilation unit.
/// Passes are organized in a dependency graph and executed in topological order,
/// ensuring that dependent passes run after their prerequisites.
pub struct Pipeline {
    /// The dependency graph of transformations.
    graph: Graph<Transform, ()>,
    /// Maps transformation IDs to their indices in the graph.
    node_indices: HashMap<String, NodeIndex>,
}

/// Represents a single transformation in the pipeline, including its pass and dependencies.
#[derive(Clone)]
pub struct Transform {
    /// Unique identifier for the transformation.
    pub id: String,
    /// List of transformation IDs this transform depends on.
    pub dependencies: Vec<String>,
    /// The pass implementing the transformation logic.
    pub pass: Arc<dyn Pass>,
}

impl Transform {
    pub fn new(id: impl Into<String>, dependencies: &[&str], pass: Arc<dyn Pass>) -> Self {
        Transform {
            id: id.into(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            pass,
        }
    }
}

pub const RELATIVES: &str = "relatives";
pub const SYMBOL_TABLE: &str = "symbol_table";
pub const TYPE_FLATTENING: &str = "type_flattening";

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates a new, empty transformation pipeline.
    pub fn new() -> Self {
        Pipeline {
            graph: Graph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// The front end passes: relatives injection, then symbol tables, then
    /// type flattening when enabled.
    pub fn standard(config: &FrontendConfig) -> Self {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new(RELATIVES, &[], Arc::new(RelativesInjectionPass)));
        pipeline.add_transform(Transform::new(
            SYMBOL_TABLE,
            &[RELATIVES],
            Arc::new(SymbolTablePass {
                duplicate_policy: config.duplicate_policy,
                global_scope_name: config.global_scope_name.clone(),
            }),
        ));
        if config.flatten_types {
            pipeline.add_transform(Transform::new(TYPE_FLATTENING, &[SYMBOL_TABLE], Arc::new(TypeFlatteningPass)));
        }
        pipeline
    }

    /// Adds a transformation, linking it to its dependencies.
    ///
    /// Dependencies may be added before or after their dependents; an id
    /// that is never added is ignored.
    pub fn add_transform(&mut self, transform: Transform) {
        let id = transform.id.clone();
        let dependencies = transform.dependencies.clone();
        let node = self.graph.add_node(transform);
        self.node_indices.insert(id.clone(), node);
        for dep_id in &dependencies {
            if let Some(dep_node) = self.node_indices.get(dep_id) {
                self.graph.add_edge(*dep_node, node, ());
            }
        }
        let dependents: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&other| other != node && self.graph[other].dependencies.contains(&id))
            .collect();
        for dependent in dependents {
            self.graph.update_edge(node, dependent, ());
        }
    }

    /// Removes a transformation from the pipeline by its ID.
    pub fn remove_transform(&mut self, id: &str) {
        if let Some(node) = self.node_indices.remove(id) {
            self.graph.remove_node(node);
            // remove_node swaps the last node into the freed index
            self.node_indices = self
                .graph
                .node_indices()
                .map(|index| (self.graph[index].id.clone(), index))
                .collect();
        }
    }

    /// Transformation ids in the order `apply` runs them.
    pub fn order(&self) -> Result<Vec<String>, PipelineError> {
        let order = toposort(&self.graph, None).map_err(|cycle| PipelineError::Cycle {
            id: self.graph[cycle.node_id()].id.clone(),
        })?;
        Ok(order.into_iter().map(|index| self.graph[index].id.clone()).collect())
    }

    /// Applies all transformations to `unit` in topological order, stopping at
    /// the first failure.
    pub fn apply(&self, unit: &mut CompilationUnit) -> Result<(), PipelineError> {
        let order = toposort(&self.graph, None).map_err(|cycle| PipelineError::Cycle {
            id: self.graph[cycle.node_id()].id.clone(),
        })?;
        info!("Running {} transforms", order.len());
        for node_idx in order {
            let transform = &self.graph[node_idx];
            debug!("Running transform '{}'", transform.id);
            transform
                .pass
                .run(unit)
                .map_err(|source| PipelineError::Pass { id: transform.id.clone(), source })?;
        }
        Ok(())
    }
}
