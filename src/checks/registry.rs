//! Executor registry
//!
//! An explicit table from criterion id to executor, built once per engine.
//! Lookups for ids without an executor return `None`; the orchestrators skip
//! those criteria.

use super::base::CheckExecutor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    executors: Vec<Arc<dyn CheckExecutor>>,
    index: HashMap<&'static str, usize>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in executor
    pub fn builtin() -> Self {
        super::default_executors()
            .into_iter()
            .fold(Self::new(), |registry, executor| registry.with(executor))
    }

    /// Register an executor; a later registration for the same id replaces the earlier one
    pub fn with(mut self, executor: Arc<dyn CheckExecutor>) -> Self {
        self.register(executor);
        self
    }

    pub fn register(&mut self, executor: Arc<dyn CheckExecutor>) {
        let id = executor.id();
        if let Some(&slot) = self.index.get(id) {
            warn!("Executor for {} registered twice, keeping the later one", id);
            self.executors[slot] = executor;
        } else {
            self.index.insert(id, self.executors.len());
            self.executors.push(executor);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn CheckExecutor>> {
        self.index.get(id).map(|&i| &self.executors[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.executors.iter().map(|e| e.id())
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("executors", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}
