// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned stage registry with a memoized default pipeline

use crate::pipeline::{Pipeline, Stage};
use crate::stages;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Factory producing a fresh stage instance.
pub type StageFactory = Arc<dyn Fn() -> Arc<dyn Stage> + Send + Sync>;

/// Where a newly registered stage lands relative to existing ones.
///
/// A named anchor that does not exist degrades to append, matching the
/// registry's permissive ordering contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Append,
    Before(String),
    After(String),
}

/// Errors from stage registration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("stage {0:?} is already registered")]
    Duplicate(String),
}

/// Ordered stage factories plus a version counter.
///
/// The default pipeline is memoized against the version: registrations bump
/// the version and the next `default_pipeline` call rebuilds.
pub struct StageRegistry {
    entries: Vec<(String, StageFactory)>,
    version: u64,
    cached: Mutex<Option<(u64, Arc<Pipeline>)>>,
}

impl StageRegistry {
    /// An empty registry. Most callers want [`StageRegistry::with_builtins`].
    pub fn new() -> Self {
        Self { entries: Vec::new(), version: 0, cached: Mutex::new(None) }
    }

    /// Registry pre-loaded with the built-in scrub stages in order:
    /// preflight-stats, llm-artifacts, reference-links, typography,
    /// final-cleanup.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins: Vec<(&str, StageFactory)> = vec![
            (stages::PREFLIGHT, Arc::new(|| Arc::new(stages::PreflightStats) as Arc<dyn Stage>)),
            (stages::LLM_ARTIFACTS, Arc::new(|| Arc::new(stages::LlmArtifacts) as Arc<dyn Stage>)),
            (
                stages::REFERENCE_LINKS,
                Arc::new(|| Arc::new(stages::ReferenceLinks) as Arc<dyn Stage>),
            ),
            (stages::TYPOGRAPHY, Arc::new(|| Arc::new(stages::Typography) as Arc<dyn Stage>)),
            (stages::FINAL_CLEANUP, Arc::new(|| Arc::new(stages::FinalCleanup) as Arc<dyn Stage>)),
        ];
        for (name, factory) in builtins {
            // Fresh registry, names are distinct: registration cannot fail.
            let _ = registry.register(name, Anchor::Append, false, factory);
        }
        registry
    }

    /// Register a stage factory under `name`.
    ///
    /// `replace` first removes any existing entry with the same name;
    /// without it a duplicate name is an error.
    pub fn register(
        &mut self,
        name: &str,
        anchor: Anchor,
        replace: bool,
        factory: StageFactory,
    ) -> Result<(), RegistryError> {
        if replace {
            self.entries.retain(|(existing, _)| existing != name);
        } else if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }

        let entry = (name.to_string(), factory);
        match anchor {
            Anchor::Append => self.entries.push(entry),
            Anchor::Before(target) => {
                match self.entries.iter().position(|(n, _)| *n == target) {
                    Some(idx) => self.entries.insert(idx, entry),
                    None => self.entries.push(entry),
                }
            }
            Anchor::After(target) => match self.entries.iter().position(|(n, _)| *n == target) {
                Some(idx) => self.entries.insert(idx + 1, entry),
                None => self.entries.push(entry),
            },
        }
        self.version += 1;
        Ok(())
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The pipeline of all registered stages, memoized per version.
    pub fn default_pipeline(&self) -> Arc<Pipeline> {
        let mut cached = self.cached.lock();
        if let Some((version, pipeline)) = cached.as_ref() {
            if *version == self.version {
                return Arc::clone(pipeline);
            }
        }
        let pipeline =
            Arc::new(Pipeline::from_stages(self.entries.iter().map(|(_, f)| f()).collect()));
        *cached = Some((self.version, Arc::clone(&pipeline)));
        pipeline
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
