// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered stage execution

use crate::context::ScrubContext;
use std::collections::HashMap;
use std::sync::Arc;

/// One transformation step over the scrub context.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, ctx: &mut ScrubContext);
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub text: String,
    pub stats: HashMap<String, i64>,
}

impl PipelineOutput {
    /// Stats that recorded at least one change, sorted by key.
    pub fn nonzero_stats(&self) -> Vec<(String, i64)> {
        let mut out: Vec<(String, i64)> =
            self.stats.iter().filter(|(_, v)| **v != 0).map(|(k, v)| (k.clone(), *v)).collect();
        out.sort();
        out
    }
}

/// An immutable, ordered list of stages.
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    /// Build from an explicit stage list, bypassing any registry.
    pub fn from_stages(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, text: &str) -> PipelineOutput {
        let mut ctx = ScrubContext::new(text);
        for stage in &self.stages {
            tracing::trace!(stage = stage.name(), "applying scrub stage");
            stage.apply(&mut ctx);
        }
        PipelineOutput { text: ctx.text, stats: ctx.stats }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
