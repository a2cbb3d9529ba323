// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::ScrubContext;

struct Noop(&'static str);

impl Stage for Noop {
    fn name(&self) -> &str {
        self.0
    }

    fn apply(&self, _ctx: &mut ScrubContext) {}
}

fn noop_factory(name: &'static str) -> StageFactory {
    Arc::new(move || Arc::new(Noop(name)) as Arc<dyn Stage>)
}

#[test]
fn builtins_register_in_canonical_order() {
    let registry = StageRegistry::with_builtins();
    assert_eq!(
        registry.stage_names(),
        vec![
            "preflight-stats",
            "llm-artifacts",
            "reference-links",
            "typography",
            "final-cleanup"
        ]
    );
}

#[test]
fn duplicate_registration_fails_without_replace() {
    let mut registry = StageRegistry::with_builtins();
    let err = registry
        .register("typography", Anchor::Append, false, noop_factory("typography"))
        .unwrap_err();
    assert_eq!(err, RegistryError::Duplicate("typography".to_string()));
}

#[test]
fn replace_swaps_in_place_semantics() {
    let mut registry = StageRegistry::new();
    registry.register("one", Anchor::Append, false, noop_factory("one")).unwrap();
    registry.register("two", Anchor::Append, false, noop_factory("two")).unwrap();
    registry.register("one", Anchor::Append, true, noop_factory("one")).unwrap();
    assert_eq!(registry.stage_names(), vec!["two", "one"]);
}

#[test]
fn before_and_after_anchors_position_stages() {
    let mut registry = StageRegistry::new();
    registry.register("mid", Anchor::Append, false, noop_factory("mid")).unwrap();
    registry.register("first", Anchor::Before("mid".into()), false, noop_factory("first")).unwrap();
    registry.register("second", Anchor::After("first".into()), false, noop_factory("second")).unwrap();
    assert_eq!(registry.stage_names(), vec!["first", "second", "mid"]);
}

#[test]
fn missing_anchor_appends() {
    let mut registry = StageRegistry::new();
    registry.register("only", Anchor::Before("ghost".into()), false, noop_factory("only")).unwrap();
    assert_eq!(registry.stage_names(), vec!["only"]);
}

#[test]
fn registration_bumps_version() {
    let mut registry = StageRegistry::new();
    let v0 = registry.version();
    registry.register("a", Anchor::Append, false, noop_factory("a")).unwrap();
    assert!(registry.version() > v0);
}

#[test]
fn default_pipeline_is_memoized_until_version_advances() {
    let mut registry = StageRegistry::with_builtins();
    let first = registry.default_pipeline();
    let second = registry.default_pipeline();
    assert!(Arc::ptr_eq(&first, &second));

    registry.register("extra", Anchor::Append, false, noop_factory("extra")).unwrap();
    let third = registry.default_pipeline();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.stage_names().len(), 6);
}

#[test]
fn explicit_stage_list_bypasses_registry() {
    let pipeline = crate::pipeline::Pipeline::from_stages(vec![Arc::new(Noop("solo"))]);
    assert_eq!(pipeline.stage_names(), vec!["solo"]);
}
