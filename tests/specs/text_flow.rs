// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text-scrub scenarios over the default pipeline

use std::sync::Arc;
use tess_text::{Anchor, Pipeline, ScrubContext, Stage, StageFactory, StageRegistry};

fn run(text: &str) -> tess_text::PipelineOutput {
    StageRegistry::with_builtins().default_pipeline().run(text)
}

#[test]
fn citation_brackets_scenario() {
    let out = run("See (cite turn0search1) and [cite turn2fetch3 example.com].");
    assert!(!out.text.contains("cite"));
    assert!(!out.text.to_lowercase().contains("turn0"));
    assert!(!out.text.contains("()"));
    assert!(!out.text.contains("[]"));
    assert!(out.stats.get("llm_bracket_groups").copied().unwrap_or(0) >= 2);
}

#[test]
fn undefined_reference_link_scenario() {
    let out = run("Проверка [ssi.inc][3] в тексте без определений");
    assert!(out.text.contains("https://ssi.inc"), "text: {:?}", out.text);
    assert!(out.stats.get("reference_links").copied().unwrap_or(0) >= 1);
}

#[test]
fn no_citation_artifacts_survive_any_input() {
    let corpus = [
        "turn1search2 leading",
        "nested ((cite turn3view4))",
        "mixed «quotes» and turn5news6 dashes — here",
        "bullets\n• one (turn7maps8)\n• two",
        "cite turn9calc10 turn11time12 tail",
    ];
    for input in corpus {
        let out = run(input);
        let lower = out.text.to_lowercase();
        for (a, b) in [("turn", "search"), ("turn", "view"), ("turn", "news")] {
            assert!(
                !(lower.contains(a) && lower.contains(b)),
                "{input:?} left artifacts: {:?}",
                out.text
            );
        }
        for pair in ["()", "[]", "{}"] {
            assert!(!out.text.contains(pair), "{input:?} left {pair}: {:?}", out.text);
        }
    }
}

#[test]
fn typography_is_normalized_end_to_end() {
    let out = run("«Привет» — мир\u{00A0}людей");
    assert_eq!(out.text, "\"Привет\" - мир людей");
    assert_eq!(out.stats.get("dashes"), Some(&1));
    assert_eq!(out.stats.get("quotes"), Some(&2));
    assert_eq!(out.stats.get("nbsp"), Some(&1));
}

struct Marker;

impl Stage for Marker {
    fn name(&self) -> &str {
        "marker"
    }

    fn apply(&self, ctx: &mut ScrubContext) {
        let text = format!("{}!", ctx.text);
        ctx.set_text(text);
    }
}

#[test]
fn duplicate_stage_registration_fails() {
    let mut registry = StageRegistry::with_builtins();
    let factory: StageFactory = Arc::new(|| Arc::new(Marker) as Arc<dyn Stage>);
    registry.register("marker", Anchor::Append, false, factory.clone()).unwrap();
    assert!(registry.register("marker", Anchor::Append, false, factory).is_err());
}

#[test]
fn explicit_stage_list_bypasses_registry() {
    let pipeline = Pipeline::from_stages(vec![Arc::new(Marker)]);
    assert_eq!(pipeline.run("x").text, "x!");
}
