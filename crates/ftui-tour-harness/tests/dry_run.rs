#![forbid(unsafe_code)]

//! Dry-run tests over the bundled tour documents and ad-hoc fixtures.

use std::path::PathBuf;
use std::time::Duration;

use ftui_tour::HaltReason;
use ftui_tour_harness::cli::{CheckArgs, RunArgs, check_tour, run_tour};
use ftui_tour_harness::{HarnessDocument, HarnessError, PresenterCall, Timeline};

fn onboarding() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tours/onboarding.toml")
}

#[test]
fn onboarding_tour_visits_every_step() {
    let doc = HarnessDocument::from_file(onboarding()).unwrap();
    let timeline = Timeline::run(&doc, Duration::from_secs(600));

    assert_eq!(timeline.halt, Some(HaltReason::Completed));
    assert!(!timeline.truncated);
    assert_eq!(timeline.end, Duration::from_secs(14));

    let visited: Vec<String> = timeline.highlights().into_iter().map(|(_, w)| w).collect();
    assert_eq!(visited, ["new-project", "project-list", "search", "main-menu"]);

    let starts: Vec<Duration> = timeline.highlights().into_iter().map(|(t, _)| t).collect();
    assert_eq!(
        starts,
        [
            Duration::ZERO,
            Duration::from_millis(4250),
            Duration::from_millis(7500),
            Duration::from_millis(10750),
        ]
    );
}

#[test]
fn onboarding_tour_never_overlaps_highlights() {
    let doc = HarnessDocument::from_file(onboarding()).unwrap();
    let timeline = Timeline::run(&doc, Duration::from_secs(600));

    let mut lit = 0i32;
    for entry in &timeline.entries {
        match entry.call {
            PresenterCall::AddClass { .. } => lit += 1,
            PresenterCall::RemoveClass { .. } => lit -= 1,
            _ => {}
        }
        assert!((0..=1).contains(&lit), "at {:?}: {lit} highlights", entry.at);
    }
    assert_eq!(lit, 0);
}

#[test]
fn check_passes_for_onboarding() {
    let mut out = Vec::new();
    check_tour(&CheckArgs { file: onboarding() }, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "4 step(s), 4 resolved, 0 missing (13s of holds)\n");
}

#[test]
fn check_reports_missing_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{
            "widget": [{"type": "Button", "name": "ok"}],
            "step": [
                {"name": "ok", "text": "fine", "delay_secs": 1},
                {"name": "gone", "text": "not here", "delay_secs": 1}
            ]
        }"#,
    )
    .unwrap();

    let mut out = Vec::new();
    let err = check_tour(&CheckArgs { file: path }, &mut out).unwrap_err();
    assert!(matches!(err, HarnessError::Unresolved { count: 1 }));
    assert_eq!(err.exit_code(), 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("step 1: no widget named \"gone\"\n"));
}

#[test]
fn run_writes_jsonl_and_flags_truncation() {
    let mut out = Vec::new();
    let args = RunArgs {
        file: onboarding(),
        json: true,
        limit_secs: 5,
    };
    let err = run_tour(&args, &mut out).unwrap_err();
    assert!(matches!(err, HarnessError::Truncated { limit_secs: 5 }));

    let text = String::from_utf8(out).unwrap();
    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["op"], "end");
    assert_eq!(last["truncated"], true);
}

#[test]
fn invalid_config_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[config.popover]\nmax_width_chars = 0\n").unwrap();

    let err = check_tour(&CheckArgs { file: path.clone() }, &mut Vec::new()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&path.display().to_string()));
    assert!(message.contains("popover.max_width_chars must be > 0"));
}
