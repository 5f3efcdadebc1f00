#![forbid(unsafe_code)]

//! Dry-run a tour on a virtual clock and collect what it did, when.
//!
//! The runner jumps the clock from one timer deadline to the next, so a
//! ten-minute tour takes microseconds. Every presenter call is stamped with
//! the virtual time it happened at.

use std::fmt::Write as _;
use std::time::Duration;

use ftui_tour::{
    HaltReason, TimerQueue, TourController, WidgetArena, WidgetId, WidgetIndex, WidgetTree,
};
use serde_json::json;

use crate::document::HarnessDocument;
use crate::recorder::{PresenterCall, RecordingPresenter};

/// A presenter call and when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub at: Duration,
    pub call: PresenterCall,
}

/// Result of a dry run.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Presenter calls in order.
    pub entries: Vec<TimelineEntry>,
    /// Why playback stopped, if it stopped on its own.
    pub halt: Option<HaltReason>,
    /// Virtual time at the end of the run.
    pub end: Duration,
    /// Whether the run hit the time limit with a timer still pending.
    pub truncated: bool,
    /// Widget names, for rendering entries.
    names: Vec<(WidgetId, String)>,
}

impl Timeline {
    /// Play `doc` from its first step until it halts or `limit` is reached.
    #[must_use]
    pub fn run(doc: &HarnessDocument, limit: Duration) -> Self {
        let tree = doc.tree();
        let mut timers = TimerQueue::new();
        let mut recorder = RecordingPresenter::new(doc.config.popover.clone());
        let mut entries = Vec::new();

        let (halt, end, truncated) = {
            let mut tour = TourController::new(&mut timers, &mut recorder)
                .with_config(doc.config.clone())
                .with_toplevel(&tree);
            tour.extend_script(doc.steps.iter().cloned());

            tour.play();
            let mut seen = stamp(tour.presenter(), 0, tour.now(), &mut entries);

            while let Some(deadline) = tour.scheduler().next_deadline() {
                if deadline > limit {
                    break;
                }
                let dt = deadline.saturating_sub(tour.now());
                tour.tick(dt);
                seen = stamp(tour.presenter(), seen, tour.now(), &mut entries);
            }

            tracing::debug!(
                entries = entries.len(),
                end_ms = tour.now().as_millis() as u64,
                "dry run finished"
            );
            (tour.last_halt().cloned(), tour.now(), tour.is_pending())
        };

        Self {
            entries,
            halt,
            end,
            truncated,
            names: widget_names(&tree),
        }
    }

    /// Name of `widget` in the fixture tree, or its handle.
    #[must_use]
    pub fn widget_label(&self, widget: WidgetId) -> String {
        self.names
            .iter()
            .find(|(id, _)| *id == widget)
            .map_or_else(|| widget.to_string(), |(_, name)| name.clone())
    }

    /// Widgets highlighted over the run, in order.
    #[must_use]
    pub fn highlights(&self) -> Vec<(Duration, String)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.call {
                PresenterCall::AddClass { widget, .. } => Some((e.at, self.widget_label(*widget))),
                _ => None,
            })
            .collect()
    }

    /// Human-readable listing, one line per entry plus a summary line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "{:>9.3}s  {}",
                entry.at.as_secs_f64(),
                self.describe(&entry.call)
            );
        }
        let _ = writeln!(out, "{:>9.3}s  {}", self.end.as_secs_f64(), self.summary());
        out
    }

    /// One JSON object per entry, then a summary object.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let mut obj = json!({
                "at_ms": entry.at.as_millis() as u64,
                "op": entry.call.op(),
            });
            match &entry.call {
                PresenterCall::AddClass { widget, class }
                | PresenterCall::RemoveClass { widget, class } => {
                    obj["widget"] = json!(self.widget_label(*widget));
                    obj["class"] = json!(class);
                }
                PresenterCall::SetAnchor(widget) => {
                    obj["widget"] = json!(widget.map(|w| self.widget_label(w)));
                }
                PresenterCall::SetText(text) => obj["text"] = json!(text),
                PresenterCall::Popup | PresenterCall::Popdown => {}
            }
            let _ = writeln!(out, "{obj}");
        }
        let summary = json!({
            "at_ms": self.end.as_millis() as u64,
            "op": "end",
            "halt": self.halt.as_ref().map(ToString::to_string),
            "truncated": self.truncated,
        });
        let _ = writeln!(out, "{summary}");
        out
    }

    fn describe(&self, call: &PresenterCall) -> String {
        match call {
            PresenterCall::AddClass { widget, class } => {
                format!("highlight {} (+{class})", self.widget_label(*widget))
            }
            PresenterCall::RemoveClass { widget, class } => {
                format!("unhighlight {} (-{class})", self.widget_label(*widget))
            }
            PresenterCall::SetAnchor(Some(widget)) => {
                format!("anchor popover to {}", self.widget_label(*widget))
            }
            PresenterCall::SetAnchor(None) => "detach popover".to_owned(),
            PresenterCall::SetText(text) => format!("text {text:?}"),
            PresenterCall::Popup => "show popover".to_owned(),
            PresenterCall::Popdown => "hide popover".to_owned(),
        }
    }

    fn summary(&self) -> String {
        match (&self.halt, self.truncated) {
            (_, true) => "stopped at time limit".to_owned(),
            (Some(reason), false) => format!("halted: {reason}"),
            (None, false) => "halted".to_owned(),
        }
    }
}

/// Append calls past `seen`, stamped `at`. Returns the new high-water mark.
fn stamp(
    recorder: &RecordingPresenter,
    seen: usize,
    at: Duration,
    entries: &mut Vec<TimelineEntry>,
) -> usize {
    let calls = recorder.calls();
    entries.extend(calls[seen..].iter().cloned().map(|call| TimelineEntry { at, call }));
    calls.len()
}

fn widget_names(tree: &WidgetArena) -> Vec<(WidgetId, String)> {
    let index = WidgetIndex::build(tree);
    index
        .names()
        .into_iter()
        .filter_map(|name| index.get(name).map(|id| (id, name.to_owned())))
        .chain(std::iter::once((tree.root(), tree.type_name(tree.root()).to_owned())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::WidgetSpec;
    use ftui_tour::ScriptStep;

    fn doc() -> HarnessDocument {
        HarnessDocument {
            widgets: vec![WidgetSpec::named("Button", "a"), WidgetSpec::named("Entry", "b")],
            steps: vec![ScriptStep::new("a", "Hi", 2), ScriptStep::new("b", "Bye", 1)],
            ..HarnessDocument::default()
        }
    }

    #[test]
    fn runs_to_completion() {
        let timeline = Timeline::run(&doc(), Duration::from_secs(60));
        assert_eq!(timeline.halt, Some(HaltReason::Completed));
        assert!(!timeline.truncated);
        assert_eq!(timeline.end, Duration::from_millis(3500));
        assert_eq!(
            timeline.highlights(),
            vec![
                (Duration::ZERO, "a".to_string()),
                (Duration::from_millis(2250), "b".to_string()),
            ]
        );
    }

    #[test]
    fn stops_at_limit() {
        let timeline = Timeline::run(&doc(), Duration::from_secs(1));
        assert!(timeline.truncated);
        assert_eq!(timeline.halt, None);
        assert!(timeline.to_text().ends_with("stopped at time limit\n"));
    }

    #[test]
    fn unresolved_step_ends_run() {
        let mut d = doc();
        d.steps.insert(1, ScriptStep::new("ghost", "?", 1));
        let timeline = Timeline::run(&d, Duration::from_secs(60));
        assert!(matches!(timeline.halt, Some(HaltReason::Unresolved { step: 1, .. })));
        assert_eq!(timeline.highlights().len(), 1);
    }

    #[test]
    fn text_lists_each_call() {
        let timeline = Timeline::run(&doc(), Duration::from_secs(60));
        let text = timeline.to_text();
        assert!(text.contains("    0.000s  highlight a (+tour-highlight)"));
        assert!(text.contains("    2.250s  text \"Bye\""));
        assert!(text.ends_with("halted: tour completed\n"));
    }

    #[test]
    fn jsonl_lines_parse() {
        let timeline = Timeline::run(&doc(), Duration::from_secs(60));
        let lines: Vec<serde_json::Value> = timeline
            .to_jsonl()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), timeline.entries.len() + 1);
        assert_eq!(lines[0]["op"], "add_class");
        assert_eq!(lines[0]["widget"], "a");
        let last = lines.last().unwrap();
        assert_eq!(last["op"], "end");
        assert_eq!(last["halt"], "tour completed");
        assert_eq!(last["at_ms"], 3500);
    }
}
