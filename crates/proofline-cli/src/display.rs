//! Human-readable rendering of review results and batch summaries.

use std::fmt::Write;

use proofline_core::{DebugBundle, ReportTrace, ReviewResult};
use proofline_sync::BatchSummary;

const RULE: &str = "────────────────────────────────────────";

// ── Single review ──

pub fn render_review(result: &ReviewResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Suspicion score: {}/5 ({})", result.score, verdict(result.score));
    let _ = writeln!(out, "{RULE}");

    if result.is_clean() {
        out.push_str("No objective errors found.\n");
        return out;
    }

    for (title, report) in [
        ("English", &result.content_report),
        ("Korean", &result.translated_report),
        ("Markdown vs plain", &result.markdown_report),
    ] {
        if report.trim().is_empty() {
            continue;
        }
        let _ = writeln!(out, "[{title}]");
        for line in report.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

fn verdict(score: u8) -> &'static str {
    match score {
        0 | 1 => "clean",
        2 => "minor",
        3 => "likely errors",
        _ => "serious errors",
    }
}

// ── Debug trace ──

pub fn render_debug(bundle: &DebugBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Raw reply:");
    let raw = serde_json::to_string_pretty(&bundle.raw).unwrap_or_else(|_| bundle.raw.to_string());
    for line in raw.lines() {
        let _ = writeln!(out, "  {line}");
    }
    for (title, trace) in [
        ("English", &bundle.english),
        ("Korean", &bundle.korean),
        ("Markdown", &bundle.markdown),
    ] {
        render_trace(&mut out, title, trace);
    }
    out
}

fn render_trace(out: &mut String, title: &str, trace: &ReportTrace) {
    if trace.before.is_empty() && trace.after.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title} before:");
    for line in trace.before.lines() {
        let _ = writeln!(out, "  {line}");
    }
    let _ = writeln!(out, "{title} after:");
    for line in trace.after.lines() {
        let _ = writeln!(out, "  {line}");
    }
}

// ── Batch ──

pub fn render_summary(summary: &BatchSummary) -> String {
    let elapsed = (summary.finished_at - summary.started_at).num_milliseconds() as f64 / 1000.0;
    format!(
        "  Rows in sheet:   {}\n  Requested:       {}\n  Reviewed:        {}\n  Elapsed:         {elapsed:.1}s\n",
        summary.total_rows, summary.target_rows, summary.processed_rows
    )
}
