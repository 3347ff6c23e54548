//! Reference-check reports.
//!
//! Collects the outcome of each reference check (a built matrix compared with
//! the value documented for an assignment) and writes them out as JSON and as
//! a standalone HTML page grouped by category.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl CheckStatus {
    pub fn css_class(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "passed",
            CheckStatus::Failed => "failed",
            CheckStatus::Skipped => "skipped",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "✓",
            CheckStatus::Failed => "✗",
            CheckStatus::Skipped => "○",
        }
    }
}

/// A single check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check ID (e.g., "A03-R1").
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: CheckStatus,
    pub duration: Duration,
    pub error_message: Option<String>,
    /// Largest element-wise difference from the reference matrix, if one was
    /// compared.
    pub max_error: Option<f32>,
}

impl CheckResult {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        CheckResult {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            status: CheckStatus::Skipped,
            duration: Duration::ZERO,
            error_message: None,
            max_error: None,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_max_error(mut self, max_error: f32) -> Self {
        self.max_error = Some(max_error);
        self
    }

    pub fn pass(mut self, duration: Duration) -> Self {
        self.status = CheckStatus::Passed;
        self.duration = duration;
        self
    }

    pub fn fail(mut self, duration: Duration, error: &str) -> Self {
        self.status = CheckStatus::Failed;
        self.duration = duration;
        self.error_message = Some(error.to_string());
        self
    }

    pub fn skip(mut self, reason: &str) -> Self {
        self.status = CheckStatus::Skipped;
        self.error_message = Some(reason.to_string());
        self
    }
}

/// Category summary statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_duration: Duration,
}

impl CategoryStats {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }

    pub fn add_result(&mut self, result: &CheckResult) {
        self.total += 1;
        self.total_duration += result.duration;
        match result.status {
            CheckStatus::Passed => self.passed += 1,
            CheckStatus::Failed => self.failed += 1,
            CheckStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Full report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub subtitle: String,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<CheckResult>,
    pub metadata: BTreeMap<String, String>,
}

impl Report {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Report {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            generated_at: Utc::now(),
            results: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn add_result(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn overall_stats(&self) -> CategoryStats {
        let mut stats = CategoryStats::default();
        for result in &self.results {
            stats.add_result(result);
        }
        stats
    }

    /// Stats per category, sorted by category name.
    pub fn stats_by_category(&self) -> BTreeMap<String, CategoryStats> {
        let mut map: BTreeMap<String, CategoryStats> = BTreeMap::new();
        for result in &self.results {
            map.entry(result.category.clone())
                .or_default()
                .add_result(result);
        }
        map
    }

    /// Results per category, in insertion order within each category.
    pub fn results_by_category(&self) -> BTreeMap<String, Vec<&CheckResult>> {
        let mut map: BTreeMap<String, Vec<&CheckResult>> = BTreeMap::new();
        for result in &self.results {
            map.entry(result.category.clone()).or_default().push(result);
        }
        map
    }

    /// True when nothing failed. Skipped checks do not count as failures.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status != CheckStatus::Failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results
            .iter()
            .filter(|r| r.status == CheckStatus::Failed)
    }

    pub fn to_html(&self) -> String {
        let stats = self.overall_stats();
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title} - Reference Report</title>
<style>
body {{ font-family: Arial, Helvetica, sans-serif; margin: 2em; color: #222; }}
h1 {{ font-weight: 300; }}
.meta {{ color: #777; }}
table {{ border-collapse: collapse; width: 100%; margin-bottom: 2em; }}
td, th {{ border-bottom: 1px solid #ddd; padding: 6px 10px; text-align: left; }}
.passed {{ color: #3c8d2f; }}
.failed {{ color: #c74545; }}
.skipped {{ color: #b58900; }}
.id, .num {{ font-family: monospace; }}
.error {{ font-family: monospace; white-space: pre-wrap; color: #c74545; }}
</style>
</head>
<body>
<h1>{title}</h1>
<div class="meta">{subtitle}</div>
<div class="meta">Generated: {generated}</div>
<p>{passed}/{total} passed, {failed} failed, {skipped} skipped ({rate:.1}%) in {secs:.3}s</p>
"#,
            title = escape(&self.title),
            subtitle = escape(&self.subtitle),
            generated = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            passed = stats.passed,
            total = stats.total,
            failed = stats.failed,
            skipped = stats.skipped,
            rate = stats.pass_rate(),
            secs = stats.total_duration.as_secs_f64(),
        );

        if !self.metadata.is_empty() {
            html.push_str("<ul class=\"meta\">\n");
            for (k, v) in &self.metadata {
                let _ = writeln!(html, "<li>{}: {}</li>", escape(k), escape(v));
            }
            html.push_str("</ul>\n");
        }

        let by_category = self.stats_by_category();
        for (category, results) in self.results_by_category() {
            let cat = &by_category[&category];
            let _ = write!(
                html,
                "<h2>{} <span class=\"{}\">{}/{}</span></h2>\n<table>\n\
                 <tr><th></th><th>ID</th><th>Check</th><th>Max error</th><th>Time</th></tr>\n",
                escape(&category),
                if cat.failed > 0 { "failed" } else { "passed" },
                cat.passed,
                cat.total,
            );
            for result in results {
                html.push_str(&html_row(result));
            }
            html.push_str("</table>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn save_html(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_html())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

fn html_row(result: &CheckResult) -> String {
    let mut row = format!(
        "<tr><td class=\"{}\">{}</td><td class=\"id\">{}</td><td>{}<br><small>{}</small></td>\
         <td class=\"num\">{}</td><td class=\"num\">{:.3}ms</td></tr>\n",
        result.status.css_class(),
        result.status.icon(),
        escape(&result.id),
        escape(&result.name),
        escape(&result.description),
        result
            .max_error
            .map(|e| format!("{e:.2e}"))
            .unwrap_or_default(),
        result.duration.as_secs_f64() * 1000.0,
    );
    if let Some(ref error) = result.error_message {
        let _ = writeln!(
            row,
            "<tr><td></td><td colspan=\"4\" class=\"error\">{}</td></tr>",
            escape(error)
        );
    }
    row
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Report builder with fluent API.
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new(title: &str) -> Self {
        ReportBuilder {
            report: Report::new(title, ""),
        }
    }

    pub fn subtitle(mut self, subtitle: &str) -> Self {
        self.report.subtitle = subtitle.to_string();
        self
    }

    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.report
            .metadata
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn add_check(mut self, result: CheckResult) -> Self {
        self.report.add_result(result);
        self
    }

    pub fn build(self) -> Report {
        self.report
    }
}
