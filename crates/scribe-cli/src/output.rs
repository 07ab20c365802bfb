//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use scribe_batch::BatchReport;
use scribe_domain::Node;
use scribe_planner::{Plan, TermLookup};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format nodes found by a collection search.
    pub fn format_nodes(&self, nodes: &[Node]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_nodes: Vec<serde_json::Value> = nodes
                    .iter()
                    .map(|n| {
                        serde_json::json!({
                            "nid": n.id.value(),
                            "uuid": n.uuid,
                            "title": n.title,
                            "bundle": n.bundle,
                            "model": n.model.map(|m| m.value()),
                            "label": n.label(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json_nodes)?)
            }
            OutputFormat::Quiet => Ok(ids(nodes.iter().map(|n| n.id.value()))),
            OutputFormat::Table => {
                if nodes.is_empty() {
                    return Ok(self.colorize("No collections found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["NID", "Title", "Model", "Submit as"]);
                for node in nodes {
                    builder.push_record([
                        node.id.to_string(),
                        node.title.clone(),
                        node.model.map(|m| m.to_string()).unwrap_or_default(),
                        node.label(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format vocabulary lookups.
    pub fn format_terms(&self, lookups: &[TermLookup]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_terms: Vec<serde_json::Value> = lookups
                    .iter()
                    .map(|l| {
                        serde_json::json!({
                            "concept": l.vocabulary.label(),
                            "uri": l.vocabulary.uri(),
                            "tid": l.term.map(|t| t.value()),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json_terms)?)
            }
            OutputFormat::Quiet => Ok(lookups
                .iter()
                .map(|l| l.term.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Concept", "URI", "Term"]);
                for lookup in lookups {
                    let term = match lookup.term {
                        Some(tid) => tid.to_string(),
                        None => self.colorize("missing", "red"),
                    };
                    builder.push_record([
                        lookup.vocabulary.label().to_string(),
                        lookup.vocabulary.uri().to_string(),
                        term,
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format a discovery preview.
    pub fn format_plan(&self, plan: &Plan) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "root": plan.root.value(),
                    "iterations": plan.expansion.iterations,
                    "containers": plan.expansion.containers.iter().map(|id| id.value()).collect::<Vec<_>>(),
                    "pending": plan.pending.iter().map(|id| id.value()).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(ids(plan.pending.iter().map(|id| id.value()))),
            OutputFormat::Table => {
                let mut lines = vec![
                    format!(
                        "Containers: {} (found in {} iterations)",
                        plan.expansion.containers.len(),
                        plan.expansion.iterations
                    ),
                    format!("Pages without extracted text: {}", plan.pending.len()),
                ];

                if !plan.pending.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["#", "NID"]);
                    for (i, id) in plan.pending.iter().enumerate() {
                        builder.push_record([(i + 1).to_string(), id.to_string()]);
                    }
                    lines.push(self.table(builder));
                }

                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the final batch report.
    pub fn format_report(&self, report: &BatchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "total": report.total,
                    "succeeded": report.succeeded,
                    "failed": report.failed,
                    "ticks": report.ticks,
                    "elapsed_secs": report.elapsed.as_secs_f64(),
                    "failures": report.failures.iter().map(|f| serde_json::json!({
                        "unit": f.index + 1,
                        "label": f.label,
                        "message": f.message,
                    })).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(format!("{} {}", report.succeeded, report.failed)),
            OutputFormat::Table => {
                if report.has_failures() {
                    Ok(self.colorize(&report.summary(), "yellow"))
                } else {
                    Ok(report.summary())
                }
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn ids<I: Iterator<Item = u64>>(values: I) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join("\n")
}
