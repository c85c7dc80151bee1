//! Bar chart model and terminal rendering
//!
//! One bar per function in a summary. Values are raw counts, or shares of
//! `trace_count` in percent when percentages are requested.

use crate::summary::TraceSummary;
use clap::ValueEnum;

/// Order in which bars are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Order of first appearance in the trace log (default)
    #[default]
    FirstSeen,
    /// Highest count first
    Count,
    /// Alphabetical by function name
    Name,
}

/// A single labelled bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Raw occurrence count
    pub count: u64,
    /// Plotted value: `count`, or its percentage of the trace count
    pub value: f64,
}

/// Chart built from a trace summary
#[derive(Debug, Clone)]
pub struct BarChart {
    bars: Vec<Bar>,
    percentages: bool,
    trace_count: u64,
}

impl BarChart {
    /// Build the chart for `summary`
    pub fn from_summary(summary: &TraceSummary, percentages: bool, order: SortOrder) -> Self {
        let mut bars: Vec<Bar> = summary
            .data
            .iter()
            .map(|(label, count)| {
                let value = if !percentages {
                    count as f64
                } else if summary.trace_count > 0 {
                    (count as f64 / summary.trace_count as f64) * 100.0
                } else {
                    0.0
                };
                Bar {
                    label: label.to_string(),
                    count,
                    value,
                }
            })
            .collect();

        match order {
            SortOrder::FirstSeen => {}
            SortOrder::Count => {
                bars.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)))
            }
            SortOrder::Name => bars.sort_by(|a, b| a.label.cmp(&b.label)),
        }

        tracing::debug!(bars = bars.len(), percentages, ?order, "built bar chart");

        Self {
            bars,
            percentages,
            trace_count: summary.trace_count,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn is_percentages(&self) -> bool {
        self.percentages
    }

    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    /// Largest plotted value, 0.0 for an empty chart
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }

    /// Plotted value formatted for display
    pub fn format_value(&self, bar: &Bar) -> String {
        if self.percentages {
            format!("{:.2}%", bar.value)
        } else {
            bar.count.to_string()
        }
    }

    /// Render horizontal bars, the longest spanning `width` columns
    pub fn to_text(&self, width: usize) -> String {
        if self.bars.is_empty() {
            return "No functions to chart.\n".to_string();
        }

        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);
        let max = self.max_value();

        let mut out = String::new();
        for bar in &self.bars {
            let len = if max > 0.0 {
                ((bar.value / max) * width as f64).round() as usize
            } else {
                0
            };
            // Non-zero values get at least one cell, never more than `width`
            let len = if bar.value > 0.0 { len.max(1).min(width) } else { 0 };

            out.push_str(&format!(
                "{:<label_width$} │{} {}\n",
                bar.label,
                "█".repeat(len),
                self.format_value(bar),
            ));
        }

        let unit = if self.percentages { "percent of " } else { "" };
        out.push_str(&format!(
            "{:<label_width$} └ {} bars, {}{} trace lines\n",
            "",
            self.bars.len(),
            unit,
            self.trace_count
        ));
        out
    }
}
