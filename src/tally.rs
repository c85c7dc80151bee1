//! Per-function trace counting
//!
//! Scans a trace log line by line and counts how often each function name
//! appears behind the trace marker. Function names keep the order in which
//! they were first seen, so downstream output follows the log.

use crate::filter::FunctionFilter;
use crate::pattern::TracePattern;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;

/// Function name to occurrence count, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionCounts {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FunctionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `name`, appending it if unseen
    pub fn increment(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += 1,
            None => self.push(name.to_string(), 1),
        }
    }

    /// Set the count for `name`; an existing name keeps its position
    pub fn insert(&mut self, name: String, count: u64) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = count,
            None => self.push(name, count),
        }
    }

    fn push(&mut self, name: String, count: u64) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, count));
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, count)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Sum of all counts, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// Sum of all counts, `None` if it does not fit in a `u64`
    pub fn checked_total(&self) -> Option<u64> {
        self.entries
            .iter()
            .try_fold(0u64, |acc, (_, count)| acc.checked_add(*count))
    }
}

impl Serialize for FunctionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

struct FunctionCountsVisitor;

impl<'de> Visitor<'de> for FunctionCountsVisitor {
    type Value = FunctionCounts;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of function names to non-negative counts")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut counts = FunctionCounts::new();
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            counts.insert(name, count);
        }
        Ok(counts)
    }
}

impl<'de> Deserialize<'de> for FunctionCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FunctionCountsVisitor)
    }
}

/// Split a chunk ending at `\n` (or EOF) into lines.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    body.split(|&b| b == b'\r')
}

/// Accumulates trace lines into per-function counts
#[derive(Debug, Default)]
pub struct FunctionTally {
    trace_count: u64,
    counts: FunctionCounts,
}

impl FunctionTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one trace line emitted by `function_name`
    pub fn record(&mut self, function_name: &str) {
        self.trace_count += 1;
        self.counts.increment(function_name);
    }

    /// Count every trace line in `reader` that passes `filter`
    ///
    /// Lines that are not valid UTF-8 are decoded lossily.
    pub fn scan<R: BufRead>(
        mut reader: R,
        pattern: &TracePattern,
        filter: &FunctionFilter,
    ) -> std::io::Result<Self> {
        let mut tally = Self::new();
        let mut buf = Vec::new();
        let mut lines_read: u64 = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            for record in split_lines(&buf) {
                lines_read += 1;

                let line = String::from_utf8_lossy(record);
                if let Some(name) = pattern.function_name(&line) {
                    if filter.should_count(name) {
                        tally.record(name);
                    } else {
                        tracing::trace!(function = name, "skipped by filter");
                    }
                }
            }
        }

        tracing::debug!(
            lines_read,
            trace_count = tally.trace_count,
            functions = tally.counts.len(),
            "scan complete"
        );
        Ok(tally)
    }

    /// Number of trace lines recorded
    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    pub fn counts(&self) -> &FunctionCounts {
        &self.counts
    }

    /// Consume the tally, yielding `(trace_count, counts)`
    pub fn into_parts(self) -> (u64, FunctionCounts) {
        (self.trace_count, self.counts)
    }

    /// Render the summary table, sorted by call count (descending)
    pub fn format_summary(&self) -> String {
        if self.counts.is_empty() {
            return "No trace lines matched.\n".to_string();
        }

        let mut sorted: Vec<_> = self.counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let mut out = String::new();
        out.push_str(&format!("{:>7} {:>10}  {}\n", "% calls", "calls", "function"));
        out.push_str(&format!("{} {}  {}\n", "-".repeat(7), "-".repeat(10), "-".repeat(24)));

        for (name, count) in sorted {
            let percent = if self.trace_count > 0 {
                (count as f64 / self.trace_count as f64) * 100.0
            } else {
                0.0
            };
            out.push_str(&format!("{:>7.2} {:>10}  {}\n", percent, count, name));
        }

        out.push_str(&format!("{} {}  {}\n", "-".repeat(7), "-".repeat(10), "-".repeat(24)));
        out.push_str(&format!("{:>7.2} {:>10}  total\n", 100.0, self.trace_count));
        out
    }

    /// Print the summary table to stderr
    pub fn print_summary(&self) {
        eprint!("{}", self.format_summary());
    }
}
