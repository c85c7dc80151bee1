//! Function count summary file
//!
//! The interchange format between `tally` and `chart`:
//!
//! ```json
//! {
//! 	"trace_count": 3,
//! 	"data": {
//! 		"eval": 2,
//! 		"join": 1
//! 	}
//! }
//! ```

use crate::error::{Result, TallyError};
use crate::tally::{FunctionCounts, FunctionTally};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Path that stands for stdin/stdout instead of a file
pub const STDIO_PATH: &str = "-";

/// Root JSON structure of a summary file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    /// Total number of trace lines matched
    pub trace_count: u64,
    /// Occurrences per function, in first-seen order
    pub data: FunctionCounts,
}

struct TraceSummaryVisitor;

impl<'de> Visitor<'de> for TraceSummaryVisitor {
    type Value = TraceSummary;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object with trace_count and data")
    }

    // A repeated key replaces the earlier value
    fn visit_map<M: MapAccess<'de>>(
        self,
        mut access: M,
    ) -> std::result::Result<Self::Value, M::Error> {
        let mut trace_count = None;
        let mut data = None;

        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "trace_count" => trace_count = Some(access.next_value::<u64>()?),
                "data" => data = Some(access.next_value::<FunctionCounts>()?),
                _ => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }

        let trace_count =
            trace_count.ok_or_else(|| <M::Error as de::Error>::missing_field("trace_count"))?;
        let data = data.ok_or_else(|| <M::Error as de::Error>::missing_field("data"))?;
        Ok(TraceSummary { trace_count, data })
    }
}

impl<'de> Deserialize<'de> for TraceSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(TraceSummaryVisitor)
    }
}

impl From<FunctionTally> for TraceSummary {
    fn from(tally: FunctionTally) -> Self {
        let (trace_count, data) = tally.into_parts();
        Self { trace_count, data }
    }
}

impl TraceSummary {
    /// Whether `trace_count` agrees with the sum of the per-function counts
    ///
    /// A sum that overflows `u64` never agrees.
    pub fn is_consistent(&self) -> bool {
        self.data.checked_total() == Some(self.trace_count)
    }

    /// Serialize as tab-indented JSON with a trailing newline
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_json(&mut buf)
            .map_err(|e| TallyError::io("<memory>", e))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn write_json<W: Write>(&self, writer: W) -> std::io::Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut ser)?;
        ser.into_inner().write_all(b"\n")
    }

    /// Parse a summary from any reader; `source` names it in errors
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let summary: TraceSummary =
            serde_json::from_reader(reader).map_err(|e| TallyError::json(source, e))?;

        if !summary.is_consistent() {
            tracing::warn!(
                path = %source.display(),
                trace_count = summary.trace_count,
                data_total = ?summary.data.checked_total(),
                "trace_count does not match the sum of function counts"
            );
        }

        Ok(summary)
    }

    /// Load a summary from `path`, or stdin when `path` is `-`
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading summary");

        if path.as_os_str() == STDIO_PATH {
            return Self::from_reader(std::io::stdin().lock(), path);
        }

        let file = File::open(path).map_err(|e| TallyError::io(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Write the summary to `path`, or stdout when `path` is `-`
    pub fn save(&self, path: &Path) -> Result<()> {
        tracing::debug!(
            path = %path.display(),
            trace_count = self.trace_count,
            functions = self.data.len(),
            "writing summary"
        );

        let io_err = |e| TallyError::io(path, e);

        if path.as_os_str() == STDIO_PATH {
            return self.write_json(std::io::stdout().lock()).map_err(io_err);
        }

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TraceSummary {
        let mut tally = FunctionTally::new();
        tally.record("eval");
        tally.record("join");
        tally.record("eval");
        TraceSummary::from(tally)
    }

    #[test]
    fn test_from_tally() {
        let summary = sample();
        assert_eq!(summary.trace_count, 3);
        assert_eq!(summary.data.get("eval"), Some(2));
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_json_layout() {
        let json = sample().to_json_string().unwrap();
        assert_eq!(
            json,
            "{\n\t\"trace_count\": 3,\n\t\"data\": {\n\t\t\"eval\": 2,\n\t\t\"join\": 1\n\t}\n}\n"
        );
    }

    #[test]
    fn test_json_empty_data() {
        let json = TraceSummary::default().to_json_string().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["trace_count"], 0);
        assert!(parsed["data"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("function_counts.json");

        let summary = sample();
        summary.save(&path).unwrap();
        let loaded = TraceSummary::load(&path).unwrap();

        assert_eq!(loaded, summary);
    }

    #[test]
    fn test_load_accepts_original_spacing() {
        // Files written by older tooling put a space before the colon
        let text = "{\n\t\"trace_count\" : 2,\n\t\"data\" : {\n\t\t\"b\": 1,\n\t\t\"a\": 1\n\t}\n}\n";
        let summary = TraceSummary::from_reader(text.as_bytes(), Path::new("inline")).unwrap();
        let names: Vec<_> = summary.data.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        let err = TraceSummary::load(&path).unwrap_err();
        assert!(matches!(err, TallyError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_malformed_json() {
        let err = TraceSummary::from_reader("{ not json".as_bytes(), Path::new("bad.json"))
            .unwrap_err();
        assert!(matches!(err, TallyError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_load_missing_field() {
        let result = TraceSummary::from_reader(r#"{"data": {}}"#.as_bytes(), Path::new("x"));
        assert!(result.is_err());
    }

    #[test]
    fn test_overflowing_counts_are_inconsistent() {
        let summary = TraceSummary::from_reader(
            r#"{"trace_count": 1, "data": {"a": 18446744073709551615, "b": 1}}"#.as_bytes(),
            Path::new("huge.json"),
        )
        .unwrap();
        assert!(!summary.is_consistent());
        assert_eq!(summary.data.get("a"), Some(u64::MAX));
    }

    #[test]
    fn test_duplicate_trace_count_last_wins() {
        let summary = TraceSummary::from_reader(
            r#"{"trace_count": 9, "data": {"eval": 2}, "trace_count": 2}"#.as_bytes(),
            Path::new("dup.json"),
        )
        .unwrap();
        assert_eq!(summary.trace_count, 2);
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let summary = TraceSummary::from_reader(
            r#"{"version": "1", "trace_count": 1, "data": {"eval": 1}}"#.as_bytes(),
            Path::new("extra.json"),
        )
        .unwrap();
        assert_eq!(summary.data.get("eval"), Some(1));
    }

    #[test]
    fn test_load_missing_data_field() {
        let err = TraceSummary::from_reader(r#"{"trace_count": 0}"#.as_bytes(), Path::new("x"))
            .unwrap_err();
        assert!(err.to_string().contains("missing field `data`"));
    }

    #[test]
    fn test_inconsistent_summary_still_loads() {
        let summary = TraceSummary::from_reader(
            r#"{"trace_count": 10, "data": {"eval": 3}}"#.as_bytes(),
            Path::new("edited.json"),
        )
        .unwrap();
        assert!(!summary.is_consistent());
        assert_eq!(summary.trace_count, 10);
    }
}
