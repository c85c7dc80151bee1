//! CSV output format for function count charts

use crate::chart::BarChart;

/// CSV chart formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    chart: &'a BarChart,
}

impl<'a> CsvOutput<'a> {
    pub fn new(chart: &'a BarChart) -> Self {
        Self { chart }
    }

    fn header(&self) -> &'static str {
        if self.chart.is_percentages() {
            "function,percent"
        } else {
            "function,count"
        }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(self.header());
        output.push('\n');

        for bar in self.chart.bars() {
            output.push_str(&Self::escape_field(&bar.label));
            output.push(',');
            if self.chart.is_percentages() {
                output.push_str(&format!("{:.4}", bar.value));
            } else {
                output.push_str(&bar.count.to_string());
            }
            output.push('\n');
        }

        output
    }
}
