//! HTML output format for function count charts
//!
//! Self-contained report: embedded CSS, an inline SVG bar chart with one
//! vertical bar per function and rotated labels, and a data table.

use crate::chart::BarChart;

const BAR_WIDTH: f64 = 24.0;
const BAR_GAP: f64 = 8.0;
const PLOT_HEIGHT: f64 = 320.0;
const AXIS_MARGIN: f64 = 60.0;
/// Space below the axis for labels rotated 90 degrees
const LABEL_BAND: f64 = 160.0;
const TOP_MARGIN: f64 = 20.0;

/// HTML chart formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    chart: &'a BarChart,
    title: String,
}

impl<'a> HtmlOutput<'a> {
    /// Create a new HTML formatter for `chart`
    pub fn new(chart: &'a BarChart, title: impl Into<String>) -> Self {
        Self {
            chart,
            title: title.into(),
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .bar {
            fill: #4a90d9;
            fill-opacity: 0.5;
        }
        .bar:hover {
            fill-opacity: 0.8;
        }
        .axis {
            stroke: #333;
            stroke-width: 1;
        }
        .tick {
            font-size: 11px;
            fill: #555;
        }
        .label {
            font-family: monospace;
            font-size: 11px;
            fill: #0066cc;
        }
        table {
            border-collapse: collapse;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        th, td {
            border: 1px solid #ddd;
            padding: 6px 10px;
            text-align: left;
        }
        th {
            background-color: #5cb85c;
            color: white;
        }
        td.function {
            font-family: monospace;
        }
        td.value {
            font-family: monospace;
            text-align: right;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Generate the inline SVG bar chart
    fn generate_svg(&self) -> String {
        let bars = self.chart.bars();
        let max = self.chart.max_value();
        let plot_width = bars.len() as f64 * (BAR_WIDTH + BAR_GAP) + BAR_GAP;
        let width = AXIS_MARGIN + plot_width;
        let height = TOP_MARGIN + PLOT_HEIGHT + LABEL_BAND;
        let baseline = TOP_MARGIN + PLOT_HEIGHT;

        let mut svg = format!(
            r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"#
        );
        svg.push('\n');

        // Axes
        svg.push_str(&format!(
            r#"<line class="axis" x1="{AXIS_MARGIN}" y1="{TOP_MARGIN}" x2="{AXIS_MARGIN}" y2="{baseline}"/>"#
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<line class="axis" x1="{AXIS_MARGIN}" y1="{baseline}" x2="{width:.0}" y2="{baseline}"/>"#
        ));
        svg.push('\n');

        // Y tick at the top of the scale
        svg.push_str(&format!(
            r#"<text class="tick" x="{:.0}" y="{:.0}" text-anchor="end">{}</text>"#,
            AXIS_MARGIN - 6.0,
            TOP_MARGIN + 4.0,
            self.tick_label(max)
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text class="tick" x="{:.0}" y="{:.0}" text-anchor="end">0</text>"#,
            AXIS_MARGIN - 6.0,
            baseline + 4.0
        ));
        svg.push('\n');

        for (i, bar) in bars.iter().enumerate() {
            let x = AXIS_MARGIN + BAR_GAP + i as f64 * (BAR_WIDTH + BAR_GAP);
            let bar_height = if max > 0.0 {
                (bar.value / max) * PLOT_HEIGHT
            } else {
                0.0
            };
            let y = baseline - bar_height;
            let label = Self::escape_html(&bar.label);
            let value = Self::escape_html(&self.chart.format_value(bar));

            svg.push_str(&format!(
                r#"<rect class="bar" x="{x:.1}" y="{y:.1}" width="{BAR_WIDTH}" height="{bar_height:.1}"><title>{label}: {value}</title></rect>"#
            ));
            svg.push('\n');

            // Label hangs below the axis, rotated 90 degrees
            let lx = x + BAR_WIDTH / 2.0;
            let ly = baseline + 8.0;
            svg.push_str(&format!(
                r#"<text class="label" x="{lx:.1}" y="{ly:.1}" transform="rotate(90 {lx:.1} {ly:.1})">{label}</text>"#
            ));
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn tick_label(&self, max: f64) -> String {
        if self.chart.is_percentages() {
            format!("{:.1}%", max)
        } else {
            format!("{:.0}", max)
        }
    }

    /// Generate the data table beneath the chart
    fn generate_table(&self) -> String {
        let value_header = if self.chart.is_percentages() {
            "Percent"
        } else {
            "Count"
        };

        let mut table = String::from("<table>\n");
        table.push_str(&format!(
            "<tr><th>Function</th><th>{}</th></tr>\n",
            value_header
        ));
        for bar in self.chart.bars() {
            table.push_str(&format!(
                r#"<tr><td class="function">{}</td><td class="value">{}</td></tr>"#,
                Self::escape_html(&bar.label),
                Self::escape_html(&self.chart.format_value(bar))
            ));
            table.push('\n');
        }
        table.push_str("</table>\n");
        table
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let title = Self::escape_html(&self.title);
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!("    <title>{}</title>\n", title));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", title));

        if self.chart.bars().is_empty() {
            html.push_str("<p>No functions to chart.</p>\n");
        } else {
            html.push_str(&self.generate_svg());
            html.push_str("<h2>Function Counts</h2>\n");
            html.push_str(&self.generate_table());
        }

        html.push_str(&format!(
            "<div class=\"footer\">{} functions, {} trace lines. Generated by tracetally v{}</div>\n",
            self.chart.bars().len(),
            self.chart.trace_count(),
            env!("CARGO_PKG_VERSION")
        ));
        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
