//! tracetally - per-function trace line counting and charting
//!
//! This library scans analyzer trace logs for `%%% arrayMatrix: <function>`
//! records, tallies them per function into a JSON summary, and renders that
//! summary as a bar chart (terminal text, HTML/SVG or CSV).

pub mod chart;
pub mod cli;
pub mod csv_output;
pub mod error;
pub mod filter;
pub mod html_output;
pub mod pattern;
pub mod summary;
pub mod tally;
