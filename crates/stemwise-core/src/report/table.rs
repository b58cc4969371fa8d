//! ILT comparison table.
//!
//! Each row pairs an ILT stem with the response participants gave, the
//! distractor completion, and their correlation statistics. Two columns are
//! added: the corpus frequency score of the response and of the distractor
//! within that stem's completions.

use std::fmt::Write as _;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::batch::ResultSet;
use crate::error::ReportResult;
use crate::rank::Completion;

/// Rows of the study's published table: dimension, response, distractor,
/// correlation, significance. Rows with only a dimension are section labels.
const STUDY_ROWS: &[[&str; 5]] = &[
    ["DEDICATED", "", "", "", ""],
    ["_OYAL", "Loyal", "Royal", ".06", ".74"],
    ["_ATURE", "Mature", "Nature", ".22", ".21"],
    ["HON__", "Honor", "Honey", ".23", ".19"],
    ["Intelligent", "", "", "", ""],
    ["BRA___", "Brainy", "Branch", ".56", ".001"],
    ["__ART", "Smart", "Chart/Heart", ".20", ".22"],
    ["THOU_____", "Thoughtful", "Thousand", ".17", ".45"],
    ["Dynamic", "", "", "", ""],
    ["CHAR_____", "Charisma", "Charming, Charcoal", ".35", ".04"],
    ["L_VLEY", "Lively", "Lovely", ".43", ".01"],
    ["__MBLE", "Humble", "Gamble", ".27", ".13"],
    ["CRE_____", "Creative", "Credible", ".05", ".77"],
    ["Sensitive*", "", "", "", ""],
    ["SENS_____", "Sensitive", "Sensation", ".07", ".70"],
    ["_OC___", "Social", "Docile", ".01", ".95"],
    ["_ALM", "Calm", "Palm", ".46", ".003"],
    ["_AIR", "Fair", "Hair", ".07", ".68"],
    ["WA__", "Warm", "Wary", ".14", ".41"],
    ["Tyrannical*", "", "", "", ""],
    ["BRU___", "Brutal", "Bruise", ".75", ".001"],
    ["___ONG", "Strong", "Stress", ".80", ".001"],
    ["FI__", "Firm", "Fire", ".69", ".001"],
    ["Masculine", "", "", "", ""],
    ["_AN_", "Manly", "Fancy", ".79", ".001"],
    ["CO___", "Cocky", "Corny", ".16", ".36"],
    ["CRU__", "Cruel", "Crush", ".04", ".82"],
];

/// Column headings, in output order.
pub const HEADINGS: [&str; 7] = [
    "ILT Dimension",
    "ILT Response",
    "Distractor",
    "Correlation",
    "Significance",
    "ILT Response Freq",
    "Distractor Freq",
];

/// One input row of the comparison table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    /// ILT dimension label or stem pattern.
    pub dimension: String,
    /// Completion given by participants.
    pub response: String,
    /// Distractor completion(s), `/` or `,` separated.
    pub distractor: String,
    /// Correlation coefficient, as printed.
    pub correlation: String,
    /// Significance level, as printed.
    pub significance: String,
}

/// The study's built-in rows.
pub fn study_rows() -> Vec<TableRow> {
    STUDY_ROWS
        .iter()
        .map(|[dimension, response, distractor, correlation, significance]| TableRow {
            dimension: (*dimension).to_string(),
            response: (*response).to_string(),
            distractor: (*distractor).to_string(),
            correlation: (*correlation).to_string(),
            significance: (*significance).to_string(),
        })
        .collect()
}

/// Read rows from a JSON array of [`TableRow`] objects.
pub fn read_rows<R: Read>(reader: R) -> ReportResult<Vec<TableRow>> {
    Ok(serde_json::from_reader(reader)?)
}

/// A table row with its frequency columns filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLine {
    /// The input row.
    #[serde(flatten)]
    pub row: TableRow,
    /// Score(s) of the response word(s) within the stem's completions.
    pub response_freq: String,
    /// Score(s) of the distractor word(s) within the stem's completions.
    pub distractor_freq: String,
}

impl TableLine {
    fn cells(&self) -> [&str; 7] {
        [
            &self.row.dimension,
            &self.row.response,
            &self.row.distractor,
            &self.row.correlation,
            &self.row.significance,
            &self.response_freq,
            &self.distractor_freq,
        ]
    }
}

/// Scores of the word(s) in `cell` among `completions`.
///
/// Blank cells give a blank result. Several words (`Chart/Heart`,
/// `Charming, Charcoal`) give their scores joined by `/`. A word not among
/// the completions scores `N/A`.
pub fn word_scores(cell: &str, completions: &[Completion]) -> String {
    if cell.trim().is_empty() {
        return String::new();
    }
    cell.to_lowercase()
        .split(['/', ','])
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(|word| {
            completions
                .iter()
                .find(|c| c.word.to_lowercase() == word)
                .map_or_else(|| "N/A".to_string(), |c| format!("{:.4}", c.freq_score))
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Fill in the frequency columns of `rows` from `results`.
///
/// Rows whose dimension is not a stem in `results` look up against an empty
/// completion list.
pub fn build_table(rows: Vec<TableRow>, results: &ResultSet) -> Vec<TableLine> {
    rows.into_iter()
        .map(|row| {
            let completions = results.get(&row.dimension).unwrap_or_default();
            TableLine {
                response_freq: word_scores(&row.response, completions),
                distractor_freq: word_scores(&row.distractor, completions),
                row,
            }
        })
        .collect()
}

/// Write the table as CSV with [`HEADINGS`].
pub fn write_table_csv<W: Write>(lines: &[TableLine], out: W) -> ReportResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADINGS)?;
    for line in lines {
        writer.write_record(line.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the table as aligned plain-text columns.
pub fn render_table(lines: &[TableLine]) -> String {
    let mut widths = HEADINGS.map(str::len);
    for line in lines {
        for (width, cell) in widths.iter_mut().zip(line.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 7]| {
        let row: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect();
        let _ = writeln!(out, "{}", row.join(" "));
    };

    push_row(HEADINGS);
    for line in lines {
        push_row(line.cells());
    }
    out
}
