//! Readable listing of each stem's top completions.

use std::io::Write;

use super::FrequencyBand;
use crate::batch::ResultSet;
use crate::error::ReportResult;
use crate::rank::rank;

/// Completions listed per stem.
pub const SUMMARY_LIMIT: usize = 10;

/// Write the summary for every stem in `results`.
///
/// Completions are re-ranked before listing, so a hand-edited result file
/// still prints in score order.
pub fn write_summary<W: Write>(results: &ResultSet, out: &mut W) -> ReportResult<()> {
    writeln!(out, "Word Stem Completion Results")?;
    writeln!(out, "==========================")?;
    writeln!(out)?;

    for (stem, completions) in results.iter() {
        writeln!(out, "Stem Pattern: {stem}")?;
        writeln!(out, "{}", "-".repeat(40))?;

        if completions.is_empty() {
            writeln!(out, "No completions found")?;
        } else {
            writeln!(out, "Top completions (sorted by frequency):")?;
            let top = rank(completions.to_vec(), SUMMARY_LIMIT);
            for (i, completion) in top.iter().enumerate() {
                writeln!(
                    out,
                    "{}. {} (frequency: {:.4} - {})",
                    i + 1,
                    completion.word,
                    completion.freq_score,
                    FrequencyBand::of(completion.freq_score).note(),
                )?;
            }
        }

        writeln!(out)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Render the summary to a string.
pub fn render_summary(results: &ResultSet) -> ReportResult<String> {
    let mut buf = Vec::new();
    write_summary(results, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Completion;

    #[test]
    fn lists_ranked_completions_with_notes() {
        let mut results = ResultSet::default();
        results.insert(
            "_ALM",
            vec![
                Completion::new("palm", 0.55),
                Completion::new("calm", 0.93),
                Completion::new("balm", 0.0),
            ],
        );

        let text = render_summary(&results).unwrap();
        assert!(text.starts_with("Word Stem Completion Results\n"));
        assert!(text.contains("Stem Pattern: _ALM\n"));
        assert!(text.contains("1. calm (frequency: 0.9300 - very common)\n"));
        assert!(text.contains("2. palm (frequency: 0.5500 - moderately common)\n"));
        assert!(text.contains("3. balm (frequency: 0.0000 - rare)\n"));
    }

    #[test]
    fn empty_stem_says_so() {
        let mut results = ResultSet::default();
        results.insert("ZZ__", vec![]);
        let text = render_summary(&results).unwrap();
        assert!(text.contains("Stem Pattern: ZZ__\n----------------------------------------\nNo completions found\n"));
    }

    #[test]
    fn caps_listing_at_ten() {
        let mut results = ResultSet::default();
        let completions = (0..15)
            .map(|i| Completion::new(format!("w{i:02}"), 0.5))
            .collect();
        results.insert("___", completions);
        let text = render_summary(&results).unwrap();
        assert!(text.contains("10. w09"));
        assert!(!text.contains("11. "));
    }
}
