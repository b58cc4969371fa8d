//! CSV of each stem's completions grouped by frequency band.

use std::collections::BTreeMap;
use std::io::Write;

use super::FrequencyBand;
use crate::batch::ResultSet;
use crate::error::ReportResult;

/// Words kept per band per stem.
pub const WORDS_PER_BAND: usize = 3;

/// Words of `completions` in each band, at most [`WORDS_PER_BAND`] each, in list order.
pub fn group_by_band(
    completions: &[crate::rank::Completion],
) -> BTreeMap<FrequencyBand, Vec<&str>> {
    let mut bands: BTreeMap<FrequencyBand, Vec<&str>> = FrequencyBand::ALL
        .iter()
        .map(|band| (*band, Vec::new()))
        .collect();
    for completion in completions {
        let words = bands
            .entry(FrequencyBand::of(completion.freq_score))
            .or_default();
        if words.len() < WORDS_PER_BAND {
            words.push(&completion.word);
        }
    }
    bands
}

/// Write one CSV row per stem: the stem, then `/`-joined words for each band.
pub fn write_band_csv<W: Write>(results: &ResultSet, out: W) -> ReportResult<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["Stem"];
    header.extend(FrequencyBand::ALL.iter().map(|band| band.heading()));
    writer.write_record(&header)?;

    for (stem, completions) in results.iter() {
        let bands = group_by_band(completions);
        let mut record = vec![stem.to_string()];
        record.extend(bands.values().map(|words| words.join("/")));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Completion;

    fn sample() -> ResultSet {
        let mut results = ResultSet::default();
        results.insert(
            "WA__",
            vec![
                Completion::new("want", 0.99),
                Completion::new("wait", 0.98),
                Completion::new("walk", 0.97),
                Completion::new("wall", 0.96),
                Completion::new("warm", 0.8),
                Completion::new("wary", 0.2),
                Completion::new("wazz", 0.0),
            ],
        );
        results.insert("ZZ__", vec![]);
        results
    }

    #[test]
    fn bands_keep_first_three_words() {
        let results = sample();
        let bands = group_by_band(results.get("WA__").unwrap());
        assert_eq!(bands[&FrequencyBand::VeryCommon], vec!["want", "wait", "walk"]);
        assert_eq!(bands[&FrequencyBand::Common], vec!["warm"]);
        assert!(bands[&FrequencyBand::Moderate].is_empty());
        assert_eq!(bands[&FrequencyBand::Rare], vec!["wazz"]);
    }

    #[test]
    fn csv_has_header_and_one_row_per_stem() {
        let mut buf = Vec::new();
        write_band_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Stem,Very Common (>0.9),Common (0.7-0.9),Moderate (0.4-0.7),Less Common (0-0.4),Rare (0)"
        );
        assert_eq!(lines[1], "WA__,want/wait/walk,warm,,wary,wazz");
        assert_eq!(lines[2], "ZZ__,,,,,");
        assert_eq!(lines.len(), 3);
    }
}
