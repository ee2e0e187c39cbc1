//! Header-row CSV parser

use crate::config::ClubConfig;
use crate::record::ResultRecord;
use crate::tokenizer::{non_blank_lines, split_line_with};
use std::collections::BTreeMap;

/// One data line keyed by normalized header name
pub type StandardRow = BTreeMap<String, String>;

/// Normalize a header label into a field key
///
/// "  Archer   Name " becomes "archer_name".
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Parse header-row text into rows keyed by normalized header
pub fn parse_standard_rows(content: &str, config: &ClubConfig) -> Vec<StandardRow> {
    let delimiter = config.delimiter_byte();
    let mut lines = non_blank_lines(content);

    let headers: Vec<String> = match lines.next() {
        Some(line) => split_line_with(line, delimiter)
            .iter()
            .map(|h| normalize_header(h))
            .collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for line in lines {
        let values = split_line_with(line, delimiter);

        // A line of bare delimiters is a spacer, not a record
        if values.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let row: StandardRow = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty())
            .map(|(i, h)| {
                let value = values.get(i).map(|v| v.trim()).unwrap_or("");
                (h.clone(), value.to_string())
            })
            .collect();

        rows.push(row);
    }

    rows
}

/// Parse header-row text into result records
///
/// Rows that do not name an archer are dropped.
pub fn parse_standard(content: &str, config: &ClubConfig) -> Vec<ResultRecord> {
    parse_standard_rows(content, config)
        .iter()
        .map(ResultRecord::from_fields)
        .filter(ResultRecord::is_valid)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Archer   Name "), "archer_name");
        assert_eq!(normalize_header("SCORE"), "score");
        assert_eq!(normalize_header("Bow\tType"), "bow_type");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn test_parse_rows_pads_missing_values() {
        let csv = "Name,Round,Score\nJane, Portsmouth ,550\nJohn,WA 18\n";
        let rows = parse_standard_rows(csv, &ClubConfig::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["round"], "Portsmouth");
        assert_eq!(rows[0]["score"], "550");
        assert_eq!(rows[1]["score"], "");
    }

    #[test]
    fn test_parse_rows_skips_spacer_lines() {
        let csv = "Name,Score\n,,\n  \n , \nJane,550\n";
        let rows = parse_standard_rows(csv, &ClubConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Jane");
    }

    #[test]
    fn test_parse_standard_records() {
        let csv = "Position,Archer Name,Club,Round,Bow Type,Hits,Golds,Score,Date\n\
                   1,Jane Doe,KA,Portsmouth,Recurve,60,48,550,01/01/2024\n\
                   2,,KA,Portsmouth,Recurve,60,40,540,01/01/2024\n";
        let records = parse_standard(csv, &ClubConfig::default());

        assert_eq!(records.len(), 1);
        let jane = &records[0];
        assert_eq!(jane.position, "1");
        assert_eq!(jane.archer_name, "Jane Doe");
        assert_eq!(jane.bow_type, "Recurve");
        assert_eq!(jane.hits, "60");
        assert_eq!(jane.golds, "48");
        assert_eq!(jane.date, "2024-01-01");
    }

    #[test]
    fn test_parse_standard_quoted_values() {
        let csv = "name,club,score\n\"Doe, Jane\",\"Club, Town\",550\n";
        let records = parse_standard(csv, &ClubConfig::default());
        assert_eq!(records[0].archer_name, "Doe, Jane");
        assert_eq!(records[0].club, "Club, Town");
    }

    #[test]
    fn test_parse_standard_blank_club_stays_blank() {
        let csv = "name,club,score\nJane,,550\n";
        let records = parse_standard(csv, &ClubConfig::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].club, "");
    }

    #[test]
    fn test_parse_standard_empty() {
        assert!(parse_standard("", &ClubConfig::default()).is_empty());
        assert!(parse_standard("   \n", &ClubConfig::default()).is_empty());
    }
}
