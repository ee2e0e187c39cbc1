//! Legacy club-records layout
//!
//! ```text
//! Club Records,,,,,,,,,,,,
//! ,3-Way Clout,,,,,,,,,,,
//! ,,Mark Allison,,151,,Barebow,,06/06/2021,Men,,,
//! ```
//!
//! Which column holds data decides what a line is. Column 0 carries page
//! metadata, column 1 alone names a round, and column 2 starts a record.

use crate::config::ClubConfig;
use crate::date::normalize_date;
use crate::record::ClubRecord;
use crate::tokenizer::{field, field_or, split_line_with};

/// What a single line of the export represents
#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// Report title, page numbers and similar
    Metadata,
    RoundHeader(String),
    Record(Vec<String>),
    Blank,
}

impl Line {
    fn classify(fields: Vec<String>) -> Self {
        if !field(&fields, 0).is_empty() {
            Line::Metadata
        } else if !field(&fields, 1).is_empty() && field(&fields, 2).is_empty() {
            Line::RoundHeader(field(&fields, 1).to_string())
        } else if !field(&fields, 2).is_empty() {
            Line::Record(fields)
        } else {
            Line::Blank
        }
    }
}

#[derive(Debug)]
enum State {
    AwaitingRound,
    InRound(String),
}

impl State {
    fn round(&self) -> &str {
        match self {
            State::AwaitingRound => "",
            State::InRound(round) => round,
        }
    }
}

fn build_record(fields: &[String], round: &str) -> ClubRecord {
    ClubRecord {
        round: round.to_string(),
        archer_name: field(fields, 2).to_string(),
        score: field_or(fields, 4, "0").to_string(),
        bow_type: field(fields, 6).to_string(),
        date: normalize_date(field(fields, 8)),
        archer_category: field(fields, 9).to_string(),
        ..Default::default()
    }
}

/// Parse a legacy club-records export, sorted by round name
pub fn parse_legacy_club_records(content: &str, config: &ClubConfig) -> Vec<ClubRecord> {
    let delimiter = config.delimiter_byte();
    let mut state = State::AwaitingRound;
    let mut records = Vec::new();

    for line in content.lines() {
        match Line::classify(split_line_with(line, delimiter)) {
            Line::RoundHeader(round) => state = State::InRound(round),
            Line::Record(fields) => records.push(build_record(&fields, state.round())),
            Line::Metadata | Line::Blank => {}
        }
    }

    sort_by_round(&mut records);
    records
}

/// Stable sort on the raw round name
pub(crate) fn sort_by_round(records: &mut [ClubRecord]) {
    records.sort_by(|a, b| a.round.cmp(&b.round));
}
