//! Legacy personal-bests layout
//!
//! ```text
//! Personal Bests,,,,,,,,,,
//! ,"Jane Doe",,,,,,,,,
//! ,"Recurve",,,,,,,,,
//! ,,"Round",,,,,,,,
//! ,,"Portsmouth",,01/01/2024,,60,,48,,550
//! ,"Compound",,,,,,,,,
//! ,,"Round",,,,,,,,
//! ,,"Portsmouth",,02/02/2024,,60,,55,,580
//! ```
//!
//! A bare label in column 1 is either an archer or a bow type. A bow type
//! is always followed by a `Round` header, so a label is held as pending
//! until the next line decides: another label means the pending one was
//! the archer, a `Round` header means it was the bow.

use crate::config::ClubConfig;
use crate::date::normalize_date;
use crate::record::PersonalBest;
use crate::tokenizer::{field, field_or, split_line_with};

const ROUND_HEADER: &str = "Round";

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Metadata,
    /// Archer or bow type, not yet known which
    Label(String),
    RoundHeader,
    Record(Vec<String>),
    Blank,
}

impl Line {
    fn classify(fields: Vec<String>) -> Self {
        if !field(&fields, 0).is_empty() {
            Line::Metadata
        } else if !field(&fields, 1).is_empty() {
            Line::Label(field(&fields, 1).to_string())
        } else if field(&fields, 2) == ROUND_HEADER {
            Line::RoundHeader
        } else if !field(&fields, 2).is_empty() {
            Line::Record(fields)
        } else {
            Line::Blank
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum State {
    /// No label waiting to be resolved
    AwaitingEntity,
    /// A label was seen; the next label or `Round` header resolves it
    AwaitingBowHeader(String),
    /// Archer and bow are settled, record rows follow
    InRecords,
}

#[derive(Debug)]
struct Parser {
    state: State,
    archer: Option<String>,
    bow: Option<String>,
    records: Vec<PersonalBest>,
}

impl Parser {
    fn new() -> Self {
        Self {
            state: State::AwaitingEntity,
            archer: None,
            bow: None,
            records: Vec::new(),
        }
    }

    fn feed(&mut self, line: Line) {
        match line {
            Line::Label(label) => {
                // Two labels back to back: the first was the archer
                if let State::AwaitingBowHeader(pending) =
                    std::mem::replace(&mut self.state, State::AwaitingEntity)
                {
                    self.archer = Some(pending);
                }
                self.state = State::AwaitingBowHeader(label);
            }
            Line::RoundHeader => {
                if let State::AwaitingBowHeader(pending) =
                    std::mem::replace(&mut self.state, State::InRecords)
                {
                    self.bow = Some(pending);
                }
            }
            Line::Record(fields) => {
                if let (Some(archer), Some(bow)) = (&self.archer, &self.bow) {
                    self.records.push(PersonalBest {
                        archer_name: archer.clone(),
                        bow_type: bow.clone(),
                        round: field(&fields, 2).to_string(),
                        date: normalize_date(field(&fields, 4)),
                        hits: field_or(&fields, 5, "0").to_string(),
                        golds: field_or(&fields, 8, "0").to_string(),
                        score: field_or(&fields, 10, "0").to_string(),
                        ..Default::default()
                    });
                }
            }
            Line::Metadata | Line::Blank => {}
        }
    }

    fn finish(mut self) -> Vec<PersonalBest> {
        sort_by_archer_and_round(&mut self.records);
        self.records
    }
}

/// Parse a legacy personal-bests export, sorted by archer then round
pub fn parse_legacy_personal_bests(content: &str, config: &ClubConfig) -> Vec<PersonalBest> {
    let delimiter = config.delimiter_byte();
    let mut parser = Parser::new();

    for line in content.lines() {
        parser.feed(Line::classify(split_line_with(line, delimiter)));
    }

    parser.finish()
}

/// Stable sort on archer name, then round
pub(crate) fn sort_by_archer_and_round(records: &mut [PersonalBest]) {
    records.sort_by(|a, b| {
        a.archer_name
            .cmp(&b.archer_name)
            .then_with(|| a.round.cmp(&b.round))
    });
}
