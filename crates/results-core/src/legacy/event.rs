//! Legacy event-results layout
//!
//! ```text
//! Kingsmead Archers Summer Shoot,,,,,
//! CLASS,POSITION,NAME,CLUB,HITS,GOLDS,SCORE
//! Recurve,,,,,,
//! ,1,Jane Doe,,60,48,550
//! ,2,John Smith,ABC,60,40,530
//! Mens Barebow,,,,,,
//! ,1,Mark Allison,,58,20,480
//! ```
//!
//! Everything above the `CLASS` header is page furniture. A value in the
//! first column sets the class (bow type) for the rows that follow.

use crate::config::ClubConfig;
use crate::date::normalize_date;
use crate::record::ResultRecord;
use crate::tokenizer::{field, split_line_with};
use log::{debug, warn};

/// Record fields a header label can map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Position,
    Name,
    Club,
    Round,
    Hits,
    Golds,
    Score,
    Date,
}

impl Column {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_matches('"').trim().to_ascii_uppercase().as_str() {
            "POSITION" | "POS" => Some(Column::Position),
            "NAME" => Some(Column::Name),
            "CLUB" => Some(Column::Club),
            "ROUND" => Some(Column::Round),
            "HITS" => Some(Column::Hits),
            "GOLDS" | "CLOUTS" | "CLOUT" => Some(Column::Golds),
            "SCORE" => Some(Column::Score),
            "DATE" => Some(Column::Date),
            _ => None,
        }
    }
}

fn is_class_header(fields: &[String]) -> bool {
    field(fields, 0).trim_matches('"').eq_ignore_ascii_case("CLASS")
}

/// Parse a legacy event-results export
///
/// Returns no records when the `CLASS` header row or its `NAME` column is
/// missing.
pub fn parse_legacy_event(content: &str, config: &ClubConfig) -> Vec<ResultRecord> {
    let delimiter = config.delimiter_byte();
    let mut lines = content.lines().map(|line| split_line_with(line, delimiter));

    let header = match lines.by_ref().find(|fields| is_class_header(fields)) {
        Some(header) => header,
        None => {
            warn!("legacy event export has no CLASS header row");
            return Vec::new();
        }
    };

    let columns: Vec<(usize, Column)> = header
        .iter()
        .enumerate()
        .filter_map(|(i, label)| Column::from_label(label).map(|c| (i, c)))
        .collect();

    let name_index = match columns.iter().find(|(_, c)| *c == Column::Name) {
        Some((i, _)) => *i,
        None => {
            warn!("legacy event header row has no NAME column");
            return Vec::new();
        }
    };
    debug!("legacy event header maps {} columns", columns.len());

    let mut current_class = String::new();
    let mut records = Vec::new();

    for fields in lines {
        // Page breaks repeat the header row
        if is_class_header(&fields) {
            continue;
        }

        let class = field(&fields, 0);
        if !class.is_empty() {
            current_class = class.to_string();
        }

        if field(&fields, name_index).is_empty() {
            continue;
        }

        let mut record = ResultRecord {
            bow_type: current_class.clone(),
            ..Default::default()
        };
        for &(index, column) in &columns {
            let value = field(&fields, index).to_string();
            match column {
                Column::Position => record.position = value,
                Column::Name => record.archer_name = value,
                Column::Club => record.club = value,
                Column::Round => record.round = value,
                Column::Hits => record.hits = value,
                Column::Golds => record.golds = value,
                Column::Score => record.score = value,
                Column::Date => record.date = normalize_date(&value),
            }
        }
        if record.club.is_empty() {
            record.club = config.club_code.clone();
        }

        records.push(record);
    }

    records
}
