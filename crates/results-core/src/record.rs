//! Core record types for normalized results

use crate::date::normalize_date;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One archer's performance in one round at one event
///
/// Every field is text. Missing values are empty strings so callers can
/// apply string operations without checking for absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultRecord {
    /// Ordinal rank, as printed
    pub position: String,
    pub archer_name: String,
    pub club: String,
    pub round: String,
    /// Bow type, possibly combined with category (e.g. "Mens Barebow")
    pub bow_type: String,
    pub hits: String,
    pub golds: String,
    pub score: String,
    /// ISO date when derivable, otherwise the original text
    pub date: String,
    /// Only filled by club-records exports
    pub archer_category: String,
}

/// The standing best for a round and bow type
pub type ClubRecord = ResultRecord;

/// An archer's best for a round and bow type
pub type PersonalBest = ResultRecord;

impl ResultRecord {
    /// A record is only meaningful when it names an archer
    pub fn is_valid(&self) -> bool {
        !self.archer_name.trim().is_empty()
    }

    /// Build a record from a row keyed by normalized header names
    ///
    /// Several spellings are accepted for each field; the first present
    /// non-empty one wins. Unknown keys are ignored, and a blank `club` stays
    /// blank.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        let pick = |keys: &[&str]| -> String {
            keys.iter()
                .filter_map(|k| fields.get(*k))
                .map(|v| v.trim())
                .find(|v| !v.is_empty())
                .unwrap_or("")
                .to_string()
        };

        Self {
            position: pick(&["position", "pos"]),
            archer_name: pick(&["archer_name", "name", "archer"]),
            club: pick(&["club"]),
            round: pick(&["round"]),
            bow_type: pick(&["bow_type", "bow", "class"]),
            hits: pick(&["hits"]),
            golds: pick(&["golds", "clouts", "clout"]),
            score: pick(&["score"]),
            date: normalize_date(&pick(&["date"])),
            archer_category: pick(&["archer_category", "category"]),
        }
    }

    /// Key used to compare personal bests against club records
    fn record_key(&self) -> [String; 4] {
        [
            &self.archer_name,
            &self.round,
            &self.bow_type,
            &self.score,
        ]
        .map(|s| s.trim().to_lowercase())
    }
}

/// Whether `pb` is the standing club record for its round and bow type
///
/// Matches on archer name, round, bow type and score, ignoring case.
pub fn is_current_club_record(pb: &PersonalBest, club_records: &[ClubRecord]) -> bool {
    let key = pb.record_key();
    club_records.iter().any(|r| r.record_key() == key)
}

/// Where an event was shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    #[serde(alias = "indoor", alias = "INDOOR")]
    Indoor,
    #[serde(alias = "outdoor", alias = "OUTDOOR")]
    Outdoor,
}

impl Venue {
    /// Storage folder holding this venue's event files
    pub fn dir_name(&self) -> &'static str {
        match self {
            Venue::Indoor => "indoor",
            Venue::Outdoor => "outdoor",
        }
    }
}

impl FromStr for Venue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indoor" => Ok(Venue::Indoor),
            "outdoor" => Ok(Venue::Outdoor),
            other => Err(format!("unknown venue: {}", other)),
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Indoor => write!(f, "Indoor"),
            Venue::Outdoor => write!(f, "Outdoor"),
        }
    }
}

/// One entry of an event index file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIndexEntry {
    pub id: String,
    pub date: String,
    pub name: String,
    pub venue: Venue,
    /// File name within the venue folder
    pub file: String,
}

/// An event together with whatever results could be parsed for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub id: String,
    pub date: String,
    pub name: String,
    pub venue: Venue,
    pub file: String,
    pub results: Vec<ResultRecord>,
    /// Set when a source file exists but yielded no records
    pub download_url: Option<String>,
}

impl EventMetadata {
    /// Create an event with no results yet
    pub fn from_entry(entry: &EventIndexEntry) -> Self {
        Self {
            id: entry.id.clone(),
            date: entry.date.clone(),
            name: entry.name.clone(),
            venue: entry.venue,
            file: entry.file.clone(),
            results: Vec::new(),
            download_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_fields_aliases() {
        let record = ResultRecord::from_fields(&fields(&[
            ("pos", "1"),
            ("name", "Jane Doe"),
            ("club", "ABC"),
            ("bow", "Recurve"),
            ("clouts", "7"),
            ("score", "550"),
            ("date", "01/05/2024"),
            ("notes", "ignored"),
        ]));

        assert_eq!(record.position, "1");
        assert_eq!(record.archer_name, "Jane Doe");
        assert_eq!(record.club, "ABC");
        assert_eq!(record.bow_type, "Recurve");
        assert_eq!(record.golds, "7");
        assert_eq!(record.score, "550");
        assert_eq!(record.date, "2024-05-01");
        assert_eq!(record.hits, "");
    }

    #[test]
    fn test_from_fields_blank_club_stays_blank() {
        let record = ResultRecord::from_fields(&fields(&[("name", "A"), ("club", " ")]));
        assert_eq!(record.club, "");

        let record = ResultRecord::from_fields(&fields(&[("name", "A")]));
        assert_eq!(record.club, "");
    }

    #[test]
    fn test_is_valid() {
        let mut record = ResultRecord::default();
        assert!(!record.is_valid());
        record.archer_name = "  ".to_string();
        assert!(!record.is_valid());
        record.archer_name = "Jane".to_string();
        assert!(record.is_valid());
    }

    #[test]
    fn test_is_current_club_record_ignores_case() {
        let club_record = ResultRecord {
            archer_name: "Mark Allison".to_string(),
            round: "3-Way Clout".to_string(),
            bow_type: "Barebow".to_string(),
            score: "151".to_string(),
            date: "2021-06-06".to_string(),
            ..Default::default()
        };
        let mut pb = ResultRecord {
            archer_name: "mark allison ".to_string(),
            round: "3-WAY CLOUT".to_string(),
            bow_type: "barebow".to_string(),
            score: "151".to_string(),
            ..Default::default()
        };

        assert!(is_current_club_record(&pb, &[club_record.clone()]));

        pb.score = "150".to_string();
        assert!(!is_current_club_record(&pb, &[club_record]));
        assert!(!is_current_club_record(&pb, &[]));
    }

    #[test]
    fn test_venue_parse_and_dir() {
        assert_eq!("Indoor".parse::<Venue>(), Ok(Venue::Indoor));
        assert_eq!(" OUTDOOR ".parse::<Venue>(), Ok(Venue::Outdoor));
        assert!("field".parse::<Venue>().is_err());
        assert_eq!(Venue::Outdoor.dir_name(), "outdoor");
    }

    #[test]
    fn test_index_entry_accepts_lowercase_venue() {
        let entry: EventIndexEntry = serde_json::from_str(
            r#"{"id":"e1","date":"2024-05-01","name":"Open","venue":"outdoor","file":"open.csv"}"#,
        )
        .unwrap();
        assert_eq!(entry.venue, Venue::Outdoor);
    }
}
