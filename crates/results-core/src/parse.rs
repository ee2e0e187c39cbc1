//! Entry point that picks a parser for a piece of text

use crate::classify::{classify, has_enough_lines, Format};
use crate::config::ClubConfig;
use crate::legacy::{
    club_records, parse_legacy_club_records, parse_legacy_event, parse_legacy_personal_bests,
    personal_bests,
};
use crate::record::ResultRecord;
use crate::standard::parse_standard;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The logical data set a file belongs to
///
/// Legacy files of each kind have their own layout, so the kind decides
/// which legacy grammar applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataKind {
    EventResults,
    ClubRecords,
    PersonalBests,
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" | "event-results" | "results" => Ok(DataKind::EventResults),
            "club-records" | "records" => Ok(DataKind::ClubRecords),
            "personal-bests" | "pbs" => Ok(DataKind::PersonalBests),
            other => Err(format!("unknown data kind: {}", other)),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::EventResults => write!(f, "event-results"),
            DataKind::ClubRecords => write!(f, "club-records"),
            DataKind::PersonalBests => write!(f, "personal-bests"),
        }
    }
}

/// Parse raw text of the given kind into records
///
/// Never fails: empty input, HTML error pages and unrecognized layouts all
/// produce an empty list.
pub fn parse_results(content: &str, kind: DataKind, config: &ClubConfig) -> Vec<ResultRecord> {
    if !has_enough_lines(content) {
        debug!("{} input has fewer than two lines, nothing to parse", kind);
        return Vec::new();
    }

    let format = classify(content, config);
    debug!("{} input classified as {:?}", kind, format);

    match (format, kind) {
        (Format::NotTabular, _) => {
            warn!("{} input is HTML, not a table; ignoring it", kind);
            Vec::new()
        }
        (Format::Standard, DataKind::EventResults) => parse_standard(content, config),
        (Format::Standard, DataKind::ClubRecords) => {
            let mut records = parse_standard(content, config);
            club_records::sort_by_round(&mut records);
            records
        }
        (Format::Standard, DataKind::PersonalBests) => {
            let mut records = parse_standard(content, config);
            personal_bests::sort_by_archer_and_round(&mut records);
            records
        }
        (Format::Legacy, DataKind::EventResults) => parse_legacy_event(content, config),
        (Format::Legacy, DataKind::ClubRecords) => parse_legacy_club_records(content, config),
        (Format::Legacy, DataKind::PersonalBests) => parse_legacy_personal_bests(content, config),
    }
}
