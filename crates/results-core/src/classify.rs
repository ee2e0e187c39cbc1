//! Format detection for raw results text

use crate::config::ClubConfig;
use crate::tokenizer::non_blank_lines;
use serde::{Deserialize, Serialize};

/// Which grammar a piece of text should be parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Header row followed by one record per line
    Standard,
    /// A print-oriented export with positional grouping
    Legacy,
    /// Not a table at all, usually an HTML error page
    NotTabular,
}

const HTML_MARKERS: [&str; 2] = ["<!doctype", "<html"];

/// Decide how `text` should be parsed
pub fn classify(text: &str, config: &ClubConfig) -> Format {
    if looks_like_html(text) {
        return Format::NotTabular;
    }

    let first = match non_blank_lines(text).next() {
        Some(line) => line,
        None => return Format::Standard,
    };

    let club_name = config.club_name.trim().to_lowercase();
    if first.starts_with(config.delimiter)
        || (!club_name.is_empty() && first.to_lowercase().contains(&club_name))
    {
        Format::Legacy
    } else {
        Format::Standard
    }
}

/// Whether the text begins with an HTML document marker
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text.trim_start().chars().take(16).collect::<String>().to_lowercase();
    HTML_MARKERS.iter().any(|marker| head.starts_with(marker))
}

/// Fewer than two non-blank lines cannot hold a header and a record
pub fn has_enough_lines(text: &str) -> bool {
    non_blank_lines(text).nth(1).is_some()
}
