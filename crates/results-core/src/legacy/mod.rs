//! Parsers for print-oriented legacy exports
//!
//! These files express grouping with blank cells instead of keys: a value
//! in a particular column opens a group (a class, a round, an archer) that
//! applies to the record rows beneath it. Each parser keeps that grouping
//! state local to a single call.

pub mod club_records;
pub mod event;
pub mod personal_bests;

pub use club_records::parse_legacy_club_records;
pub use event::parse_legacy_event;
pub use personal_bests::parse_legacy_personal_bests;
