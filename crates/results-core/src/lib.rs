//! results-core: Core library for parsing and normalizing archery results
//!
//! This library provides functionality to:
//! - Split delimited lines and classify raw text (standard CSV, legacy print
//!   layouts, or HTML error pages)
//! - Parse standard header-row CSV and three legacy print layouts (event
//!   results, club records, personal bests) into uniform result records
//! - Normalize UK dates to ISO form
//! - Resolve data sets from a remote store with a bundled static fallback
//! - Export normalized records as CSV or JSON

pub mod classify;
pub mod config;
pub mod date;
pub mod error;
pub mod export;
pub mod legacy;
pub mod parse;
pub mod record;
pub mod resolver;
pub mod source;
pub mod standard;
pub mod tokenizer;

pub use classify::{classify, Format};
pub use config::{ClubConfig, ResolverConfig};
pub use date::normalize_date;
pub use error::{Error, Result};
pub use export::{export_records, ExportFormat};
pub use parse::{parse_results, DataKind};
pub use record::{
    is_current_club_record, ClubRecord, EventIndexEntry, EventMetadata, PersonalBest,
    ResultRecord, Venue,
};
pub use resolver::{Resolver, StoreLayout};
pub use source::{
    scan_sources, DirSource, HttpSource, MemorySource, SourceChain, SourceFile, TextSource,
};
pub use tokenizer::split_line;
