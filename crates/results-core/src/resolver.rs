//! Resolve logical data sets from a chain of sources
//!
//! Each data set (current season, archive, club records, personal bests)
//! lives at a fixed path convention described by [`StoreLayout`]. Paths are
//! relative, so the same layout applies to the remote store and to the
//! bundled static copy. Anything that cannot be fetched or parsed turns
//! into an empty collection.

use crate::config::{ClubConfig, ResolverConfig};
use crate::date::parse_iso_date;
use crate::error::Result;
use crate::parse::{parse_results, DataKind};
use crate::record::{ClubRecord, EventIndexEntry, EventMetadata, PersonalBest, ResultRecord};
use crate::source::{DirSource, HttpSource, SourceChain};
use futures::future::join_all;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::time::Duration;

/// Path conventions inside a data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    /// JSON array of [`EventIndexEntry`] for the current season
    pub current_index: String,
    /// Folder holding `{venue}/{file}` for the current season
    pub current_dir: String,
    /// JSON array of archive folder names
    pub archive_index: String,
    /// Folder holding one sub-folder per archived season
    pub archive_dir: String,
    pub club_records: String,
    pub personal_bests: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            current_index: "results/index.json".to_string(),
            current_dir: "results".to_string(),
            archive_index: "archive/index.json".to_string(),
            archive_dir: "archive".to_string(),
            club_records: "records/club-records.csv".to_string(),
            personal_bests: "records/personal-bests.csv".to_string(),
        }
    }
}

impl StoreLayout {
    /// Path of an event file under `dir`
    pub fn event_path(&self, dir: &str, entry: &EventIndexEntry) -> String {
        format!("{}/{}/{}", dir, entry.venue.dir_name(), entry.file)
    }

    /// Folder of one archived season
    pub fn archive_folder(&self, folder: &str) -> String {
        format!("{}/{}", self.archive_dir, folder)
    }

    /// Event index of one archived season
    pub fn archive_folder_index(&self, folder: &str) -> String {
        format!("{}/index.json", self.archive_folder(folder))
    }
}

/// Fetches and parses every logical data set
pub struct Resolver {
    chain: SourceChain,
    layout: StoreLayout,
    club: ClubConfig,
}

impl Resolver {
    pub fn new(chain: SourceChain, layout: StoreLayout, club: ClubConfig) -> Self {
        Self { chain, layout, club }
    }

    /// Build the remote-then-static chain described by `config`
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let mut chain = SourceChain::new();

        if let Some(url) = &config.remote_base_url {
            let timeout = Duration::from_secs(config.timeout_secs);
            chain = chain.with_source(HttpSource::new(url.clone(), timeout)?);
        }
        if let Some(dir) = &config.static_dir {
            chain = chain.with_source(DirSource::new(dir.clone()));
        }

        Ok(Self::new(chain, config.layout.clone(), config.club.clone()))
    }

    /// Events of the current season, newest first
    pub async fn current_results(&self) -> Vec<EventMetadata> {
        let entries: Vec<EventIndexEntry> =
            self.load_json(&self.layout.current_index).await.unwrap_or_default();
        self.load_events(&self.layout.current_dir, &entries).await
    }

    /// Events of every archived season, newest first
    pub async fn archived_results(&self) -> Vec<EventMetadata> {
        let folders: Vec<String> =
            self.load_json(&self.layout.archive_index).await.unwrap_or_default();

        let seasons = join_all(folders.iter().map(|folder| self.load_archive_folder(folder))).await;

        let mut events: Vec<EventMetadata> = seasons.into_iter().flatten().collect();
        sort_events(&mut events);
        events
    }

    pub async fn club_records(&self) -> Vec<ClubRecord> {
        self.load_records(&self.layout.club_records, DataKind::ClubRecords)
            .await
    }

    pub async fn personal_bests(&self) -> Vec<PersonalBest> {
        self.load_records(&self.layout.personal_bests, DataKind::PersonalBests)
            .await
    }

    async fn load_archive_folder(&self, folder: &str) -> Vec<EventMetadata> {
        let entries: Vec<EventIndexEntry> = self
            .load_json(&self.layout.archive_folder_index(folder))
            .await
            .unwrap_or_default();
        self.load_events(&self.layout.archive_folder(folder), &entries)
            .await
    }

    async fn load_records(&self, path: &str, kind: DataKind) -> Vec<ResultRecord> {
        match self.chain.first_tabular(path).await {
            Some(fetched) => parse_results(&fetched.text, kind, &self.club),
            None => {
                info!("no source has {}", path);
                Vec::new()
            }
        }
    }

    async fn load_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let fetched = self.chain.first_tabular(path).await?;
        match serde_json::from_str(&fetched.text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring malformed index {}: {}", path, e);
                None
            }
        }
    }

    async fn load_events(&self, dir: &str, entries: &[EventIndexEntry]) -> Vec<EventMetadata> {
        let mut events = join_all(entries.iter().map(|entry| self.load_event(dir, entry))).await;
        sort_events(&mut events);
        events
    }

    async fn load_event(&self, dir: &str, entry: &EventIndexEntry) -> EventMetadata {
        let path = self.layout.event_path(dir, entry);
        let mut event = EventMetadata::from_entry(entry);

        // Scanned sheets and other non-CSV files are offered as downloads
        if !is_csv(&entry.file) {
            event.download_url = self.chain.locate(&path);
            return event;
        }

        if let Some(fetched) = self.chain.first_tabular(&path).await {
            event.results = parse_results(&fetched.text, DataKind::EventResults, &self.club);
            if event.results.is_empty() {
                warn!("{} parsed to no results, offering it as a download", path);
                event.download_url = self.chain.locate_in(fetched.source, &path);
            }
        }

        event
    }
}

fn is_csv(file: &str) -> bool {
    file.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("csv"))
}

/// Newest first, undated events last, ties broken by id
pub fn sort_events(events: &mut [EventMetadata]) {
    events.sort_by(|a, b| {
        let a_date = parse_iso_date(&a.date);
        let b_date = parse_iso_date(&b.date);
        b_date
            .is_some()
            .cmp(&a_date.is_some())
            .then_with(|| Reverse(a_date).cmp(&Reverse(b_date)))
            .then_with(|| a.id.cmp(&b.id))
    });
}
