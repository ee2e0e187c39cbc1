//! Places raw results text can be fetched from
//!
//! A [`TextSource`] answers "what is the text at this path" with either the
//! text or nothing. Sources never report errors: a network failure, a
//! missing file and a bad status all look the same to the caller, which
//! simply moves on to the next source in a [`SourceChain`].

use crate::classify::looks_like_html;
use crate::error::Result;
use crate::parse::DataKind;
use futures::future::{self, BoxFuture, FutureExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// Something that can produce the text stored at a path
pub trait TextSource: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Fetch the text at `path`, or `None` when it is unavailable
    fn fetch_text<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>>;

    /// A reference a user could download `path` from
    fn locate(&self, path: &str) -> Option<String>;
}

/// Remote object store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source rooted at `base_url`, giving up on requests after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("results-core/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl TextSource for HttpSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch_text<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>> {
        async move {
            let url = self.url(path);
            match self.client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => match resp.text().await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!("failed to read body of {}: {}", url, e);
                        None
                    }
                },
                Ok(resp) => {
                    debug!("{} returned {}", url, resp.status());
                    None
                }
                Err(e) => {
                    warn!("failed to fetch {}: {}", url, e);
                    None
                }
            }
        }
        .boxed()
    }

    fn locate(&self, path: &str) -> Option<String> {
        Some(self.url(path))
    }
}

/// Static files bundled under a directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    name: String,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        Self { root, name }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl TextSource for DirSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_text<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>> {
        async move {
            let full = self.resolve(path);
            // Blocking read on the polling thread; bundled files are small
            match fs::read(&full) {
                Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    debug!("{} unavailable: {}", full.display(), e);
                    None
                }
            }
        }
        .boxed()
    }

    fn locate(&self, path: &str) -> Option<String> {
        let full = self.resolve(path);
        full.is_file().then(|| full.display().to_string())
    }
}

/// Fixed set of files held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: HashMap::new(),
        }
    }

    /// Add a file, replacing any previous content at `path`
    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl TextSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_text<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>> {
        future::ready(self.files.get(path).cloned()).boxed()
    }

    fn locate(&self, path: &str) -> Option<String> {
        self.files
            .contains_key(path)
            .then(|| format!("{}:{}", self.name, path))
    }
}

/// Text fetched from a chain, with the position of the source that served it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub source: usize,
    pub text: String,
}

/// Sources in priority order; the first usable answer wins
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn TextSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower priority than those already present
    pub fn with_source(mut self, source: impl TextSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// First text for `path` that is present and not an HTML page
    ///
    /// An HTML body usually means the store answered a missing file with an
    /// error page, so it counts as unavailable and the next source is tried.
    pub async fn first_tabular(&self, path: &str) -> Option<Fetched> {
        for (index, source) in self.sources.iter().enumerate() {
            match source.fetch_text(path).await {
                Some(text) if looks_like_html(&text) => {
                    warn!("{} served HTML for {}, trying next source", source.name(), path);
                }
                Some(text) => {
                    debug!("{} served {}", source.name(), path);
                    return Some(Fetched { source: index, text });
                }
                None => debug!("{} has no {}", source.name(), path),
            }
        }
        None
    }

    /// Download reference from the source at `index`
    pub fn locate_in(&self, index: usize, path: &str) -> Option<String> {
        self.sources.get(index).and_then(|s| s.locate(path))
    }

    /// Download reference from the highest-priority source that has one
    pub fn locate(&self, path: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.locate(path))
    }
}

/// A CSV file found under a static data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Kind guessed from the file name
    pub kind: DataKind,
}

/// Walk `root` for CSV files, sorted by path
pub fn scan_sources<P: AsRef<Path>>(root: P) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root.as_ref()).follow_links(true) {
        let entry = entry?;
        let path = entry.path();

        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push(SourceFile {
                    path: path.to_path_buf(),
                    kind: kind_from_file_name(stem),
                });
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Guess the data kind from a file stem
///
/// - "club-records" -> ClubRecords
/// - "Personal_Bests_2024" -> PersonalBests
/// - "2024-06-01-open" -> EventResults
fn kind_from_file_name(stem: &str) -> DataKind {
    let stem = stem.to_ascii_lowercase().replace(['_', ' '], "-");
    if stem.contains("club-record") {
        DataKind::ClubRecords
    } else if stem.contains("personal-best") || stem.split('-').any(|part| part == "pbs") {
        DataKind::PersonalBests
    } else {
        DataKind::EventResults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("results-core-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_chain_falls_through_missing() {
        let chain = SourceChain::new()
            .with_source(MemorySource::new("remote"))
            .with_source(MemorySource::new("static").with_file("a.csv", "x,y\n1,2\n"));

        let fetched = block_on(chain.first_tabular("a.csv")).unwrap();
        assert_eq!(fetched.source, 1);
        assert_eq!(fetched.text, "x,y\n1,2\n");
    }

    #[test]
    fn test_chain_skips_html() {
        let chain = SourceChain::new()
            .with_source(
                MemorySource::new("remote").with_file("a.csv", "<!DOCTYPE html><p>404</p>"),
            )
            .with_source(MemorySource::new("static").with_file("a.csv", "x,y\n1,2\n"));

        assert_eq!(block_on(chain.first_tabular("a.csv")).unwrap().source, 1);
    }

    #[test]
    fn test_chain_prefers_primary() {
        let chain = SourceChain::new()
            .with_source(MemorySource::new("remote").with_file("a.csv", "remote"))
            .with_source(MemorySource::new("static").with_file("a.csv", "static"));

        assert_eq!(block_on(chain.first_tabular("a.csv")).unwrap().text, "remote");
    }

    #[test]
    fn test_chain_all_missing() {
        let chain = SourceChain::new().with_source(MemorySource::new("remote"));
        assert_eq!(block_on(chain.first_tabular("a.csv")), None);
        assert_eq!(SourceChain::new().locate("a.csv"), None);
    }

    #[test]
    fn test_memory_locate() {
        let chain = SourceChain::new()
            .with_source(MemorySource::new("remote"))
            .with_source(MemorySource::new("static").with_file("a.pdf", "%PDF"));
        assert_eq!(chain.locate("a.pdf").as_deref(), Some("static:a.pdf"));
        assert_eq!(chain.locate_in(0, "a.pdf"), None);
    }

    #[test]
    fn test_dir_source_reads_files() {
        let dir = temp_dir("dir-source");
        fs::create_dir_all(dir.join("results/outdoor")).unwrap();
        fs::write(dir.join("results/outdoor/open.csv"), "Name,Score\nJane,550\n").unwrap();

        let source = DirSource::new(&dir);
        assert_eq!(
            block_on(source.fetch_text("/results/outdoor/open.csv")).as_deref(),
            Some("Name,Score\nJane,550\n")
        );
        assert_eq!(block_on(source.fetch_text("results/indoor/none.csv")), None);
        assert!(source.locate("results/outdoor/open.csv").is_some());
        assert_eq!(source.locate("results/indoor/none.csv"), None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dir_source_reads_when_polled() {
        let dir = temp_dir("dir-source-lazy");
        let source = DirSource::new(&dir);

        let pending = source.fetch_text("late.csv");
        fs::write(dir.join("late.csv"), "Name,Score\nJane,550\n").unwrap();
        assert_eq!(block_on(pending).as_deref(), Some("Name,Score\nJane,550\n"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_http_source_url_join() {
        let source =
            HttpSource::new("https://store.example.org/bucket/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.locate("/records/club-records.csv").as_deref(),
            Some("https://store.example.org/bucket/records/club-records.csv")
        );
    }

    #[test]
    fn test_scan_sources() {
        let dir = temp_dir("scan");
        fs::create_dir_all(dir.join("records")).unwrap();
        fs::write(dir.join("records/club-records.csv"), "").unwrap();
        fs::write(dir.join("records/personal_bests.CSV"), "").unwrap();
        fs::write(dir.join("2024-06-01-open.csv"), "").unwrap();
        fs::write(dir.join("index.json"), "[]").unwrap();

        let files = scan_sources(&dir).unwrap();
        let kinds: Vec<DataKind> = files.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DataKind::EventResults,
                DataKind::ClubRecords,
                DataKind::PersonalBests,
            ]
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(kind_from_file_name("club_records_2023"), DataKind::ClubRecords);
        assert_eq!(kind_from_file_name("pbs"), DataKind::PersonalBests);
        assert_eq!(kind_from_file_name("spring-open"), DataKind::EventResults);
    }
}
