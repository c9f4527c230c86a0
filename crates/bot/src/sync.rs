//! The sync engine: one full scan cycle over the remote catalog.
//!
//! A cycle fetches every visible entry, classifies each against the
//! persisted marker cache, posts one message per genuine change, and
//! writes the cache back. The engine owns no ambient state: the cache is
//! loaded at cycle start and committed at cycle end, and the scheduler
//! guarantees cycles never overlap.

use tracing::{debug, info, instrument, warn};

use hibiki_core::PageId;

use crate::cache::{CacheStore, MarkerMap};
use crate::discord::{Channel, DiscordClient, build_entry_message};
use crate::error::AppError;
use crate::freshness::is_fresh;
use crate::notion::{Entry, Filter, NotionClient, PROP_PUBLIC, PROP_SERIES, PROP_TITLE, Sort};

/// How an observed entry relates to the last-notified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Never notified on before, marker freshly set.
    New,
    /// Previously notified on, marker freshly changed.
    GenuineUpdate,
    /// Marker changed but is stale relative to the edit: the edit was
    /// incidental (visibility toggle, unrelated field) or the marker is
    /// unparseable. Cache is synced silently, nobody is notified.
    IncidentalTouch,
}

/// One notifiable change, produced fresh each cycle.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Entry the change belongs to.
    pub id: PageId,
    /// What kind of change it is.
    pub classification: Classification,
}

/// Summary of one cycle, for logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleOutcome {
    /// Visible entries fetched this cycle.
    pub fetched: usize,
    /// Notifications dispatched.
    pub notified: usize,
    /// Whether the persisted cache was rewritten.
    pub cache_changed: bool,
    /// Whether this cycle ran the first-run bootstrap.
    pub bootstrapped: bool,
    /// Whether the cycle was skipped for lack of configuration.
    pub skipped: bool,
}

/// Decide what, if anything, an observed marker means.
///
/// `cached` is the marker we last notified on (or seeded), `current` is
/// the marker on the entry right now, `fresh` is the freshness
/// classification of `current` against the store's edit timestamp.
///
/// Pure so the decision table is testable without any I/O.
#[must_use]
pub fn classify(cached: Option<&str>, current: &str, fresh: bool) -> Option<Classification> {
    match (fresh, cached) {
        // Unchanged marker: nothing to do regardless of freshness.
        (_, Some(cached)) if cached == current => None,
        // Changed but stale: sync the baseline silently.
        (false, _) => Some(Classification::IncidentalTouch),
        (true, None) => Some(Classification::New),
        (true, Some(_)) => Some(Classification::GenuineUpdate),
    }
}

/// Titles of the other visible entries sharing an entry's series key,
/// ordered by title.
///
/// A lookup failure degrades to an empty group rather than failing the
/// caller; the series menu is decoration, not data.
pub async fn series_group(notion: &NotionClient, entry: &Entry) -> Vec<String> {
    let Some(series) = entry.series_key() else {
        return Vec::new();
    };

    let filter = Filter::and(vec![
        Filter::rich_text_equals(PROP_SERIES, series),
        Filter::checkbox_equals(PROP_PUBLIC, true),
    ]);

    match notion
        .query_one(Some(filter), vec![Sort::ascending(PROP_TITLE)])
        .await
    {
        Ok(pages) => pages
            .iter()
            .map(Entry::from_page)
            .filter_map(|e| e.title)
            .filter(|title| title != entry.display_title())
            .collect(),
        Err(e) => {
            warn!(error = %e, series, "failed to fetch series group");
            Vec::new()
        }
    }
}

/// Orchestrates fetch, classification, dispatch, and cache write-back.
pub struct SyncEngine {
    notion: NotionClient,
    discord: DiscordClient,
    cache: CacheStore,
    channel_id: Option<String>,
    web_base_url: String,
}

impl SyncEngine {
    /// Create a new engine.
    #[must_use]
    pub fn new(
        notion: NotionClient,
        discord: DiscordClient,
        cache: CacheStore,
        channel_id: Option<String>,
        web_base_url: impl Into<String>,
    ) -> Self {
        Self {
            notion,
            discord,
            cache,
            channel_id,
            web_base_url: web_base_url.into(),
        }
    }

    /// Run one full cycle.
    ///
    /// # Errors
    ///
    /// Returns error on a transport failure mid-fetch, an unresolvable
    /// destination, a dispatch failure, or a cache write failure. Any of
    /// these aborts the cycle; the scheduler retries on the next tick.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleOutcome, AppError> {
        let Some(channel_id) = self.channel_id.as_deref() else {
            warn!("no notification channel configured, skipping sync cycle");
            return Ok(CycleOutcome {
                skipped: true,
                ..CycleOutcome::default()
            });
        };

        let visible = Filter::checkbox_equals(PROP_PUBLIC, true);
        let pages = self.notion.query_all(Some(visible), Vec::new()).await?;
        if pages.is_empty() {
            debug!("no visible entries, nothing to do");
            return Ok(CycleOutcome::default());
        }

        let entries: Vec<Entry> = pages.iter().map(Entry::from_page).collect();

        if !self.cache.exists() {
            return self.bootstrap(&entries);
        }

        self.steady_state(channel_id, &entries).await
    }

    /// First run: remember every marked entry without notifying, so a
    /// fresh deployment does not flood the channel with the whole
    /// catalog.
    fn bootstrap(&self, entries: &[Entry]) -> Result<CycleOutcome, AppError> {
        let map: MarkerMap = entries
            .iter()
            .filter_map(|e| {
                e.marker()
                    .map(|marker| (e.id.clone(), marker.to_string()))
            })
            .collect();

        self.cache.save(&map)?;

        info!(seeded = map.len(), "first run: seeded marker cache without notifying");

        Ok(CycleOutcome {
            fetched: entries.len(),
            cache_changed: true,
            bootstrapped: true,
            ..CycleOutcome::default()
        })
    }

    async fn steady_state(
        &self,
        channel_id: &str,
        entries: &[Entry],
    ) -> Result<CycleOutcome, AppError> {
        let mut map = self.cache.load();

        // Resolve the destination once per cycle, before anything is
        // classified. An unresolvable destination aborts the whole cycle
        // with no dispatches and no cache writes.
        let channel = self.discord.get_channel(channel_id).await?;

        let mut changed = false;
        let mut notified = 0usize;

        for entry in entries {
            let Some(marker) = entry.marker() else {
                continue;
            };

            let cached = map.get(&entry.id).map(String::as_str);
            let fresh = is_fresh(entry.last_edited, marker);

            match classify(cached, marker, fresh) {
                None => {}
                Some(Classification::IncidentalTouch) => {
                    debug!(id = %entry.id, title = entry.display_title(), "incidental touch, cache synced silently");
                    map.insert(entry.id.clone(), marker.to_string());
                    changed = true;
                }
                Some(classification) => {
                    let event = ChangeEvent {
                        id: entry.id.clone(),
                        classification,
                    };
                    self.dispatch(&channel, entry, &event).await?;
                    // Commit follows the dispatch call, not delivery
                    // confirmation: at-least-once across crashes.
                    map.insert(entry.id.clone(), marker.to_string());
                    changed = true;
                    notified += 1;
                }
            }
        }

        if changed {
            self.cache.save(&map)?;
        }

        info!(
            fetched = entries.len(),
            notified,
            cache_changed = changed,
            "sync cycle complete"
        );

        Ok(CycleOutcome {
            fetched: entries.len(),
            notified,
            cache_changed: changed,
            ..CycleOutcome::default()
        })
    }

    /// Render and send exactly one message for one change event.
    async fn dispatch(
        &self,
        channel: &Channel,
        entry: &Entry,
        event: &ChangeEvent,
    ) -> Result<(), AppError> {
        let web_link = entry.web_link(&self.web_base_url);
        let series = series_group(&self.notion, entry).await;
        let message = build_entry_message(entry, event.classification, &web_link, &series);

        self.discord.create_message(&channel.id, &message).await?;

        info!(
            id = %event.id,
            classification = ?event.classification,
            title = entry.display_title(),
            "notified entry change"
        );

        Ok(())
    }
}
