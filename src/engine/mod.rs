//! Execution engine module
//!
//! Main read loop for the workers stream.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Token, count and paged fetch orchestration
//! - `SyncConfig` - Configuration for sync operations
//! - `SyncStats` - Counters reported in the closing log message
//!
//! `SyncEngine::start` acquires the token and issues the count request
//! eagerly, so authentication failures surface before any record. Pages are
//! then fetched lazily as the returned stream is polled, one request at a
//! time.

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::connector::{Message, MessageStream};
use crate::decode::{JsonDecoder, RecordDecoder, TotalCountDecoder};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{final_page_index, NextPage, PageCursor, Paginator, SkipTopPaginator};
use crate::tls::ClientIdentity;
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for the paged workers collection
pub struct SyncEngine {
    /// HTTP client (authenticator attached)
    client: HttpClient,
    /// Sync configuration
    config: SyncConfig,
    /// Page body decoder
    decoder: JsonDecoder,
    /// Count response decoder
    counter: TotalCountDecoder,
    /// Credential guard kept alive until the stream is dropped
    identity: Option<ClientIdentity>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            config: SyncConfig::default(),
            decoder: JsonDecoder::workers(),
            counter: TotalCountDecoder::default(),
            identity: None,
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Hold the client identity (and any materialized files) for the run
    #[must_use]
    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Get the sync configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The identity held for the run, if any
    pub fn identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }

    /// Ask the API how many records the collection holds
    pub async fn total_count(&self) -> Result<u64> {
        let path = self.config.count_path();
        debug!("Requesting total count: {}", path);
        let response = self.client.get(&path).await?;
        let body = response.text().await?;
        self.counter.decode(&body)
    }

    /// Fetch and decode a single page
    ///
    /// A `204 No Content` or an empty body is an empty page.
    pub async fn fetch_page(&self, cursor: PageCursor) -> Result<Vec<Value>> {
        let path = cursor.path(&self.config.resource);
        debug!("Fetching page {}: {}", cursor.page(), path);

        let response = self.client.get(&path).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        self.decoder.decode(&body)
    }

    /// Acquire a token, count the collection and return the lazy record stream
    pub async fn start(self) -> Result<MessageStream> {
        let started = Instant::now();

        if let Some(auth) = self.client.authenticator() {
            auth.token().await?;
        }

        let total = self.total_count().await?;
        let final_page = final_page_index(total, self.config.page_size);
        let paginator = SkipTopPaginator::new(self.config.termination, Some(final_page))
            .with_page_size(self.config.page_size);

        info!(
            "Starting sync of {}: {} records reported, final page {} ({:?})",
            self.config.stream_name, total, final_page, self.config.termination
        );
        let opening = Message::info(format!(
            "Found {total} {} across {} page(s)",
            self.config.resource,
            final_page + 1
        ));

        let state = ReadState {
            next: Some(paginator.first_page()),
            paginator,
            pending: VecDeque::new(),
            stats: SyncStats {
                total_reported: total,
                ..SyncStats::default()
            },
            started,
            finished: false,
            engine: self,
        };

        let records = stream::try_unfold(state, |mut state| async move {
            let message = state.step().await?;
            Ok::<_, Error>(message.map(|message| (message, state)))
        });

        Ok(Box::pin(stream::once(async move { Ok::<_, Error>(opening) }).chain(records)))
    }
}

/// Unfold state of a running sync
struct ReadState {
    engine: SyncEngine,
    paginator: SkipTopPaginator,
    next: Option<PageCursor>,
    pending: VecDeque<Value>,
    stats: SyncStats,
    started: Instant,
    finished: bool,
}

impl ReadState {
    /// Produce the next message, fetching a page when the buffer runs dry
    async fn step(&mut self) -> Result<Option<Message>> {
        loop {
            if self.finished {
                return Ok(None);
            }

            if let Some(record) = self.pending.pop_front() {
                self.stats.add_records(1);
                if self.engine.config.limit_reached(self.stats.records_synced) {
                    debug!("Reached max records ({})", self.engine.config.max_records);
                    self.pending.clear();
                    self.next = None;
                }
                return Ok(Some(Message::record(
                    &self.engine.config.stream_name,
                    record,
                )));
            }

            match self.next.take() {
                Some(cursor) => {
                    let records = self.engine.fetch_page(cursor).await?;
                    self.stats.add_page();
                    debug!("Page {} returned {} records", cursor.page(), records.len());

                    self.next = match self.paginator.next_page(cursor, records.len()) {
                        NextPage::Continue(next) => Some(next),
                        NextPage::Done => None,
                    };
                    self.pending.extend(records);
                }
                None => {
                    self.finished = true;
                    self.stats.duration_ms = self.started.elapsed().as_millis() as u64;
                    let summary = self.stats.summary(&self.engine.config.stream_name);
                    info!("{}", summary);
                    return Ok(Some(Message::info(summary)));
                }
            }
        }
    }
}
