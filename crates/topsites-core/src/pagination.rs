//! Window planning and the sequential signed-request loop.

use std::fmt;

use topsites_auth::{Credentials, QueryParameters, Signer, TimeContext};
use topsites_xml::parse_ranking;
use tracing::{debug, info, warn};

use crate::aggregator::RankingAggregator;
use crate::config::TopSitesConfig;
use crate::error::{TopSitesError, TopSitesResult};
use crate::output::RankingSink;
use crate::request::build_request;
use crate::transport::Transport;

/// Largest number of entries the service returns per request.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// One bounded request: `count` entries starting at rank `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// 1-based offset of the first rank requested.
    pub start: u32,
    /// Number of entries requested.
    pub count: u32,
}

impl Window {
    /// Whether this window requests zero entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Split `count` entries starting at `start` into windows of `page_size`.
///
/// Produces `count / page_size` full windows followed by one remainder
/// window of `count % page_size` entries. When `count` is a multiple of
/// `page_size` the remainder window is empty; it is still returned.
///
/// # Errors
///
/// Returns [`TopSitesError::InvalidCount`] if `count` is zero,
/// [`TopSitesError::InvalidPageSize`] if `page_size` is zero, and
/// [`TopSitesError::WindowOverflow`] if an offset exceeds `u32::MAX`.
///
/// # Examples
///
/// ```
/// use topsites_core::{Window, plan_windows};
///
/// let windows = plan_windows(1, 2500, 1000).unwrap();
/// assert_eq!(windows.last(), Some(&Window { start: 2001, count: 500 }));
/// ```
pub fn plan_windows(start: u32, count: u32, page_size: u32) -> TopSitesResult<Vec<Window>> {
    if count == 0 {
        return Err(TopSitesError::InvalidCount);
    }
    if page_size == 0 {
        return Err(TopSitesError::InvalidPageSize);
    }

    let full = count / page_size;
    let mut windows = Vec::with_capacity(full as usize + 1);
    let mut offset = start;

    for _ in 0..full {
        windows.push(Window {
            start: offset,
            count: page_size,
        });
        offset = offset
            .checked_add(page_size)
            .ok_or(TopSitesError::WindowOverflow { start: offset })?;
    }
    windows.push(Window {
        start: offset,
        count: count % page_size,
    });

    Ok(windows)
}

/// What a run asks the service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRequest {
    /// ISO country code.
    pub country_code: String,
    /// Rank of the first requested entry.
    pub start: u32,
    /// Total number of entries requested.
    pub count: u32,
}

impl RankingRequest {
    /// Request `count` entries for `country_code` starting at rank 1.
    #[must_use]
    pub fn new(country_code: impl Into<String>, count: u32) -> Self {
        Self {
            country_code: country_code.into(),
            start: 1,
            count,
        }
    }

    /// Start at `start` instead of rank 1.
    #[must_use]
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }
}

/// Totals of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Requests issued.
    pub windows: usize,
    /// Entries received across all responses.
    pub entries: usize,
    /// Distinct ranks held by the aggregator.
    pub ranks: usize,
}

/// Drives one signed request per window and merges the results.
///
/// Windows run strictly in order; each response is parsed, merged and
/// published before the next request is signed.
pub struct PaginationController<T> {
    transport: T,
    config: TopSitesConfig,
    aggregator: RankingAggregator,
    sinks: Vec<Box<dyn RankingSink>>,
}

impl<T> fmt::Debug for PaginationController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationController")
            .field("config", &self.config)
            .field("aggregator", &self.aggregator)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> PaginationController<T> {
    /// Create a controller with an empty aggregator and no sinks.
    pub fn new(transport: T, config: TopSitesConfig) -> Self {
        Self {
            transport,
            config,
            aggregator: RankingAggregator::new(),
            sinks: Vec::new(),
        }
    }

    /// Register a sink that receives the ranking after every window.
    #[must_use]
    pub fn with_sink(mut self, sink: impl RankingSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// The accumulated ranking.
    #[must_use]
    pub fn aggregator(&self) -> &RankingAggregator {
        &self.aggregator
    }

    /// Consume the controller and return the aggregator.
    #[must_use]
    pub fn into_aggregator(self) -> RankingAggregator {
        self.aggregator
    }

    /// Fetch every window of `request`, signing all of them with `time`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid count before any request is made. Any transport,
    /// parse or sink error aborts the run; sinks keep whatever the last
    /// completed window published.
    pub fn run(
        &mut self,
        credentials: &Credentials,
        time: &TimeContext,
        request: &RankingRequest,
    ) -> TopSitesResult<RunSummary> {
        let windows = plan_windows(request.start, request.count, MAX_PAGE_SIZE)?;
        let signer = Signer::new(credentials, time);

        info!(
            country = %request.country_code,
            start = request.start,
            count = request.count,
            windows = windows.len(),
            timestamp = time.timestamp(),
            "Starting ranking retrieval"
        );

        let mut summary = RunSummary::default();
        for (index, window) in windows.iter().enumerate() {
            if window.is_empty() {
                warn!(
                    start = window.start,
                    "Requesting a zero-count remainder window; the service may reject it"
                );
            }

            let query = QueryParameters::top_sites(&request.country_code, window.start, window.count);
            let http_request = build_request(&self.config, &signer, &query)?;
            let body = self.transport.execute(http_request)?;
            let entries = parse_ranking(body.as_bytes())?;

            summary.windows += 1;
            summary.entries += entries.len();

            let received = entries.len();
            let replaced = self.aggregator.merge(entries);
            if replaced > 0 {
                warn!(replaced, start = window.start, "Window overlapped ranks already held");
            }

            for sink in &mut self.sinks {
                sink.publish(self.aggregator.snapshot())?;
            }

            debug!(
                window = index + 1,
                start = window.start,
                count = window.count,
                received,
                "Window complete"
            );
        }

        summary.ranks = self.aggregator.snapshot().len();
        info!(
            windows = summary.windows,
            entries = summary.entries,
            ranks = summary.ranks,
            "Ranking retrieval complete"
        );

        Ok(summary)
    }
}
