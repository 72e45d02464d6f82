//! Paginated, signed retrieval and aggregation of Alexa Top Sites rankings.
//!
//! A run splits the requested range into windows of at most
//! [`MAX_PAGE_SIZE`] entries, signs and sends one request per window through
//! a [`Transport`], parses each response and merges it into a
//! [`RankingAggregator`]. After every window the accumulated ranking is
//! published to each registered [`RankingSink`].

mod aggregator;
mod config;
mod error;
mod output;
mod pagination;
mod request;
mod transport;

pub use aggregator::RankingAggregator;
pub use config::TopSitesConfig;
pub use error::{TopSitesError, TopSitesResult};
pub use output::{ConsoleSink, JsonSnapshotSink, RankingSink};
pub use pagination::{
    MAX_PAGE_SIZE, PaginationController, RankingRequest, RunSummary, Window, plan_windows,
};
pub use request::build_request;
pub use topsites_xml::RankingEntry;
pub use transport::{HttpTransport, Transport};
