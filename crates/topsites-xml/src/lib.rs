//! XML response parsing for the Alexa Top Sites client.
//!
//! A `TopSites` response nests one `Site` element per ranked site:
//!
//! ```xml
//! <aws:TopSitesResponse xmlns:aws="http://ats.amazonaws.com/doc/2005-07-11">
//!   <aws:Response>
//!     <aws:TopSitesResult><aws:Alexa><aws:TopSites><aws:List>
//!       <aws:Sites>
//!         <aws:Site>
//!           <aws:DataUrl>google.com</aws:DataUrl>
//!           <aws:Country>
//!             <aws:Rank>1</aws:Rank>
//!           </aws:Country>
//!         </aws:Site>
//!       </aws:Sites>
//!     </aws:List></aws:TopSites></aws:Alexa></aws:TopSitesResult>
//!   </aws:Response>
//! </aws:TopSitesResponse>
//! ```
//!
//! [`parse_ranking`] finds every `Site` at any depth and returns one
//! [`RankingEntry`] per site in document order.
//!
//! Elements are matched by local name only. The namespace (normally
//! `http://ats.amazonaws.com/doc/2005-07-11`) and its prefix are not checked,
//! so `<aws:Site>` and an unqualified `<Site>` are treated alike.

pub mod deserialize;
pub mod error;

pub use deserialize::parse_ranking;
pub use error::XmlError;

/// One ranked site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    /// Rank within the requested country.
    pub rank: u32,
    /// Site identifier (`DataUrl`).
    pub item: String,
}

impl RankingEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(rank: u32, item: impl Into<String>) -> Self {
        Self {
            rank,
            item: item.into(),
        }
    }
}
