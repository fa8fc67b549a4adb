//! Server-side extraction targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Domain
// ============================================================================

/// A site with a dedicated structured-data extractor on the server.
///
/// Setting a domain on a scrape makes the service return the
/// `extracted` mapping alongside the raw HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Amazon product pages
    Amazon,
    /// Walmart product pages
    Walmart,
    /// Google search results
    Google,
    /// Google Shopping results
    GoogleShopping,
    /// eBay listings
    Ebay,
    /// Target product pages
    Target,
    /// Etsy listings
    Etsy,
    /// Best Buy product pages
    Bestbuy,
    /// Home Depot product pages
    Homedepot,
    /// Zillow property listings
    Zillow,
    /// Yelp business pages
    Yelp,
    /// Indeed job postings
    Indeed,
    /// `LinkedIn` job postings
    LinkedinJobs,
}

impl Domain {
    /// Returns the wire name used in the `domain` payload field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::Walmart => "walmart",
            Self::Google => "google",
            Self::GoogleShopping => "google_shopping",
            Self::Ebay => "ebay",
            Self::Target => "target",
            Self::Etsy => "etsy",
            Self::Bestbuy => "bestbuy",
            Self::Homedepot => "homedepot",
            Self::Zillow => "zillow",
            Self::Yelp => "yelp",
            Self::Indeed => "indeed",
            Self::LinkedinJobs => "linkedin_jobs",
        }
    }

    /// Returns all supported domains.
    pub fn all() -> &'static [Domain] {
        &[
            Self::Amazon,
            Self::Walmart,
            Self::Google,
            Self::GoogleShopping,
            Self::Ebay,
            Self::Target,
            Self::Etsy,
            Self::Bestbuy,
            Self::Homedepot,
            Self::Zillow,
            Self::Yelp,
            Self::Indeed,
            Self::LinkedinJobs,
        ]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownDomain(s.to_string()))
    }
}
