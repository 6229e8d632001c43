// Phishing URL feeds — trait-based so callers can take any source.
//
// CommunityFeed pulls the PhishTank verified-online CSV; CommercialFeed
// pulls the OpenPhish plain-text list. Both fetch fresh on every call and
// keep nothing between calls.

pub mod commercial;
pub mod community;
pub mod traits;

pub use commercial::CommercialFeed;
pub use community::CommunityFeed;
pub use traits::FeedFetcher;
