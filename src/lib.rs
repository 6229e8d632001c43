// phishsweep: find and remove phishing email from Office 365 mailboxes.
//
// This is the library root. The vendor module wraps the Cloud App Security
// sweeping and mitigation APIs; feeds pulls phishing URL lists; pipeline
// ties the two together for bulk sweeps.

pub mod config;
pub mod error;
pub mod feeds;
pub mod output;
pub mod pipeline;
pub mod vendor;

pub use error::{Error, Result};
