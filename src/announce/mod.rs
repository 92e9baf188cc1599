//! Announce sound pipeline: sniffing, duration probing and atomic storage.

mod error;
mod identifier;
mod models;
pub mod prober;
pub mod sniffer;
mod store;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{AnnounceError, AnnounceErrorKind};
pub use identifier::{validate_identifier, MAX_IDENTIFIER_LEN};
pub use models::{AssetExtension, StoredAsset};
pub use prober::{DurationProber, ProbeError, SymphoniaProber};
pub use sniffer::{sniff, SniffedType, SNIFF_PREFIX_LEN};
pub use store::AnnounceStore;
