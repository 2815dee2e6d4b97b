//! Font compaction for fontspider.
//!
//! [`spider`] finds the pages of a site, resolves which characters each
//! declared font renders (see `fontspider_resolve`), adds any reserved
//! text, and rewrites every used font down to those glyphs. The subsetting
//! itself is behind the [`Subsetter`] trait; [`PyftsubsetCommand`] drives
//! fontTools.

/// Font backups.
pub mod backup;
/// Page discovery.
pub mod discover;
/// Compaction errors.
pub mod error;
/// Reserved text.
pub mod reserve;
/// The compaction run.
pub mod spider;
/// The subsetting seam.
pub mod subset;

pub use backup::{backup, backup_path};
pub use discover::{DEFAULT_SOURCE, discover};
pub use error::{CompactError, SubsetError};
pub use reserve::ReserveText;
pub use spider::{SpiderOptions, SpiderReport, plan, spider};
pub use subset::{PyftsubsetCommand, Subsetter};
