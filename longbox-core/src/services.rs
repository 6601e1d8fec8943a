//! External catalog service seam
//!
//! Concrete adapters (network clients, caches, rate limits) live outside
//! this crate. An adapter runs its own search and select protocol against
//! its catalog, shapes the result as one [`Overlay`] and hands it to the
//! [`Reconciler`]; nothing in this crate performs network I/O.

use crate::error::Result;
use crate::merge::Reconciler;
use crate::types::{Metadata, Source};

/// A catalog service that can enrich metadata for one archive
pub trait MetadataProvider {
    /// Which service this adapter fronts
    fn source(&self) -> Source;

    /// Look the issue up and reconcile whatever the catalog returned
    fn update_metadata(&mut self, metadata: &mut Metadata, engine: &mut Reconciler<'_>)
        -> Result<()>;
}
