//! Font identity, descriptor construction and the shared descriptor cache.
//!
//! A [`FontSelector`] names a logical font by `(name, style)`. A
//! [`FontDescriptor`] is the parsed, immutable font resource (metrics plus the
//! embeddable font program) for exactly one selector. The
//! [`FontDescriptorCache`] guarantees that each distinct selector is parsed at
//! most once and that every caller shares the same descriptor instance until
//! the cache is cleared.
//!
//! ## Font sources
//!
//! Logical fonts are resolved through a [`fixpdf_traits::FontProvider`]:
//! - **System fonts** (feature: `system-fonts`): [`SystemFontProvider`] backed by fontdb
//! - **In-memory**: [`fixpdf_traits::InMemoryFontProvider`]
//!
//! Raw font programs shipped inside a source document bypass the provider and
//! are keyed purely by a caller-chosen name.

mod cache;
mod descriptor;
pub mod encoding;
mod selector;
#[cfg(feature = "system-fonts")]
mod system;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use cache::{force_release_cached_fonts, CacheStats, FontDescriptorCache, REFERENCE_FONT_SIZE};
pub use descriptor::FontDescriptor;
pub use selector::FontSelector;
#[cfg(feature = "system-fonts")]
pub use system::SystemFontProvider;

pub use fixpdf_traits::{FontError, FontProvider, FontQuery, InMemoryFontProvider, SharedFontData};

use std::sync::Arc;

/// The provider backing [`FontDescriptorCache::global`].
///
/// With `system-fonts` this scans the host's installed fonts; otherwise it is
/// an empty in-memory provider and only raw-data fonts resolve.
pub fn default_provider() -> Arc<dyn FontProvider> {
    #[cfg(feature = "system-fonts")]
    {
        Arc::new(SystemFontProvider::with_system_fonts())
    }
    #[cfg(not(feature = "system-fonts"))]
    {
        Arc::new(InMemoryFontProvider::new())
    }
}
