use crate::descriptor::FontDescriptor;
use crate::selector::FontSelector;
use fixpdf_traits::{FontError, FontProvider, SharedFontData};
use fixpdf_types::{FontFamily, FontStyle, LogicalFont};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Point size used when a descriptor is requested by family and style alone.
pub const REFERENCE_FONT_SIZE: f32 = 10.0;

static GLOBAL: Lazy<Arc<FontDescriptorCache>> =
    Lazy::new(|| Arc::new(FontDescriptorCache::new(crate::default_provider())));

/// Counters describing cache traffic since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub constructions: u64,
    pub failures: u64,
    pub clears: u64,
}

/// Shared map from [`FontSelector`] to its single [`FontDescriptor`].
///
/// Lookups of present entries only take a read lock. A miss re-checks and
/// constructs while holding one coarse creation lock, so at most one
/// descriptor is being built at any moment, across all selectors, and two
/// racing callers for the same selector end up with the same `Arc`.
/// [`clear_all`](Self::clear_all) takes the creation lock too and therefore
/// never interleaves with a construction.
pub struct FontDescriptorCache {
    table: RwLock<HashMap<FontSelector, Arc<FontDescriptor>>>,
    create_lock: Mutex<()>,
    provider: Arc<dyn FontProvider>,
    hits: AtomicU64,
    constructions: AtomicU64,
    failures: AtomicU64,
    clears: AtomicU64,
}

impl FontDescriptorCache {
    pub fn new(provider: Arc<dyn FontProvider>) -> Self {
        Self {
            table: RwLock::new(HashMap::new()),
            create_lock: Mutex::new(()),
            provider,
            hits: AtomicU64::new(0),
            constructions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    /// The process-wide cache, created on first use over
    /// [`default_provider`](crate::default_provider).
    pub fn global() -> Arc<FontDescriptorCache> {
        Arc::clone(&GLOBAL)
    }

    pub fn provider(&self) -> &Arc<dyn FontProvider> {
        &self.provider
    }

    /// Returns the cached descriptor for `selector` without constructing.
    pub fn find(&self, selector: &FontSelector) -> Option<Arc<FontDescriptor>> {
        self.read_table().get(selector).cloned()
    }

    /// Descriptor for a logical font; the font's size only guides resolution.
    pub fn get_or_create(&self, font: &LogicalFont) -> Result<Arc<FontDescriptor>, FontError> {
        if font.family.name.is_empty() {
            return Err(FontError::InvalidArgument("font family name is empty".to_string()));
        }
        let selector = FontSelector::from_font(font);
        self.get_or_insert_with(selector, || FontDescriptor::from_font(font, self.provider.as_ref()))
    }

    /// Descriptor for `family` in `style`, resolved at [`REFERENCE_FONT_SIZE`].
    pub fn get_or_create_for_family(
        &self,
        family: &FontFamily,
        style: FontStyle,
    ) -> Result<Arc<FontDescriptor>, FontError> {
        if family.name.is_empty() {
            return Err(FontError::InvalidArgument("font family name is empty".to_string()));
        }
        let selector = FontSelector::from_family(family, style);
        self.get_or_insert_with(selector, || {
            let font = LogicalFont::new(family.name.as_str(), REFERENCE_FONT_SIZE, style);
            FontDescriptor::from_font(&font, self.provider.as_ref())
        })
    }

    /// Descriptor for a raw font program keyed by `name` in Regular style.
    ///
    /// Once `name` is cached, later calls return the existing descriptor and
    /// `data` is ignored, even if it differs.
    pub fn get_or_create_from_data(
        &self,
        name: &str,
        data: impl Into<SharedFontData>,
    ) -> Result<Arc<FontDescriptor>, FontError> {
        if name.is_empty() {
            return Err(FontError::InvalidArgument("font name is empty".to_string()));
        }
        let data = data.into();
        if data.is_empty() {
            return Err(FontError::InvalidArgument(format!("font data for '{}' is empty", name)));
        }
        let selector = FontSelector::from_name(name);
        self.get_or_insert_with(selector, || FontDescriptor::from_data(name, data))
    }

    /// Drops every cached descriptor. Outstanding `Arc`s stay valid; later
    /// requests construct fresh instances.
    pub fn clear_all(&self) {
        let _creating = self.lock_creation();
        let mut table = self.write_table();
        let dropped = table.len();
        table.clear();
        self.clears.fetch_add(1, Ordering::Relaxed);
        log::debug!("Cleared {} cached font descriptor(s)", dropped);
    }

    pub fn len(&self) -> usize {
        self.read_table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            constructions: self.constructions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }

    fn get_or_insert_with<F>(&self, selector: FontSelector, build: F) -> Result<Arc<FontDescriptor>, FontError>
    where
        F: FnOnce() -> Result<FontDescriptor, FontError>,
    {
        if let Some(found) = self.find(&selector) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }

        let _creating = self.lock_creation();
        // Another caller may have finished while we waited for the lock.
        if let Some(found) = self.find(&selector) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }

        let descriptor = match build() {
            Ok(descriptor) => Arc::new(descriptor),
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to construct font descriptor for {}: {}", selector, e);
                return Err(e);
            }
        };
        self.constructions.fetch_add(1, Ordering::Relaxed);
        log::debug!("Constructed font descriptor for {}", selector);
        self.write_table().insert(selector, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    // The table only changes after a successful construction, so a panic in
    // another thread cannot leave it half-updated.
    fn read_table(&self) -> std::sync::RwLockReadGuard<'_, HashMap<FontSelector, Arc<FontDescriptor>>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<FontSelector, Arc<FontDescriptor>>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_creation(&self) -> MutexGuard<'_, ()> {
        self.create_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for FontDescriptorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontDescriptorCache")
            .field("entries", &self.len())
            .field("provider", &self.provider.name())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Empties the global cache, releasing every descriptor it holds.
pub fn force_release_cached_fonts() {
    FontDescriptorCache::global().clear_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_font;
    use fixpdf_traits::{FontQuery, InMemoryFontProvider};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn provider_with(fonts: &[(&str, FontStyle)]) -> Arc<InMemoryFontProvider> {
        let provider = InMemoryFontProvider::new();
        for (family, style) in fonts {
            provider
                .add_font(*family, *style, synthetic_font(family, *style))
                .unwrap();
        }
        Arc::new(provider)
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cache_with(fonts: &[(&str, FontStyle)]) -> FontDescriptorCache {
        FontDescriptorCache::new(provider_with(fonts))
    }

    /// Wraps a provider, counting loads and tracking how many overlap.
    #[derive(Debug)]
    struct SlowProvider {
        inner: InMemoryFontProvider,
        delay: Duration,
        loads: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl SlowProvider {
        fn new(fonts: &[(&str, FontStyle)], delay: Duration) -> Self {
            let inner = InMemoryFontProvider::new();
            for (family, style) in fonts {
                inner.add_font(*family, *style, synthetic_font(family, *style)).unwrap();
            }
            Self {
                inner,
                delay,
                loads: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
            }
        }
    }

    impl FontProvider for SlowProvider {
        fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            thread::sleep(self.delay);
            let result = self.inner.load_font(query);
            self.active.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn list_families(&self) -> Vec<String> {
            self.inner.list_families()
        }

        fn name(&self) -> &'static str {
            "SlowProvider"
        }
    }

    #[test]
    fn repeated_requests_share_one_instance() {
        let cache = cache_with(&[("Test Sans", FontStyle::REGULAR)]);
        let font = LogicalFont::new("Test Sans", 12.0, FontStyle::REGULAR);

        let first = cache.get_or_create(&font).unwrap();
        let second = cache.get_or_create(&font).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().constructions, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn size_does_not_split_entries() {
        let cache = cache_with(&[("Test Sans", FontStyle::BOLD)]);
        let small = cache.get_or_create(&LogicalFont::new("Test Sans", 8.0, FontStyle::BOLD)).unwrap();
        let by_family = cache
            .get_or_create_for_family(&FontFamily::new("Test Sans"), FontStyle::BOLD)
            .unwrap();
        assert!(Arc::ptr_eq(&small, &by_family));
    }

    #[test]
    fn styles_are_distinct_entries() {
        let cache = cache_with(&[("Test Sans", FontStyle::REGULAR), ("Test Sans", FontStyle::BOLD)]);
        let family = FontFamily::new("Test Sans");
        let regular = cache.get_or_create_for_family(&family, FontStyle::REGULAR).unwrap();
        let bold = cache.get_or_create_for_family(&family, FontStyle::BOLD).unwrap();
        assert!(!Arc::ptr_eq(&regular, &bold));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_requests_construct_once() {
        init_logging();
        let provider = Arc::new(SlowProvider::new(
            &[("Test Sans", FontStyle::ITALIC)],
            Duration::from_millis(20),
        ));
        let cache = Arc::new(FontDescriptorCache::new(provider.clone()));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_create(&LogicalFont::new("Test Sans", 10.0, FontStyle::ITALIC))
                        .unwrap()
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|d| Arc::ptr_eq(d, &results[0])));
        assert_eq!(cache.stats().constructions, 1);
    }

    #[test]
    fn constructions_are_serialized_across_selectors() {
        init_logging();
        let fonts = [
            ("Alpha", FontStyle::REGULAR),
            ("Beta", FontStyle::REGULAR),
            ("Gamma", FontStyle::REGULAR),
            ("Delta", FontStyle::REGULAR),
        ];
        let provider = Arc::new(SlowProvider::new(&fonts, Duration::from_millis(10)));
        let cache = Arc::new(FontDescriptorCache::new(provider.clone()));

        let handles: Vec<_> = fonts
            .iter()
            .map(|(family, _)| {
                let cache = Arc::clone(&cache);
                let family = FontFamily::new(*family);
                thread::spawn(move || cache.get_or_create_for_family(&family, FontStyle::REGULAR).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(provider.loads.load(Ordering::SeqCst), 4);
        assert_eq!(provider.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn find_never_constructs() {
        let provider = Arc::new(SlowProvider::new(&[("Test Sans", FontStyle::REGULAR)], Duration::ZERO));
        let cache = FontDescriptorCache::new(provider.clone());
        let selector = FontSelector::new("Test Sans", FontStyle::REGULAR);

        assert!(cache.find(&selector).is_none());
        assert_eq!(provider.loads.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());

        let created = cache
            .get_or_create_for_family(&FontFamily::new("Test Sans"), FontStyle::REGULAR)
            .unwrap();
        let found = cache.find(&selector).unwrap();
        assert!(Arc::ptr_eq(&created, &found));
    }

    #[test]
    fn clear_all_yields_fresh_instances() {
        let cache = cache_with(&[("Test Sans", FontStyle::REGULAR)]);
        let family = FontFamily::new("Test Sans");

        let before = cache.get_or_create_for_family(&family, FontStyle::REGULAR).unwrap();
        cache.clear_all();
        assert!(cache.is_empty());
        assert!(cache.find(before.selector()).is_none());

        let after = cache.get_or_create_for_family(&family, FontStyle::REGULAR).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        // The old handle is still usable.
        assert_eq!(before.postscript_name(), "TestSans");
        assert_eq!(cache.stats().clears, 1);
    }

    #[test]
    fn failed_construction_inserts_nothing() {
        init_logging();
        let cache = cache_with(&[]);
        let family = FontFamily::new("Missing");

        let err = cache.get_or_create_for_family(&family, FontStyle::REGULAR).unwrap_err();
        assert!(matches!(err, FontError::NotFound { .. }));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().failures, 1);

        // A retry goes back to the provider instead of replaying a cached failure.
        let err = cache.get_or_create_for_family(&family, FontStyle::REGULAR).unwrap_err();
        assert!(matches!(err, FontError::NotFound { .. }));
        assert_eq!(cache.stats().failures, 2);
    }

    #[test]
    fn failure_leaves_cache_usable() {
        let cache = cache_with(&[("Test Sans", FontStyle::REGULAR)]);
        assert!(cache.get_or_create_from_data("Broken", vec![1u8; 32]).is_err());
        let ok = cache.get_or_create_for_family(&FontFamily::new("Test Sans"), FontStyle::REGULAR);
        assert!(ok.is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_waits_for_in_flight_construction() {
        init_logging();
        let provider = Arc::new(SlowProvider::new(
            &[("Test Sans", FontStyle::REGULAR)],
            Duration::from_millis(100),
        ));
        let cache = Arc::new(FontDescriptorCache::new(provider.clone()));

        let builder = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                cache
                    .get_or_create_for_family(&FontFamily::new("Test Sans"), FontStyle::REGULAR)
                    .unwrap()
            })
        };
        while provider.active.load(Ordering::SeqCst) == 0 {
            thread::yield_now();
        }
        // Blocks until the construction above has been inserted, then removes it.
        cache.clear_all();
        let built = builder.join().unwrap();

        assert!(cache.is_empty());
        assert!(cache.find(built.selector()).is_none());
    }

    #[test]
    fn empty_arguments_are_rejected_up_front() {
        let provider = Arc::new(SlowProvider::new(&[], Duration::ZERO));
        let cache = FontDescriptorCache::new(provider.clone());

        let cases = [
            cache.get_or_create(&LogicalFont::new("", 10.0, FontStyle::REGULAR)),
            cache.get_or_create_for_family(&FontFamily::new(""), FontStyle::BOLD),
            cache.get_or_create_from_data("", synthetic_font("X", FontStyle::REGULAR)),
            cache.get_or_create_from_data("Named", Vec::new()),
        ];
        for result in cases {
            assert!(matches!(result, Err(FontError::InvalidArgument(_))));
        }
        assert_eq!(provider.loads.load(Ordering::SeqCst), 0);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn raw_data_is_keyed_by_name_only() {
        let cache = cache_with(&[]);
        let first = cache
            .get_or_create_from_data("Embedded1", synthetic_font("First Face", FontStyle::REGULAR))
            .unwrap();
        let second = cache
            .get_or_create_from_data("Embedded1", synthetic_font("Second Face", FontStyle::BOLD))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.family_name(), "First Face");
        assert_eq!(first.selector(), &FontSelector::from_name("Embedded1"));
    }

    #[test]
    fn raw_name_shares_identity_with_regular_family() {
        let cache = cache_with(&[("Shared", FontStyle::REGULAR)]);
        let from_data = cache
            .get_or_create_from_data("Shared", synthetic_font("Other", FontStyle::REGULAR))
            .unwrap();
        let from_family = cache
            .get_or_create_for_family(&FontFamily::new("Shared"), FontStyle::REGULAR)
            .unwrap();
        assert!(Arc::ptr_eq(&from_data, &from_family));
    }

    #[test]
    fn global_is_a_single_instance() {
        let a = FontDescriptorCache::global();
        let b = FontDescriptorCache::global();
        assert!(Arc::ptr_eq(&a, &b));

        let before = a.stats().clears;
        force_release_cached_fonts();
        assert!(b.stats().clears > before);
    }
}
