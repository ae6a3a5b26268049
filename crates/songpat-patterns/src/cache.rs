//! Memoisation of compiled formatters.
//!
//! Compiling is cheap but not free, and callers tend to format many records
//! with a handful of patterns. The cache maps `(dialect, text)` to a shared
//! [`Formatter`]. When it is full it is emptied in one go before the next
//! entry is stored.

use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;

use crate::config;
use crate::dialect::Dialect;
use crate::errors::PatternError;
use crate::formatter::Formatter;

type Key = (Dialect, String);

/// Thread-safe store of compiled formatters with clear-on-overflow eviction.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use songpat_patterns::{Dialect, FormatterCache};
///
/// let cache = FormatterCache::new(8);
/// let first = cache.get_or_compile("<title>", Dialect::Plain).unwrap();
/// let again = cache.get_or_compile("<title>", Dialect::Plain).unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
/// ```
#[derive(Debug)]
pub struct FormatterCache {
    capacity: usize,
    entries: RwLock<HashMap<Key, Arc<Formatter>>>,
}

impl FormatterCache {
    /// Create a cache holding at most `capacity` formatters (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the formatter for `text` in `dialect`, compiling it on a miss.
    ///
    /// # Errors
    /// Propagates [`PatternError`] from [`Formatter::new`]; failures are not
    /// cached.
    pub fn get_or_compile(
        &self,
        text: &str,
        dialect: Dialect,
    ) -> Result<Arc<Formatter>, PatternError> {
        let key = (dialect, text.to_owned());
        if let Some(found) = self.read().get(&key) {
            return Ok(Arc::clone(found));
        }

        log::debug!("formatter cache miss for {dialect} pattern `{text}`");
        let formatter = Arc::new(Formatter::new(text, dialect)?);

        let mut entries = self.write();
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            log::debug!("formatter cache full at {} entries; clearing", entries.len());
            entries.clear();
        }
        Ok(Arc::clone(entries.entry(key).or_insert(formatter)))
    }

    /// Maximum number of entries before the cache is cleared.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached formatters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Report whether the cache holds no formatters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every cached formatter.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Key, Arc<Formatter>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Key, Arc<Formatter>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FormatterCache {
    fn default() -> Self {
        Self::new(config::cache_capacity())
    }
}

static GLOBAL_CACHE: OnceLock<FormatterCache> = OnceLock::new();

/// The process-wide cache, sized by [`config::cache_capacity`] on first use.
pub fn global_cache() -> &'static FormatterCache {
    GLOBAL_CACHE.get_or_init(FormatterCache::default)
}

/// Compile `text` for `dialect` through the [`global_cache`].
///
/// # Errors
/// See [`FormatterCache::get_or_compile`].
///
/// # Examples
/// ```
/// use songpat_patterns::{Dialect, compile_pattern};
/// use songpat_record::Song;
///
/// let pattern = compile_pattern("<title> (<artist>)", Dialect::Markup).unwrap();
/// let song = Song::new().with("title", "Rock & Roll").with("artist", "Ann");
/// assert_eq!(pattern.format(&song), "Rock &amp; Roll (Ann)");
/// ```
pub fn compile_pattern(text: &str, dialect: Dialect) -> Result<Arc<Formatter>, PatternError> {
    global_cache().get_or_compile(text, dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use songpat_record::Song;

    fn compiled(cache: &FormatterCache, text: &str, dialect: Dialect) -> Arc<Formatter> {
        cache
            .get_or_compile(text, dialect)
            .unwrap_or_else(|err| panic!("pattern `{text}` should compile: {err}"))
    }

    #[test]
    fn keys_entries_by_dialect_and_text() {
        let cache = FormatterCache::new(8);
        let plain = compiled(&cache, "<title>", Dialect::Plain);
        let markup = compiled(&cache, "<title>", Dialect::Markup);
        assert!(!Arc::ptr_eq(&plain, &markup));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clears_everything_when_full() {
        let cache = FormatterCache::new(2);
        compiled(&cache, "<a>", Dialect::Plain);
        compiled(&cache, "<b>", Dialect::Plain);
        assert_eq!(cache.len(), 2);
        compiled(&cache, "<c>", Dialect::Plain);
        assert_eq!(cache.len(), 1);
        compiled(&cache, "<c>", Dialect::Plain);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn eviction_does_not_change_behaviour() {
        let cache = FormatterCache::new(1);
        let song = Song::new().with("title", "Tune");
        let before = compiled(&cache, "[<title>]", Dialect::Plain).format(&song);
        compiled(&cache, "<other>", Dialect::Plain);
        let after = compiled(&cache, "[<title>]", Dialect::Plain).format(&song);
        assert_eq!(before, after);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = FormatterCache::new(4);
        assert!(cache.get_or_compile("<a>\\", Dialect::Plain).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(FormatterCache::new(0).capacity(), 1);
    }

    #[test]
    #[serial]
    fn global_cache_shares_formatters() {
        let first = compile_pattern("<global>", Dialect::Plain)
            .unwrap_or_else(|err| panic!("pattern should compile: {err}"));
        let second = compile_pattern("<global>", Dialect::Plain)
            .unwrap_or_else(|err| panic!("pattern should compile: {err}"));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(std::ptr::eq(global_cache(), global_cache()));
    }
}
