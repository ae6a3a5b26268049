//! Runtime configuration for songpat-patterns.
//!
//! Two limits are tunable: the number of compiled formatters kept by the
//! global cache (`SONGPAT_CACHE_CAPACITY`) and the byte budget of each path
//! segment produced by the path dialect (`SONGPAT_PATH_SEGMENT_LIMIT`). An
//! in-process override takes precedence over the environment.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable holding the global cache capacity.
pub const CACHE_CAPACITY_ENV: &str = "SONGPAT_CACHE_CAPACITY";
/// Environment variable holding the path segment byte budget.
pub const PATH_SEGMENT_LIMIT_ENV: &str = "SONGPAT_PATH_SEGMENT_LIMIT";
/// Cache capacity used when nothing else is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
/// Path segment byte budget used when nothing else is configured.
pub const DEFAULT_PATH_SEGMENT_LIMIT: usize = 255;

const OVERRIDE_UNSET: usize = 0;

static CACHE_CAPACITY_OVERRIDE: AtomicUsize = AtomicUsize::new(OVERRIDE_UNSET);
static PATH_SEGMENT_LIMIT_OVERRIDE: AtomicUsize = AtomicUsize::new(OVERRIDE_UNSET);

fn parse_env_count(value: &str) -> Option<usize> {
    value.trim().parse().ok().filter(|count| *count > 0)
}

fn env_count(name: &str) -> Option<usize> {
    std::env::var(name).ok().as_deref().and_then(parse_env_count)
}

fn override_state(slot: &AtomicUsize) -> Option<usize> {
    match slot.load(Ordering::Relaxed) {
        OVERRIDE_UNSET => None,
        value => Some(value),
    }
}

/// Number of formatters the global cache holds before it is cleared.
#[must_use]
pub fn cache_capacity() -> usize {
    override_state(&CACHE_CAPACITY_OVERRIDE)
        .or_else(|| env_count(CACHE_CAPACITY_ENV))
        .unwrap_or(DEFAULT_CACHE_CAPACITY)
}

/// Override the cache capacity for the current process.
///
/// A capacity of zero is raised to one. The global cache reads the value
/// when it is first used.
pub fn set_cache_capacity(capacity: usize) {
    CACHE_CAPACITY_OVERRIDE.store(capacity.max(1), Ordering::Relaxed);
}

/// Remove any in-process override for the cache capacity.
pub fn clear_cache_capacity_override() {
    CACHE_CAPACITY_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

/// Byte budget of a single path segment in path-dialect output.
#[must_use]
pub fn path_segment_limit() -> usize {
    override_state(&PATH_SEGMENT_LIMIT_OVERRIDE)
        .or_else(|| env_count(PATH_SEGMENT_LIMIT_ENV))
        .unwrap_or(DEFAULT_PATH_SEGMENT_LIMIT)
}

/// Override the path segment byte budget for the current process.
///
/// Tests may call [`clear_path_segment_limit_override`] to restore
/// environment driven behaviour.
pub fn set_path_segment_limit(limit: usize) {
    PATH_SEGMENT_LIMIT_OVERRIDE.store(limit.max(1), Ordering::Relaxed);
}

/// Remove any in-process override for the path segment byte budget.
pub fn clear_path_segment_limit_override() {
    PATH_SEGMENT_LIMIT_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
