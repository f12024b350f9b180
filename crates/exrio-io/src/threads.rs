//! Process-wide codec thread count.
//!
//! The codec decompresses and compresses blocks on worker threads. How many
//! is decided once per process: either explicitly via
//! [`set_global_thread_count`] before the first transfer, or lazily from the
//! host's available parallelism on first use. The value never changes
//! afterwards.
//!
//! The slot is a [`OnceLock`], so concurrent first uses race safely and all
//! observe the same value. Every parallel transfer runs on a pool built by
//! [`codec_pool`] with exactly that many workers.

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

static THREAD_COUNT: OnceLock<usize> = OnceLock::new();

/// Returns the codec thread count, initializing it on first call.
pub fn global_thread_count() -> usize {
    *THREAD_COUNT.get_or_init(|| {
        let count = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        tracing::debug!(threads = count, "initialized codec thread count");
        count
    })
}

/// Sets the codec thread count if it has not been set yet.
///
/// A count of zero is treated as one. Returns `true` if this call decided
/// the value, `false` if it was already fixed (by an earlier call or by a
/// transfer that already ran).
pub fn set_global_thread_count(count: usize) -> bool {
    let count = count.max(1);
    let stored = THREAD_COUNT.set(count).is_ok();
    if stored {
        tracing::debug!(threads = count, "codec thread count configured");
    } else {
        tracing::debug!(
            requested = count,
            current = global_thread_count(),
            "codec thread count already fixed"
        );
    }
    stored
}

/// True when transfers should use the codec's parallel block path.
pub(crate) fn use_parallel() -> bool {
    global_thread_count() > 1
}

/// Builds the worker pool for one parallel transfer, sized to
/// [`global_thread_count`].
pub fn codec_pool() -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(global_thread_count())
        .thread_name(|index| format!("exrio-codec-{index}"))
        .build()
}
