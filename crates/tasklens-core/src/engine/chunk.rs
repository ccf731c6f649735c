//! Cooperative chunked processing.
//!
//! Per-record work over a large vault (normalization, materialization)
//! runs in chunks with a yield point between them, so a search over tens
//! of thousands of records never monopolizes the runtime. Small inputs
//! skip the ceremony and run inline.

/// Inputs at or below this size are processed without yielding
pub const SYNC_THRESHOLD: usize = 64;

/// Chunk size for cheap per-record work (normalization)
pub const VALIDATION_CHUNK_SIZE: usize = 500;

/// Chunk size for expensive per-record work (materialization)
pub const EXTRACTION_CHUNK_SIZE: usize = 100;

/// Map every item through `f`, yielding to the runtime between chunks.
/// Output order matches input order.
pub async fn process_chunked<T, R, F>(items: Vec<T>, chunk_size: usize, mut f: F) -> Vec<R>
where
    F: FnMut(T) -> R,
{
    if items.len() <= SYNC_THRESHOLD {
        return items.into_iter().map(f).collect();
    }
    let chunk_size = chunk_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if index != 0 && index % chunk_size == 0 {
            tokio::task::yield_now().await;
        }
        results.push(f(item));
    }
    results
}
