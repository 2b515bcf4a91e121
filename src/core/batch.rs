//! Batched writes.
//!
//! The store caps how many items one write request may carry. Operations are
//! split into chunks of at most that many items and applied one chunk at a
//! time, in order, stopping at the first failure. Chunks already applied stay
//! applied: every write is an idempotent upsert or delete keyed by namespace
//! and key, so re-running sync converges.

use tracing::trace;

use crate::error::{Result, SyncError};

/// Number of chunks needed for `len` items with at most `limit` per chunk.
pub fn chunk_count(len: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    (len + limit - 1) / limit
}

/// Apply `ops` in chunks of at most `limit`, sequentially.
///
/// Returns the number of chunks applied. An empty `ops` never calls `apply`.
///
/// # Errors
///
/// Returns `SyncError::InvalidBatchLimit` for a zero limit, otherwise the
/// first error returned by `apply`; later chunks are not attempted.
pub fn write_in_batches<T, F>(ops: &[T], limit: usize, mut apply: F) -> Result<usize>
where
    F: FnMut(&[T]) -> Result<()>,
{
    if limit == 0 {
        return Err(SyncError::InvalidBatchLimit.into());
    }

    let total = chunk_count(ops.len(), limit);
    for (index, chunk) in ops.chunks(limit).enumerate() {
        trace!(batch = index + 1, total, size = chunk.len(), "applying batch");
        apply(chunk)?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StoreError};

    #[test]
    fn test_thirty_items_limit_twenty_five() {
        let ops: Vec<u32> = (0..30).collect();
        let mut calls: Vec<Vec<u32>> = Vec::new();

        let batches = write_in_batches(&ops, 25, |chunk| {
            calls.push(chunk.to_vec());
            Ok(())
        })
        .unwrap();

        assert_eq!(batches, 2);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].len(), 25);
        assert_eq!(calls[1].len(), 5);
        assert_eq!(calls.concat(), ops);
    }

    #[test]
    fn test_empty_never_applies() {
        let ops: Vec<u32> = Vec::new();
        let mut called = false;

        let batches = write_in_batches(&ops, 25, |_| {
            called = true;
            Ok(())
        })
        .unwrap();

        assert_eq!(batches, 0);
        assert!(!called);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let ops: Vec<u32> = (0..10).collect();
        let mut applied = Vec::new();

        let result = write_in_batches(&ops, 3, |chunk| {
            if chunk[0] == 3 {
                return Err(StoreError::Write {
                    namespace: "app".to_string(),
                    message: "throttled".to_string(),
                }
                .into());
            }
            applied.extend_from_slice(chunk);
            Ok(())
        });

        assert!(matches!(result, Err(Error::Store(StoreError::Write { .. }))));
        assert_eq!(applied, vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = write_in_batches(&[1], 0, |_| Ok(()));

        assert!(matches!(
            result,
            Err(Error::Sync(SyncError::InvalidBatchLimit))
        ));
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, 25), 0);
        assert_eq!(chunk_count(25, 25), 1);
        assert_eq!(chunk_count(26, 25), 2);
        assert_eq!(chunk_count(30, 25), 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn chunks_reassemble_input(len in 0usize..200, limit in 1usize..40) {
                let ops: Vec<usize> = (0..len).collect();
                let mut chunks: Vec<Vec<usize>> = Vec::new();

                let batches = write_in_batches(&ops, limit, |chunk| {
                    chunks.push(chunk.to_vec());
                    Ok(())
                })
                .unwrap();

                prop_assert_eq!(batches, (len + limit - 1) / limit);
                prop_assert_eq!(chunks.len(), batches);
                prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= limit));
                prop_assert_eq!(chunks.concat(), ops);
            }
        }
    }
}
