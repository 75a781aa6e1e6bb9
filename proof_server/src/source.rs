//! Keeps the accumulator replica in sync with the leaves file.

use std::{path::Path, str::FromStr, time::Duration};

use alloy_primitives::B256;
use tracing::{debug, error, info};

use crate::{errors::LeafSourceError, server::SharedMmr};

/// Parses one `0x`-prefixed 32-byte hex leaf per line. Blank lines are skipped.
pub(crate) fn parse_leaves(contents: &str) -> Result<Vec<[u8; 32]>, LeafSourceError> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, raw)| {
            B256::from_str(raw)
                .map(|leaf| leaf.0)
                .map_err(|e| LeafSourceError::MalformedLeaf {
                    line,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Appends the leaves of `path` the replica does not hold yet and returns how many were added.
///
/// New leaves are appended to a copy built under a read lock, so proof requests keep being
/// served meanwhile. The write lock is only taken to swap the copy in, and a failed refresh
/// leaves the replica unchanged.
pub(crate) async fn refresh(path: &Path, mmr: &SharedMmr) -> Result<u64, LeafSourceError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let leaves = parse_leaves(&contents)?;
    let found = leaves.len() as u64;

    let (known, next) = {
        let current = mmr.read().await;
        let known = current.leaf_count();

        if found < known {
            return Err(LeafSourceError::Truncated { found, known });
        }
        if found == known {
            return Ok(0);
        }

        if known > 0 {
            let last_known = current
                .leaf(known - 1)
                .map_err(|e| LeafSourceError::Accumulator(e.to_string()))?;
            if last_known != leaves[known as usize - 1] {
                return Err(LeafSourceError::Diverged {
                    leaf_index: known - 1,
                });
            }
        }

        let mut next = current.clone();
        next.append_batch(leaves[known as usize..].iter().copied())
            .map_err(|e| LeafSourceError::Accumulator(e.to_string()))?;
        (known, next)
    };

    let mut current = mmr.write().await;
    if current.leaf_count() != known {
        return Err(LeafSourceError::ConcurrentRefresh);
    }
    *current = next;

    Ok(found - known)
}

/// Refreshes the replica every `interval` until the task is dropped.
pub(crate) async fn run(path: impl AsRef<Path>, mmr: SharedMmr, interval: Duration) {
    let path = path.as_ref();
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        match refresh(path, &mmr).await {
            Ok(0) => debug!("no new leaves"),
            Ok(appended) => {
                let leaf_count = mmr.read().await.leaf_count();
                info!(%appended, %leaf_count, "appended leaves to the accumulator");
            }
            Err(e) => error!(%e, path = %path.display(), "failed to refresh the accumulator"),
        }
    }
}
