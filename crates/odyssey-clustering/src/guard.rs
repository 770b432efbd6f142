// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Process-wide guard against concurrent clustering runs.

use crate::error::{ClusteringError, ClusteringResult};
use parking_lot::{Mutex, MutexGuard};

static PIPELINE_LOCK: Mutex<()> = Mutex::new(());

/// Held for the duration of a run; dropping it releases the pipeline
pub struct PipelineGuard {
    _lock: MutexGuard<'static, ()>,
}

impl PipelineGuard {
    /// Acquire the pipeline, or fail with [`ClusteringError::Busy`] if
    /// another run holds it
    pub fn acquire() -> ClusteringResult<Self> {
        PIPELINE_LOCK
            .try_lock()
            .map(|lock| Self { _lock: lock })
            .ok_or(ClusteringError::Busy)
    }

    pub fn is_running() -> bool {
        PIPELINE_LOCK.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_busy() {
        let first = PipelineGuard::acquire().unwrap();
        assert!(PipelineGuard::is_running());
        assert!(matches!(PipelineGuard::acquire(), Err(ClusteringError::Busy)));
        drop(first);
        assert!(PipelineGuard::acquire().is_ok());
    }
}
