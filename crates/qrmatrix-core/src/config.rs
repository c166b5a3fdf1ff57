//! Runner execution options
//!
//! Dimension sets for the test grid live in [`crate::corpus::CorpusSpec`];
//! this module only covers how a run executes. CLI parsing and file output
//! are external collaborators' concerns.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Execution options for a matrix run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Run triples on a bounded worker pool instead of sequentially.
    pub parallel: bool,
    /// Worker pool size when `parallel` is set.
    pub max_workers: usize,
    /// Maximum wall time per decode invocation. A decoder exceeding this is
    /// reported as a decode failure for that triple only.
    pub decode_timeout: Duration,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_workers: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            decode_timeout: Duration::from_secs(10),
        }
    }
}

impl MatrixConfig {
    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig(
                "max_workers must be greater than 0".into(),
            ));
        }
        if self.decode_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "decode_timeout must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
