// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Re-running operations that lost an optimistic version check.

use roster::CoreError;
use tracing::warn;

/// How many times an operation is re-run after a version conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Re-runs after the first attempt. Zero disables retrying.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

impl RetryPolicy {
    /// Creates a policy allowing `max_retries` re-runs.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Runs `attempt` until it succeeds, fails with a non-retryable error, or
    /// the retries are used up.
    ///
    /// Each run must re-read everything it writes. The engine operations do.
    ///
    /// # Errors
    ///
    /// Returns the last error produced by `attempt`.
    pub fn run<T, F>(&self, operation: &str, mut attempt: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Result<T, CoreError>,
    {
        let mut retries: u32 = 0;
        loop {
            match attempt() {
                Err(err) if err.is_retryable() && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        operation,
                        retry = retries,
                        max_retries = self.max_retries,
                        error = %err,
                        "Version conflict, retrying"
                    );
                }
                result => return result,
            }
        }
    }
}
