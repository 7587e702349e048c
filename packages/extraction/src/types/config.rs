//! Configuration types for uploading and polling.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the job status poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status checks.
    ///
    /// Default: 5 seconds.
    pub interval: Duration,

    /// Give up once this much time has passed since the first check.
    ///
    /// Default: 10 minutes.
    pub timeout: Duration,

    /// Give up after this many status checks.
    ///
    /// Default: 120.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
            max_attempts: 120,
        }
    }
}

impl PollConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between status checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of status checks (at least one).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Configuration for the object store gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Bucket receiving uploaded documents and job output
    pub bucket: String,

    /// Key prefix for uploaded documents.
    ///
    /// Default: `input_data`.
    pub input_prefix: String,

    /// Child segment under the input location where the job writes output.
    ///
    /// Default: `output`.
    pub output_suffix: String,
}

impl UploadConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            input_prefix: "input_data".to_string(),
            output_suffix: "output".to_string(),
        }
    }

    pub fn with_input_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.input_prefix = prefix.into();
        self
    }
}
