//! Guard configuration.
//!
//! Plain data with defaults; there is no file or environment loading —
//! hosts construct this in code when wiring the guard.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policy::MAX_UPLOAD_BYTES;

/// Default banner auto-dismiss delay (5 seconds).
pub const DEFAULT_DISMISS_DELAY_MS: u64 = 5000;

/// Configuration for [`InputGuard`](crate::guard::InputGuard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Banner auto-dismiss delay in milliseconds.
    pub dismiss_delay_ms: u64,

    /// Upload size ceiling in bytes, applied to every managed control.
    pub max_upload_bytes: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            dismiss_delay_ms: DEFAULT_DISMISS_DELAY_MS,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl GuardConfig {
    /// Set the auto-dismiss delay.
    pub fn dismiss_delay(mut self, delay: Duration) -> Self {
        self.dismiss_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the upload size ceiling.
    pub fn max_upload_bytes(mut self, max: u64) -> Self {
        self.max_upload_bytes = max;
        self
    }

    /// The auto-dismiss delay as a [`Duration`].
    pub fn dismiss_delay_duration(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }
}
