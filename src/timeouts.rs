//! Timeout configuration for back-office API calls.

use std::time::Duration;

/// Nominal access-token lifetime configured server-side.
///
/// Documentation constant only: actual invalidation is server-enforced via
/// 401 responses, never by a client-side expiry timer.
pub const NOMINAL_ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Nominal refresh-token lifetime configured server-side. See
/// [`NOMINAL_ACCESS_TOKEN_LIFETIME`] for why this is informational only.
pub const NOMINAL_REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Timeout configuration for client operations.
///
/// # Examples
///
/// ```rust
/// use backoffice_link::BackofficeTimeouts;
/// use std::time::Duration;
///
/// // Use defaults (recommended for most cases)
/// let timeouts = BackofficeTimeouts::default();
///
/// // Custom timeouts for high-latency environments
/// let timeouts = BackofficeTimeouts::builder()
///     .request_timeout(Duration::from_secs(30))
///     .build();
///
/// // Aggressive timeouts for local development
/// let timeouts = BackofficeTimeouts::fast();
/// ```
#[derive(Debug, Clone)]
pub struct BackofficeTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 5 seconds
    pub connection_timeout: Duration,

    /// Timeout for a complete business-data request.
    /// A timed-out call fails like any other network error and never
    /// triggers a token refresh.
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Timeout for multipart uploads to the image library.
    /// Default: 60 seconds
    pub upload_timeout: Duration,
}

impl Default for BackofficeTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            upload_timeout: Duration::from_secs(60),
        }
    }
}

impl BackofficeTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> BackofficeTimeoutsBuilder {
        BackofficeTimeoutsBuilder::new()
    }

    /// Timeouts optimized for local development against localhost.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(3),
            upload_timeout: Duration::from_secs(10),
        }
    }

    /// Timeouts optimized for high-latency or unreliable networks.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(180),
        }
    }
}

/// Builder for [`BackofficeTimeouts`].
#[derive(Debug)]
pub struct BackofficeTimeoutsBuilder {
    timeouts: BackofficeTimeouts,
}

impl BackofficeTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: BackofficeTimeouts::default(),
        }
    }

    /// Set the connection timeout.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the business-data request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the multipart upload timeout.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.upload_timeout = timeout;
        self
    }

    /// Build the timeout configuration.
    pub fn build(self) -> BackofficeTimeouts {
        self.timeouts
    }
}
