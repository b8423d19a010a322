//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::PeerIpKeyExtractor,
};

/// Time to replenish one request slot.
const REPLENISH_PERIOD_MS: u64 = 500;

/// Requests a client may make back to back before being throttled.
const BURST_SIZE: u32 = 20;

/// Token bucket settings for the login pages.
///
/// # Limits
///
/// - **Rate**: 2 requests per second (one slot every 500ms)
/// - **Burst**: 20 requests
pub fn governor_config() -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>> {
    GovernorConfigBuilder::default()
        .per_millisecond(REPLENISH_PERIOD_MS)
        .burst_size(BURST_SIZE)
        .finish()
        .expect("rate limit quota is non-zero")
}

/// Creates a rate limiter for the login pages.
///
/// Requests exceeding [`governor_config`] receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/login", post(login_submit_handler))
///     .layer(rate_limit::layer());
/// ```
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    GovernorLayer::new(Arc::new(governor_config()))
}
