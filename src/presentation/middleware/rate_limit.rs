use axum::{body::Body, extract::ConnectInfo};
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, errors::GovernorError, governor::GovernorConfigBuilder,
    key_extractor::KeyExtractor,
};

/// Keys requests by peer address, falling back to loopback when the server
/// was not started with connect info (router tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmartIpKeyExtractor;

impl KeyExtractor for SmartIpKeyExtractor {
    type Key = IpAddr;

    fn extract<B>(&self, req: &axum::http::Request<B>) -> Result<Self::Key, GovernorError> {
        Ok(req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}

pub type RateLimitLayer = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, Body>;

/// Per-IP limit of `requests_per_minute`, with the whole minute available as
/// burst.
pub fn rate_limit_layer(requests_per_minute: u64) -> anyhow::Result<RateLimitLayer> {
    if requests_per_minute == 0 {
        anyhow::bail!("rate limit must be greater than zero");
    }
    let quota_duration_ms = (60_000 / requests_per_minute).max(1);
    let burst_size = u32::try_from(requests_per_minute).unwrap_or(u32::MAX);

    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(quota_duration_ms)
            .burst_size(burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Failed to finish governor config"))?,
    );

    Ok(GovernorLayer::new(config))
}
