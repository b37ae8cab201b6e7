use crate::blob::BlobStore;
use crate::config::Config;
use crate::mailer::Mailer;
use crate::ratelimit::RateLimiter;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Mailer,
    pub blob: BlobStore,
    pub limiter: RateLimiter,
    /// Shared client for one-shot calls (captcha verification).
    pub http: reqwest::Client,
}
