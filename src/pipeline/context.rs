//! Request context.
//!
//! Each inbound message gets its own context; nothing is carried over
//! between requests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;
use crate::platform::detect::Platform;

/// Context for a single inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub received_at: DateTime<Utc>,
    pub platform: Option<Platform>,
    pub tab_id: Option<i64>,
}

impl RequestContext {
    pub fn new() -> Self {
        let request_id = format!("req-{}", &Uuid::new_v4().to_string()[..8]);

        Self {
            request_id,
            received_at: Utc::now(),
            platform: None,
            tab_id: None,
        }
    }

    /// Context for a request about the page open in `tab_id`.
    pub fn for_tab(platform: Option<Platform>, tab_id: i64) -> Self {
        Self {
            platform,
            tab_id: Some(tab_id),
            ..Self::new()
        }
    }

    pub fn log_context(&self) -> LogContext {
        let mut ctx = LogContext::new(&self.request_id);
        if let Some(platform) = self.platform {
            ctx = ctx.with_platform(platform.as_str());
        }
        if let Some(tab_id) = self.tab_id {
            ctx = ctx.with_tab(tab_id);
        }
        ctx
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
