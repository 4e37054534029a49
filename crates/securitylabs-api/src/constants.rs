//! Remote service constants
//!
//! The header values reproduce the client identity the service has always
//! been called with. Timeouts and pool limits are fixed, not configurable.

use std::time::Duration;

/// Host header value sent with every request
pub const API_HOST: &str = "node.securitylabs.xyz";

/// Default base URL for all endpoints
pub const BASE_URL: &str = "https://node.securitylabs.xyz";

/// User-Agent header value
pub const USER_AGENT: &str = "PostmanRuntime/7.29.0";

/// Credential sign-in endpoint (POST, JSON body)
pub const SIGN_IN_PATH: &str = "/api/v1/auth/signin-user";

/// Current user endpoint (GET, bearer auth)
pub const USER_INFO_PATH: &str = "/api/v1/users";

/// Reward claim endpoint prefix; the remote user id is appended (GET, bearer auth)
pub const EARN_PATH_PREFIX: &str = "/api/v1/users/earn/";

/// Per-request timeout, applied to every attempt
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra attempts after a transport-level failure (4 attempts total)
pub const RETRY_COUNT: u32 = 3;

/// Pause between attempts
pub const RETRY_WAIT: Duration = Duration::from_millis(100);

/// Idle keep-alive connections retained per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// How long an idle connection is kept before it is closed
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Path for claiming the reward of the given remote user.
pub fn earn_path(user_id: &str) -> String {
    format!("{EARN_PATH_PREFIX}{user_id}")
}
