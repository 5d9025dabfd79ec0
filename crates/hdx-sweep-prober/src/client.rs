//! The shared `reqwest::Client` used by both probers: a configured
//! User-Agent, redirect-following, and the connect/total timeouts of
//! spec.md §4.4/§5. One client (and its connection pool) is reused across
//! every probe in a sweep, the way the original's single `aiohttp.ClientSession`
//! is reused across `check_urls`.

use hdx_sweep_core::config::TimeoutConfig;

pub fn build_client(user_agent: &str, timeouts: &TimeoutConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::default())
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.total)
        .build()
}
