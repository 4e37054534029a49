//! Per-account reward claiming, run for all accounts in parallel rounds
//!
//! Each round processes every account concurrently and independently:
//! 1. `lifecycle::check_and_refresh()` keeps the bearer token usable, signing in when needed
//! 2. `scheduler::evaluate_and_claim()` claims the reward once the 24h cooldown has passed
//! 3. `orchestrator::process_account()` chains both and turns failures into log lines
//! 4. `round::RoundRunner` joins all accounts and flushes their logs in account order
//!
//! All output goes through the single-consumer `log_queue::LogQueue`.

pub mod account;
pub mod error;
pub mod lifecycle;
pub mod log_queue;
pub mod orchestrator;
pub mod round;
pub mod round_log;
pub mod roster;
pub mod scheduler;

#[cfg(test)]
mod testing;

pub use account::{Account, ProxyAssignment};
pub use error::{Error, Result};
pub use lifecycle::{TokenStatus, check_and_refresh};
pub use log_queue::{LOG_QUEUE_CAPACITY, LogQueue, LogSink, TracingSink};
pub use orchestrator::{AccountOutcome, process_account};
pub use round::{RoundRunner, RoundSummary};
pub use round_log::RoundLog;
pub use roster::{load_accounts, load_proxies, parse_accounts, parse_proxies};
pub use scheduler::{CLAIM_COOLDOWN_HOURS, ClaimOutcome, Eligibility, eligibility, evaluate_and_claim};
