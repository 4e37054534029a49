//! Claim eligibility and the claim itself
//!
//! The service reports when the reward was last claimed; a new claim is
//! allowed once 24 hours have passed since then. That remote timestamp is
//! the only input to the decision. The account's `next_claim_time` is
//! written after a successful claim for reference and never read back here.

use chrono::{DateTime, TimeDelta, Utc};
use securitylabs_api::RewardApi;
use tracing::debug;

use crate::account::Account;
use crate::error::{Error, Result};
use crate::round_log::RoundLog;

/// Fixed cooldown between two claims.
pub const CLAIM_COOLDOWN_HOURS: i64 = 24;

fn claim_cooldown() -> TimeDelta {
    TimeDelta::hours(CLAIM_COOLDOWN_HOURS)
}

/// Whether a claim may be made now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eligibility {
    /// The cooldown is still running
    Wait {
        next_eligible: DateTime<Utc>,
        remaining: TimeDelta,
    },
    /// The cooldown is over (or ends exactly now)
    Eligible,
}

/// Compare `now` against `last_claim` plus the cooldown.
pub fn eligibility(last_claim: DateTime<Utc>, now: DateTime<Utc>) -> Eligibility {
    let next_eligible = last_claim + claim_cooldown();
    if now < next_eligible {
        Eligibility::Wait {
            next_eligible,
            remaining: next_eligible - now,
        }
    } else {
        Eligibility::Eligible
    }
}

/// Parse the service's RFC 3339 timestamp (fractional seconds allowed).
pub fn parse_claim_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::TimeParse {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Result of one claim evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// The service has no claim history for this user yet
    NoHistory,
    /// Cooldown still running; nothing was claimed
    TooEarly { remaining: TimeDelta, balance: f64 },
    /// The reward was claimed
    Claimed { next_claim_time: DateTime<Utc> },
}

/// Fetch the user's claim state and claim the reward when allowed.
///
/// Expects `account` to hold a bearer token (see `check_and_refresh`).
pub async fn evaluate_and_claim<A: RewardApi + ?Sized>(
    account: &mut Account,
    api: &A,
    now: DateTime<Utc>,
    log: &mut RoundLog,
) -> Result<ClaimOutcome> {
    let token = account.bearer_token().unwrap_or_default().to_owned();
    let info = api.fetch_user_info(&token).await.map_err(Error::UserInfo)?;

    if info.last_claim_time.is_empty() {
        debug!(email = %account.email, "no claim history yet");
        return Ok(ClaimOutcome::NoHistory);
    }

    let last_claim = parse_claim_time(&info.last_claim_time)?;

    match eligibility(last_claim, now) {
        Eligibility::Wait { remaining, .. } => {
            let minutes = remaining.num_milliseconds() as f64 / 60_000.0;
            log.push(format_args!(
                "{minutes:.1} minutes until the next reward can be claimed (balance {})",
                info.balance
            ));
            if account.remote_user_id.is_none() {
                account.remote_user_id = Some(info.id);
            }
            Ok(ClaimOutcome::TooEarly {
                remaining,
                balance: info.balance,
            })
        }
        Eligibility::Eligible => {
            api.claim_reward(&info.id, &token)
                .await
                .map_err(Error::Claim)?;
            let next_claim_time = now + claim_cooldown();
            account.next_claim_time = Some(next_claim_time);
            log.push("reward claimed");
            Ok(ClaimOutcome::Claimed { next_claim_time })
        }
    }
}
