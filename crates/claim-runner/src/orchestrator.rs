//! One account's pipeline for one round

use chrono::{DateTime, Utc};
use securitylabs_api::RewardApi;
use tracing::debug;

use crate::account::Account;
use crate::lifecycle::check_and_refresh;
use crate::round_log::RoundLog;
use crate::scheduler::{ClaimOutcome, evaluate_and_claim};

/// How an account's round ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountOutcome {
    Completed(ClaimOutcome),
    /// The failure has already been written to the account's round log
    Failed,
}

impl AccountOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Completed(ClaimOutcome::Claimed { .. }))
    }
}

/// Refresh the token if needed, then evaluate and possibly claim.
///
/// Never returns an error: any failure ends this account's round, is logged
/// under the account's email, and is retried naturally next round.
pub async fn process_account<A: RewardApi + ?Sized>(
    account: &mut Account,
    api: &A,
    now: DateTime<Utc>,
    log: &mut RoundLog,
) -> AccountOutcome {
    let result = async {
        check_and_refresh(account, api, now, log).await?;
        evaluate_and_claim(account, api, now, log).await
    }
    .await;

    match result {
        Ok(outcome) => AccountOutcome::Completed(outcome),
        Err(e) => {
            debug!(email = %account.email, error = %e, "account failed this round");
            log.push(&e);
            AccountOutcome::Failed
        }
    }
}
