//! One round over all accounts
//!
//! Every account gets its own future; all of them run concurrently on the
//! current task and the round ends when the last one finishes. Each future
//! owns exactly one `&mut Account` and one `RoundLog`, so accounts never see
//! each other's state. Results come back in account order, which is the
//! order their log lines are flushed in, regardless of completion order.

use chrono::Utc;
use futures_util::future::join_all;
use securitylabs_api::ApiConnector;
use tracing::{debug, info};

use crate::account::{Account, ProxyAssignment};
use crate::error::Error;
use crate::log_queue::LogQueue;
use crate::orchestrator::{AccountOutcome, process_account};
use crate::round_log::RoundLog;

const ROUND_SEPARATOR: &str = "----------------------------------";

/// Counts reported at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundSummary {
    pub round: u64,
    pub processed: usize,
    pub claimed: usize,
    pub failed: usize,
}

/// Owns the accounts and runs rounds over them.
pub struct RoundRunner<C: ApiConnector> {
    accounts: Vec<Account>,
    proxies: ProxyAssignment,
    connector: C,
    log: LogQueue,
}

impl<C: ApiConnector> RoundRunner<C> {
    pub fn new(accounts: Vec<Account>, proxies: ProxyAssignment, connector: C, log: LogQueue) -> Self {
        Self {
            accounts,
            proxies,
            connector,
            log,
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Process every account once and flush their logs in account order.
    pub async fn run_round(&mut self, round: u64) -> RoundSummary {
        self.log
            .push(format!(
                "round {round}: processing {} accounts",
                self.accounts.len()
            ))
            .await;

        let connector = &self.connector;
        let proxies = &self.proxies;
        let units = self
            .accounts
            .iter_mut()
            .enumerate()
            .map(move |(index, account)| {
                let proxy = proxies.for_account(index);
                async move {
                    let mut log = RoundLog::new(account.email.clone());
                    let outcome = match connector.connect(proxy) {
                        Ok(api) => process_account(account, &api, Utc::now(), &mut log).await,
                        Err(e) => {
                            let err = Error::Connect(e);
                            debug!(email = %account.email, error = %err, "cannot build client");
                            log.push(&err);
                            AccountOutcome::Failed
                        }
                    };
                    (log, outcome)
                }
            });
        let results = join_all(units).await;

        let mut summary = RoundSummary {
            round,
            processed: results.len(),
            ..RoundSummary::default()
        };
        for (log, outcome) in results {
            match &outcome {
                AccountOutcome::Failed => summary.failed += 1,
                o if o.is_claimed() => summary.claimed += 1,
                _ => {}
            }
            for line in log.into_lines() {
                self.log.push(line).await;
            }
        }

        self.log
            .push(format!(
                "round {round}: {} accounts processed ({} claimed, {} failed)",
                summary.processed, summary.claimed, summary.failed
            ))
            .await;
        self.log.push(ROUND_SEPARATOR).await;

        info!(
            round,
            processed = summary.processed,
            claimed = summary.claimed,
            failed = summary.failed,
            "round complete"
        );
        summary
    }
}
