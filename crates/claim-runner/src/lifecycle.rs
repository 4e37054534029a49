//! Bearer token lifecycle
//!
//! A held token is reused while its `exp` claim lies in the future. An
//! empty, undecodable or expired token triggers exactly one sign-in. Token
//! decode failures are never reported as errors; they only mean "sign in again".

use chrono::{DateTime, Utc};
use securitylabs_api::{RewardApi, is_token_valid};
use tracing::debug;

use crate::account::Account;
use crate::error::{Error, Result};
use crate::round_log::RoundLog;

/// What the token check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// The held token is still valid; no remote call was made
    Valid,
    /// A new token was obtained by signing in
    Renewed,
}

/// Make sure `account` holds a usable bearer token.
///
/// On sign-in failure the account's token is left untouched and the error
/// is returned; the caller skips the rest of the round for this account.
pub async fn check_and_refresh<A: RewardApi + ?Sized>(
    account: &mut Account,
    api: &A,
    now: DateTime<Utc>,
    log: &mut RoundLog,
) -> Result<TokenStatus> {
    if let Some(token) = account.bearer_token() {
        match is_token_valid(token, now) {
            Ok(true) => {
                debug!(email = %account.email, "bearer token still valid");
                return Ok(TokenStatus::Valid);
            }
            Ok(false) => debug!(email = %account.email, "bearer token expired"),
            Err(e) => debug!(email = %account.email, error = %e, "bearer token unreadable"),
        }
    }

    log.push("requesting new access token");
    let token = api
        .sign_in(&account.email, account.password.expose())
        .await
        .map_err(Error::SignIn)?;
    account.set_bearer_token(token);
    debug!(email = %account.email, "signed in");
    Ok(TokenStatus::Renewed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeService, fixed_now, jwt_expiring_at};
    use chrono::TimeDelta;

    fn account_with_token(token: &str) -> Account {
        let mut account = Account::new("a@example.com", "pw");
        account.set_bearer_token(token.into());
        account
    }

    #[tokio::test]
    async fn valid_token_makes_no_network_call() {
        let service = FakeService::default();
        let now = fixed_now();
        let token = jwt_expiring_at(now + TimeDelta::hours(2));
        let mut account = account_with_token(&token);
        let mut log = RoundLog::new("a@example.com");

        let status = check_and_refresh(&mut account, &service.api(None), now, &mut log)
            .await
            .unwrap();

        assert_eq!(status, TokenStatus::Valid);
        assert!(service.calls().is_empty());
        assert!(log.is_empty());
        assert_eq!(account.bearer_token(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn empty_token_signs_in_once_with_credentials() {
        let service = FakeService::default();
        let mut account = Account::new("a@example.com", "pw");
        let mut log = RoundLog::new("a@example.com");

        let status = check_and_refresh(&mut account, &service.api(None), fixed_now(), &mut log)
            .await
            .unwrap();

        assert_eq!(status, TokenStatus::Renewed);
        assert_eq!(
            service.calls(),
            vec![Call::SignIn {
                email: "a@example.com".into(),
                password: "pw".into(),
                proxy: None,
            }]
        );
        assert_eq!(account.bearer_token(), Some("T1"));
        assert_eq!(log.lines(), ["[a@example.com] requesting new access token"]);
    }

    #[tokio::test]
    async fn expired_token_signs_in_once() {
        let service = FakeService::default();
        let now = fixed_now();
        let mut account = account_with_token(&jwt_expiring_at(now - TimeDelta::minutes(1)));
        let mut log = RoundLog::new("a@example.com");

        let status = check_and_refresh(&mut account, &service.api(None), now, &mut log)
            .await
            .unwrap();

        assert_eq!(status, TokenStatus::Renewed);
        assert_eq!(service.sign_in_count(), 1);
        assert_eq!(account.bearer_token(), Some("T1"));
    }

    #[tokio::test]
    async fn malformed_token_signs_in_once() {
        let service = FakeService::default();
        let mut account = account_with_token("not-a-jwt");
        let mut log = RoundLog::new("a@example.com");

        let status = check_and_refresh(&mut account, &service.api(None), fixed_now(), &mut log)
            .await
            .unwrap();

        assert_eq!(status, TokenStatus::Renewed);
        assert_eq!(service.sign_in_count(), 1);
    }

    #[tokio::test]
    async fn sign_in_failure_keeps_old_token_and_returns_error() {
        let service = FakeService {
            token: None,
            ..FakeService::default()
        };
        let mut account = account_with_token("stale");
        let mut log = RoundLog::new("a@example.com");

        let err = check_and_refresh(&mut account, &service.api(None), fixed_now(), &mut log)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SignIn(_)), "got {err:?}");
        assert_eq!(account.bearer_token(), Some("stale"));
        assert_eq!(service.sign_in_count(), 1);
    }

    #[tokio::test]
    async fn sign_in_goes_through_assigned_proxy() {
        let service = FakeService::default();
        let mut account = Account::new("a@example.com", "pw");
        let mut log = RoundLog::new("a@example.com");

        check_and_refresh(
            &mut account,
            &service.api(Some("http://10.0.0.1:8080")),
            fixed_now(),
            &mut log,
        )
        .await
        .unwrap();

        assert!(matches!(
            &service.calls()[0],
            Call::SignIn { proxy: Some(p), .. } if p == "http://10.0.0.1:8080"
        ));
    }
}
