//! In-memory fakes of the remote API for pipeline tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use securitylabs_api::{ApiConnector, ApiFuture, RewardApi, UserInfo};

/// A remote call observed by the fake, with the proxy it went through.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignIn {
        email: String,
        password: String,
        proxy: Option<String>,
    },
    FetchUserInfo {
        token: String,
        proxy: Option<String>,
    },
    ClaimReward {
        user_id: String,
        token: String,
        proxy: Option<String>,
    },
}

/// Scripted fake service shared by every `FakeApi` a connector hands out.
#[derive(Debug, Clone)]
pub struct FakeService {
    /// Every call made through any `FakeApi` of this service, in order
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// Token returned by sign-in; `None` rejects every sign-in with 401
    pub token: Option<String>,
    /// Emails whose sign-in is rejected regardless of `token`
    pub rejected_emails: Vec<String>,
    /// User info returned for any token; `None` fails with a transport error
    pub user: Option<UserInfo>,
    pub claim_succeeds: bool,
    /// Artificial latency of sign-in per email
    pub delays: HashMap<String, Duration>,
    /// Proxy addresses the connector refuses to build a client for
    pub bad_proxies: Vec<String>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            token: Some("T1".into()),
            rejected_emails: Vec::new(),
            user: Some(user_info("")),
            claim_succeeds: true,
            delays: HashMap::new(),
            bad_proxies: Vec::new(),
        }
    }
}

impl FakeService {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sign_in_count(&self) -> usize {
        self.count(|c| matches!(c, Call::SignIn { .. }))
    }

    pub fn claim_count(&self) -> usize {
        self.count(|c| matches!(c, Call::ClaimReward { .. }))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// A client bound to `proxy`, as a connector would produce.
    pub fn api(&self, proxy: Option<&str>) -> FakeApi {
        FakeApi {
            service: self.clone(),
            proxy: proxy.map(str::to_owned),
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Fake `RewardApi` bound to one proxy.
#[derive(Debug, Clone)]
pub struct FakeApi {
    service: FakeService,
    proxy: Option<String>,
}

impl RewardApi for FakeApi {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> ApiFuture<'a, String> {
        Box::pin(async move {
            if let Some(delay) = self.service.delays.get(email) {
                tokio::time::sleep(*delay).await;
            }
            self.service.record(Call::SignIn {
                email: email.into(),
                password: password.into(),
                proxy: self.proxy.clone(),
            });
            match &self.service.token {
                Some(token) if !self.service.rejected_emails.iter().any(|e| e == email) => {
                    Ok(token.clone())
                }
                _ => Err(securitylabs_api::Error::Remote {
                    status: 401,
                    body: r#"{"message":"invalid credentials"}"#.into(),
                }),
            }
        })
    }

    fn fetch_user_info<'a>(&'a self, token: &'a str) -> ApiFuture<'a, UserInfo> {
        Box::pin(async move {
            self.service.record(Call::FetchUserInfo {
                token: token.into(),
                proxy: self.proxy.clone(),
            });
            self.service
                .user
                .clone()
                .ok_or_else(|| securitylabs_api::Error::Transport("connection reset".into()))
        })
    }

    fn claim_reward<'a>(&'a self, user_id: &'a str, token: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.service.record(Call::ClaimReward {
                user_id: user_id.into(),
                token: token.into(),
                proxy: self.proxy.clone(),
            });
            if self.service.claim_succeeds {
                Ok(())
            } else {
                Err(securitylabs_api::Error::Remote {
                    status: 400,
                    body: r#"{"message":"already claimed"}"#.into(),
                })
            }
        })
    }
}

impl ApiConnector for FakeService {
    type Api = FakeApi;

    fn connect(&self, proxy: Option<&str>) -> securitylabs_api::Result<FakeApi> {
        if let Some(proxy) = proxy.filter(|p| self.bad_proxies.iter().any(|b| b == p)) {
            return Err(securitylabs_api::Error::Transport(format!(
                "invalid proxy {proxy}"
            )));
        }
        Ok(self.api(proxy))
    }
}

/// User info for `u-1` with the given last claim time and a balance of 42.
pub fn user_info(last_claim_time: &str) -> UserInfo {
    UserInfo {
        id: "u-1".into(),
        last_claim_time: last_claim_time.into(),
        balance: 42.0,
    }
}

/// Unsigned JWT carrying only an `exp` claim.
pub fn jwt_expiring_at(exp: DateTime<Utc>) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp.timestamp()));
    format!("{header}.{claims}.c2ln")
}

/// Fixed reference instant for deterministic tests.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn overridden_fake_shares_one_call_log() {
        let service = FakeService {
            rejected_emails: vec!["b@x".into()],
            ..FakeService::default()
        };
        let api = service.connect(Some("http://p0:8080")).unwrap();

        assert_eq!(api.sign_in("a@x", "pw").await.unwrap(), "T1");
        assert!(api.sign_in("b@x", "pw").await.is_err());

        assert_eq!(service.sign_in_count(), 2);
        assert_eq!(service.calls.lock().unwrap().len(), 2);
        assert!(matches!(
            &service.calls()[0],
            Call::SignIn { proxy: Some(p), .. } if p == "http://p0:8080"
        ));
    }
}
