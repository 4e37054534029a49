//! Client for the securitylabs node reward API
//!
//! Provides the fixed request profile, the three remote operations the
//! claimer needs, and local (unverified) bearer token expiry checks. This
//! crate knows nothing about accounts or rounds; it can be tested and used
//! on its own.
//!
//! Call flow for one account:
//! 1. `HeaderProfile::for_base_url()` once at startup (fatal on failure)
//! 2. `HttpConnector::connect()` builds an `ApiClient` bound to the account's proxy
//! 3. `token::is_token_valid()` decides whether `RewardApi::sign_in()` is needed
//! 4. `RewardApi::fetch_user_info()` reports the last claim time
//! 5. `RewardApi::claim_reward()` once the cooldown has passed

pub mod api;
pub mod client;
pub mod constants;
pub mod error;
pub mod headers;
pub mod token;

pub use api::{ApiConnector, ApiFuture, RewardApi, UserInfo};
pub use client::{ApiClient, HttpConnector};
pub use constants::*;
pub use error::{Error, Result};
pub use headers::HeaderProfile;
pub use token::{decode_expiry, is_token_valid};
