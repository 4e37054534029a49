//! Loading accounts and proxies from line-delimited files
//!
//! `account.txt` holds one `email:password` per line; anything that does not
//! split into exactly two fields is skipped. `ip.txt` holds one proxy URL
//! per line, kept in order (blank lines included) so indices stay aligned
//! with the account list. A missing file is a fatal startup error.

use std::path::Path;

use tracing::{debug, info};

use crate::account::{Account, ProxyAssignment};

/// Parse `email:password` lines, skipping malformed ones.
pub fn parse_accounts(contents: &str) -> Vec<Account> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(line_no, line)| {
            let fields: Vec<&str> = line.split(':').collect();
            match fields.as_slice() {
                [email, password] => Some(Account::new(*email, *password)),
                _ => {
                    debug!(line = line_no + 1, "skipping malformed account line");
                    None
                }
            }
        })
        .collect()
}

/// Parse one proxy address per line, preserving line positions.
pub fn parse_proxies(contents: &str) -> ProxyAssignment {
    ProxyAssignment::new(contents.lines().map(str::to_owned).collect())
}

/// Read and parse the account file.
pub async fn load_accounts(path: &Path) -> common::Result<Vec<Account>> {
    let contents = read(path).await?;
    let accounts = parse_accounts(&contents);
    info!(path = %path.display(), accounts = accounts.len(), "loaded accounts");
    Ok(accounts)
}

/// Read and parse the proxy file.
pub async fn load_proxies(path: &Path) -> common::Result<ProxyAssignment> {
    let contents = read(path).await?;
    let proxies = parse_proxies(&contents);
    info!(path = %path.display(), proxies = proxies.len(), "loaded proxies");
    Ok(proxies)
}

async fn read(path: &Path) -> common::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| common::Error::Read {
            path: path.to_path_buf(),
            source,
        })
}
