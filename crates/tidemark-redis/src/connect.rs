//! Opening a connection to the target store.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{RedisError, RedisResult};
use crate::store::RedisStore;

/// How the password is presented to the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Standard `AUTH`.
    #[default]
    Auth,
    /// `ADMINAUTH`, used by some managed proxies.
    AdminAuth,
}

/// Connection parameters for the target store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetParams {
    /// `host:port` pairs. Only the first is used for a standalone target.
    pub addresses: Vec<String>,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub cluster: bool,
}

impl TargetParams {
    pub fn standalone(address: impl Into<String>) -> Self {
        Self {
            addresses: vec![address.into()],
            ..Default::default()
        }
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Build the connection URL for a standalone target.
///
/// The password is only embedded for [`AuthType::Auth`]; `ADMINAUTH` is sent
/// separately once connected.
pub fn target_url(params: &TargetParams) -> RedisResult<Url> {
    if params.cluster {
        return Err(RedisError::Unsupported(
            "cluster targets only serve database 0, so checkpoints in other databases cannot be reconciled"
                .into(),
        ));
    }

    let address = params
        .addresses
        .first()
        .ok_or_else(|| RedisError::Connection("no target address configured".into()))?;

    if address.contains("://") || address.contains('@') {
        return Err(RedisError::InvalidAddress {
            address: address.clone(),
            message: "expected host:port".into(),
        });
    }

    let scheme = if params.tls { "rediss" } else { "redis" };
    let userinfo = match (params.auth_type, params.password()) {
        (AuthType::Auth, Some(password)) => {
            format!(":{}@", utf8_percent_encode(password, NON_ALPHANUMERIC))
        }
        _ => String::new(),
    };

    let url = Url::parse(&format!("{}://{}{}", scheme, userinfo, address)).map_err(|e| {
        RedisError::InvalidAddress {
            address: address.clone(),
            message: e.to_string(),
        }
    })?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(RedisError::InvalidAddress {
            address: address.clone(),
            message: "missing host".into(),
        });
    }

    Ok(url)
}

/// Open a dedicated connection to the target.
pub async fn connect(params: &TargetParams) -> RedisResult<RedisStore> {
    let url = target_url(params)?;

    if params.tls && !cfg!(feature = "rustls-tls") {
        return Err(RedisError::Unsupported(
            "TLS targets require the rustls-tls feature".into(),
        ));
    }

    info!(
        host = url.host_str().unwrap_or_default(),
        port = ?url.port(),
        tls = params.tls,
        "Connecting to target"
    );

    let client = redis::Client::open(url.as_str())?;
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| RedisError::Connection(e.to_string()))?;

    if let (AuthType::AdminAuth, Some(password)) = (params.auth_type, params.password()) {
        debug!("Authenticating with ADMINAUTH");
        let _: () = redis::cmd("ADMINAUTH")
            .arg(password)
            .query_async(&mut conn)
            .await?;
    }

    Ok(RedisStore::new(conn))
}
