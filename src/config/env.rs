//! Deployment environment resolution.
//!
//! Derives the surrounding service's endpoints from the origin the gateway
//! is reached on. The gateway core never consumes this; it is the
//! configuration surface of the deployment around it.

use url::Url;

/// Version marker advertised by the surrounding service.
pub const SERVICE_VERSION: &str = "version001";

/// Development host substituted for `localhost` origins.
const DEV_HOST: &str = "10.75.17.41";

const PORTAL_PORT: u16 = 8010;

/// Endpoints resolved from an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEnv {
    /// Backend gateway prefix.
    pub base_url: String,

    /// Portal address.
    pub portal_url: String,
}

/// Resolve the environment for the given origin.
pub fn resolve_env(origin: &Url) -> ServiceEnv {
    let scheme = origin.scheme();
    let hostname = match origin.host_str() {
        Some("localhost") | None => DEV_HOST,
        Some(host) => host,
    };

    ServiceEnv {
        base_url: "/".to_string(),
        portal_url: format!("{scheme}://{hostname}:{PORTAL_PORT}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_maps_to_development_host() {
        let origin = Url::parse("http://localhost:8080").unwrap();
        let env = resolve_env(&origin);

        assert_eq!(env.base_url, "/");
        assert_eq!(env.portal_url, "http://10.75.17.41:8010");
    }

    #[test]
    fn test_other_hosts_pass_through() {
        let origin = Url::parse("https://portal.example.com").unwrap();
        let env = resolve_env(&origin);

        assert_eq!(env.portal_url, "https://portal.example.com:8010");
    }
}
