/**
 * Server Configuration
 *
 * All runtime configuration comes from the environment (optionally via
 * a `.env` file loaded in `main`). Missing values fall back to local
 * development defaults rather than failing startup.
 */

use crate::tenancy::paths::AddressingMode;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Public base URL of the application itself
    pub app_url: String,
    /// Root domain for subdomain addressing; empty disables it
    pub root_domain: String,
    pub addressing_mode: AddressingMode,
    pub database_url: Option<String>,
    pub jwt_secret: String,
}

/// The hostname portion of a URL, lowercased, with scheme and port
/// stripped
pub fn hostname_from_url(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default();
    host.to_lowercase()
}

fn is_loopback_host(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host.ends_with(".localhost")
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);

        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

        // The root domain defaults to the app URL's host when that host
        // is a real domain; loopback hosts cannot serve subdomains.
        let root_domain = std::env::var("ROOT_DOMAIN").unwrap_or_else(|_| {
            let host = hostname_from_url(&app_url);
            if is_loopback_host(&host) {
                String::new()
            } else {
                host
            }
        });

        let addressing_mode = match std::env::var("ADDRESSING_MODE").as_deref() {
            Ok("subdomain") => AddressingMode::Subdomain,
            Ok("path-prefix") => AddressingMode::PathPrefix,
            _ if !root_domain.is_empty() => AddressingMode::Subdomain,
            _ => AddressingMode::PathPrefix,
        };

        let database_url = std::env::var("DATABASE_URL").ok();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            "development-secret-change-me".to_string()
        });

        Self {
            port,
            app_url,
            root_domain,
            addressing_mode,
            database_url,
            jwt_secret,
        }
    }

    /// The application's own hostname, used to reserve its subdomain
    /// label
    pub fn app_hostname(&self) -> String {
        hostname_from_url(&self.app_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_from_url() {
        assert_eq!(hostname_from_url("https://App.Example.com:8443/x"), "app.example.com");
        assert_eq!(hostname_from_url("http://localhost:3000"), "localhost");
        assert_eq!(hostname_from_url("example.com"), "example.com");
    }
}
