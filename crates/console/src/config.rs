/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the API server, without a trailing slash.
    pub api_route: String,
}

impl ConsoleConfig {
    pub fn new(api_route: impl Into<String>) -> Self {
        let api_route: String = api_route.into();
        Self {
            api_route: api_route.trim_end_matches('/').to_string(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// | Env Var     | Default                 |
    /// |-------------|-------------------------|
    /// | `API_ROUTE` | `http://localhost:3000` |
    pub fn from_env() -> Self {
        Self::new(std::env::var("API_ROUTE").unwrap_or_else(|_| "http://localhost:3000".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        assert_eq!(
            ConsoleConfig::new("http://aset.local/").api_route,
            "http://aset.local"
        );
    }
}
