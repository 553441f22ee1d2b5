use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// CORS origin allow-list. Entries starting with `.` are suffix matches,
    /// everything else must match exactly.
    pub allowed_origins: Vec<String>,
    /// Hard cap on search result counts, regardless of the client's `limit`.
    pub max_search_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 5000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            max_search_limit: 100,
        }
    }
}
