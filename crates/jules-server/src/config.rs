use jules_core::RepoRef;

#[derive(Debug, Clone)]
/// Connection settings for the external classification service.
pub struct ClassifierSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
/// Immutable process configuration, constructed once at startup.
///
/// Components never read the environment themselves; the CLI folds every
/// environment-supplied value into this struct and passes it down. Optional
/// fields stay optional so missing configuration surfaces as a structured
/// "not configured" API error instead of a crash.
pub struct JulesConfig {
    pub repositories: Vec<RepoRef>,
    pub webhook_secret: Option<String>,
    pub bot_login: Option<String>,
    pub github_token: Option<String>,
    pub github_api_base: String,
    pub classifier: Option<ClassifierSettings>,
    pub bind: String,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
    pub poll_interval_seconds: u64,
}

impl JulesConfig {
    pub fn has_github_credentials(&self) -> bool {
        self.github_token
            .as_deref()
            .map(str::trim)
            .is_some_and(|token| !token.is_empty())
    }

    /// True when the read path (token + repo list) can serve the board.
    pub fn is_configured(&self) -> bool {
        self.has_github_credentials() && !self.repositories.is_empty()
    }
}
