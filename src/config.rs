//! Startup configuration loaded from the environment.

/// Port the server binds when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8000;

/// Model identifier used when `DEFAULT_MODEL` is not set.
///
/// Namespaced with the provider so the genai client routes it to the Groq
/// adapter without heuristics.
pub const DEFAULT_MODEL: &str = "groq::llama3-8b-8192";

/// Development front-end addresses allowed by CORS when `ALLOWED_ORIGINS`
/// is not set.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:8000"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is missing or blank, or if `PORT`
    /// is set to a non-numeric value. A missing credential is fatal; the
    /// server must not start without one.
    pub fn from_env() -> Result<Self, String> {
        Self::build(
            std::env::var("GROQ_API_KEY").ok(),
            std::env::var("PORT").ok(),
            std::env::var("DEFAULT_MODEL").ok(),
            std::env::var("ALLOWED_ORIGINS").ok(),
        )
    }

    /// Validate raw environment values into settings.
    ///
    /// Kept separate from [`Settings::from_env`] so validation is testable
    /// without mutating the process environment.
    pub fn build(
        api_key: Option<String>,
        port: Option<String>,
        model: Option<String>,
        allowed_origins: Option<String>,
    ) -> Result<Self, String> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| "GROQ_API_KEY not found in environment".to_string())?;

        let port = match port {
            Some(value) => value.parse::<u16>().map_err(|e| format!("Invalid PORT value '{value}': {e}"))?,
            None => DEFAULT_PORT,
        };

        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let allowed_origins = match allowed_origins {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(ToString::to_string).collect(),
        };

        Ok(Self {
            port,
            api_key,
            model,
            allowed_origins,
        })
    }
}
