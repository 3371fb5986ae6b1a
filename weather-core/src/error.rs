use reqwest::StatusCode;

/// Errors surfaced by data sources, repositories and use cases.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid response")]
    InvalidResponse,

    #[error("Unknown weather code: {0}")]
    UnknownWeatherCode(i32),

    #[error("Invalid date '{value}': {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

impl WeatherError {
    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        WeatherError::Status {
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
