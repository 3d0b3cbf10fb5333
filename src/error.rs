use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaseLawError {
    /// A page or decision could not be fetched (network failure or non-success status)
    #[error("Request to {url} failed{}: {message}", page_suffix(.page))]
    Transport {
        url: String,
        /// Zero-based result page offset, `None` for decision fetches
        page: Option<u32>,
        status: Option<u16>,
        message: String,
    },

    /// The decision page matches neither known page layout
    #[error("Unrecognised decision page layout for {source_uri} ({html_len} bytes)")]
    UnknownTemplateEra { source_uri: String, html_len: usize },

    /// A required decision field could not be found on the page
    #[error("Decision {source_uri} has no {field}")]
    MissingField {
        source_uri: String,
        field: &'static str,
    },

    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn page_suffix(page: &Option<u32>) -> String {
    match page {
        Some(page) => format!(" at page {}", page),
        None => String::new(),
    }
}

impl CaseLawError {
    /// Build a transport error for `url` with no page attached yet
    pub fn transport(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            page: None,
            status,
            message: message.into(),
        }
    }

    /// Attach the result page offset to a transport error
    pub fn at_page(self, page: u32) -> Self {
        match self {
            Self::Transport {
                url,
                status,
                message,
                ..
            } => Self::Transport {
                url,
                page: Some(page),
                status,
                message,
            },
            other => other,
        }
    }

    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Transport { status: Some(429), .. } => {
                Some("The site is rate limiting requests. Try a longer --pause.".to_string())
            }
            Self::Transport { .. } | Self::Network(_) => {
                Some("Check your internet connection and try again.".to_string())
            }
            Self::UnknownTemplateEra { .. } => Some(
                "Re-run with --dump DIR to save the page HTML for inspection.".to_string(),
            ),
            Self::InvalidCriteria(_) => Some(
                "Use 'nswcaselaw list courts' or 'nswcaselaw list tribunals' for valid indices."
                    .to_string(),
            ),
            Self::Config(_) => Some("Run 'nswcaselaw config path' to locate the config file.".to_string()),
            _ => None,
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            Self::Network(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CaseLawError>;
