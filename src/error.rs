use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Browser session errors
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    /// Metadata API / direct HTTP errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    /// Audit log and input file I/O errors
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// Malformed input list
    #[error("input error: {0}")]
    Input(#[from] InputError),
    /// Configuration errors
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Browser errors
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Could not connect to a running browser
    #[error("cannot connect to browser (port {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: BoxError,
    },
    /// Could not launch a headless browser
    #[error("cannot launch browser: {source}")]
    LaunchFailed {
        #[source]
        source: BoxError,
    },
    /// Could not open a page
    #[error("cannot create page: {source}")]
    PageCreationFailed {
        #[source]
        source: BoxError,
    },
    /// Navigation failed or timed out
    #[error("navigation to {url} failed: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: BoxError,
    },
    /// Browser configuration rejected
    #[error("browser configuration failed: {message}")]
    ConfigurationFailed { message: String },
}

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection broke
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// Non-success HTTP status
    #[error("{endpoint} returned HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// Response body was not the expected JSON
    #[error("cannot parse response from {endpoint}: {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: BoxError,
    },
}

/// File errors
#[derive(Debug, Error)]
pub enum FileError {
    /// File does not exist
    #[error("file not found: {path}")]
    NotFound { path: String },
    /// Read failed
    #[error("cannot read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Append failed
    #[error("cannot write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Input list errors
#[derive(Debug, Error)]
pub enum InputError {
    /// Not a JSON array of journal objects
    #[error("{path} is not a JSON array of journals: {source}")]
    MalformedJournalList {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed
    #[error("environment variable {var_name}: '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// Config file could not be parsed
    #[error("cannot parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Convenience constructors ==========

impl AppError {
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    pub fn browser_launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(source),
        })
    }

    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// Input and setup failures abort the run; everything else is recorded as data.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Browser(BrowserError::ConnectionFailed { .. })
                | AppError::Browser(BrowserError::LaunchFailed { .. })
                | AppError::Browser(BrowserError::PageCreationFailed { .. })
                | AppError::Browser(BrowserError::ConfigurationFailed { .. })
                | AppError::File(_)
                | AppError::Input(_)
                | AppError::Config(_)
        )
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
