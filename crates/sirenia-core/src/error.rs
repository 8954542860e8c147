pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid format specifier: {specifier:?}")]
    InvalidFormatSpecifier { specifier: String },

    #[error("invalid color: {color:?}")]
    InvalidColor { color: String },

    #[error("invalid config value at `{path}`: {message}")]
    InvalidConfig { path: String, message: String },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
