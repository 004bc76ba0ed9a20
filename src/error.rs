use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The active catalog has no template for a period key.
    #[error("no message for `{key}` in locale `{locale}`")]
    MissingTemplate { locale: String, key: String },

    /// No catalog exists for an explicitly requested locale.
    #[error("unsupported locale `{0}`")]
    UnsupportedLocale(String),

    #[error("malformed catalog `{locale}` at line {line}: {reason}")]
    MalformedCatalog {
        locale: String,
        line: usize,
        reason: String,
    },
}
