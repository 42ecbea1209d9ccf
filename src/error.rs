use thiserror::Error;

/// Failure talking to the prayer-times calendar service.
///
/// Every variant is retryable by the user; nothing here is fatal.
#[derive(Debug, Error)]
pub enum ScheduleFetchError {
    #[error("could not reach the prayer-times service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prayer-times service answered HTTP {0}")]
    Status(u16),
    #[error("unexpected prayer-times payload: {0}")]
    Decode(String),
}

/// Failure talking to the Qur'an content service.
#[derive(Debug, Error)]
pub enum ContentFetchError {
    #[error("could not reach the Qur'an service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Qur'an service answered HTTP {0}")]
    Status(u16),
    #[error("unexpected Qur'an payload: {0}")]
    Decode(String),
    #[error("no surah numbered {0}; expected 1 to 114")]
    UnknownSurah(u32),
}
