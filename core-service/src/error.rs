use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error(transparent)]
    Config(#[from] core_runtime::Error),

    #[error(transparent)]
    Auth(#[from] core_auth::AuthError),

    #[error(transparent)]
    Drive(#[from] provider_google_drive::GoogleDriveError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
