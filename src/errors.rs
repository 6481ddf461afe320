use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("config error: {0}")]
    Config(String),

    #[error("ipc error: {0}")]
    Ipc(String),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ShellError> = std::result::Result<T, E>;
