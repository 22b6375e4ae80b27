use thiserror::Error;

pub type Result<T> = std::result::Result<T, GheatError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum GheatError {
    #[error("Failed to open git repository: {0}")]
    RepositoryOpen(#[from] Box<gix::discover::Error>),
    #[error("Failed to read author identity: {0}")]
    ConfigRead(String),
    #[error("Failed to read commit history: {0}")]
    HistoryRead(#[source] BoxedSource),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GheatError {
    pub fn history<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GheatError::HistoryRead(Box::new(err))
    }
}

// Manual From implementations so `?` works on gix calls inside the history walk
impl From<gix::discover::Error> for GheatError {
    fn from(err: gix::discover::Error) -> Self {
        GheatError::RepositoryOpen(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GheatError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GheatError::history(err)
    }
}

impl From<gix::head::peel::to_commit::Error> for GheatError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GheatError::history(err)
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GheatError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GheatError::history(err)
    }
}

impl From<gix::objs::decode::Error> for GheatError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GheatError::history(err)
    }
}
