use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid storage URI '{uri}': {source}"))]
    InvalidUri { uri: String, source: url::ParseError },

    #[snafu(display("Invalid storage address '{uri}': {reason}"))]
    InvalidAddress { uri: String, reason: String },

    #[snafu(display("Not found: bucket={bucket} key={key}"))]
    NotFound { bucket: String, key: String },

    #[snafu(display("Transport error: {message}"))]
    Transport { message: String },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("Operation cancelled"))]
    Cancelled,

    #[snafu(display("Operation deadline exceeded"))]
    DeadlineExceeded,

    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Invalid value '{value}' for '{key}': {reason}"))]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },

    #[snafu(display("No location has been set"))]
    LocationNotSet,

    #[snafu(display("{uri} does not exist: {source}"))]
    ValidateLocationFailed { uri: String, source: Box<Error> },

    #[snafu(display("Failed to list folder '{uri}': {source}"))]
    ListFolderFailed { uri: String, source: Box<Error> },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The address could not be parsed; never reached the network.
    Parse,
    /// The remote store confirmed the bucket or key is absent.
    NotFound,
    /// Any other remote, network or auth failure.
    Transport,
    /// The operation's context was cancelled or its deadline passed.
    Cancelled,
    Config,
    Io,
    /// Facade used before a location was validated.
    State,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUri { .. } | Error::InvalidAddress { .. } => ErrorKind::Parse,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Transport { .. } | Error::OpenDal { .. } => ErrorKind::Transport,
            Error::Cancelled | Error::DeadlineExceeded => ErrorKind::Cancelled,
            Error::MissingEnvVar { .. }
            | Error::UnsupportedProvider { .. }
            | Error::InvalidConfig { .. } => ErrorKind::Config,
            Error::LocationNotSet => ErrorKind::State,
            Error::ValidateLocationFailed { source, .. } | Error::ListFolderFailed { source, .. } => {
                source.kind()
            }
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
