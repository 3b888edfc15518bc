// Error conversion helpers and wrapping macro for Snafu-based errors
use crate::error::Error;

/// Convert backend errors into our unified Error type, naming the bucket and
/// key that were being accessed so `NotFound` can be reported precisely.
pub trait IntoStorageError {
    fn into_storage_error(self, bucket: &str, key: &str) -> Error;
}

impl IntoStorageError for opendal::Error {
    fn into_storage_error(self, bucket: &str, key: &str) -> Error {
        if self.kind() == opendal::ErrorKind::NotFound {
            Error::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
        } else {
            self.into()
        }
    }
}

/// `Result` adapter for [`IntoStorageError`].
pub trait ClassifyExt<T> {
    fn classify(self, bucket: &str, key: &str) -> crate::error::Result<T>;
}

impl<T, E: IntoStorageError> ClassifyExt<T> for std::result::Result<T, E> {
    fn classify(self, bucket: &str, key: &str) -> crate::error::Result<T> {
        self.map_err(|e| e.into_storage_error(bucket, key))
    }
}

/// Macro to wrap a Result-producing expression into a Snafu variant with `source: Box<Error>`.
/// Example:
/// wrap_err!(location.list_folder(&ctx, print).await, ListFolderFailed { uri: uri.clone() })?
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {{
        $expr.map_err(|e| {
            let src: $crate::error::Error = e;
            $crate::error::Error::$variant { $($field: $value),*, source: Box::new(src) }
        })
    }};
}
