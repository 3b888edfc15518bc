// Storage operations built on top of the injected capabilities
pub mod list;
pub mod upload;

pub use list::{KeyLister, KeyStream};
pub use upload::ChunkedUploader;
