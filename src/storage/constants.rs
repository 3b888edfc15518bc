// Key layout
pub const PATH_SEPARATOR: char = '/';

// Listing related constants
// Keys buffered between the page producer and the consumer
pub const LIST_CHANNEL_CAPACITY: usize = 32;
pub const DEFAULT_LIST_PAGE_SIZE: usize = 1000;

// Upload related constants
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024 * 1024;

// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";
