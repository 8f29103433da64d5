pub mod local_disk_storage;
pub mod traits;

pub use local_disk_storage::LocalDiskStorage;
pub use traits::{ByteStream, FileStorage};
