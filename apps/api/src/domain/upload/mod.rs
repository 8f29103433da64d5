pub mod category;
pub mod entity;
pub mod errors;
pub mod policy;
pub mod value_objects;

pub use category::UploadCategory;
pub use entity::StoredFile;
pub use errors::UploadError;
pub use policy::{CategoryRules, UploadPolicy};
pub use value_objects::StoredFileName;
