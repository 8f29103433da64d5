pub mod dto;
pub mod use_case;

pub use dto::UploadRequest;
pub use use_case::UploadFileUseCase;
