pub mod upload_file;
