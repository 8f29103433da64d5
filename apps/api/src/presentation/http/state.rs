use crate::{
    application::upload_file::UploadFileUseCase, config::Config,
    infrastructure::storage::FileStorage,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn FileStorage>,
    pub uploads: Arc<UploadFileUseCase>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn FileStorage>) -> Self {
        let uploads = Arc::new(UploadFileUseCase::new(
            Arc::new(config.upload_policy()),
            storage.clone(),
        ));
        Self {
            config,
            storage,
            uploads,
        }
    }
}
