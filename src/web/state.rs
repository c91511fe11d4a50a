use crate::{Config, Database};
use std::path::PathBuf;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub media_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let media_dir = PathBuf::from(&config.media.upload_dir);
        Self {
            config,
            db,
            media_dir,
        }
    }
}
