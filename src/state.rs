use crate::catalog::Catalog;
use crate::journal::Journal;
use crate::storage::FileRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<Journal<FileRepository>>,
}

impl AppState {
    pub fn new(repo: FileRepository, catalog: Catalog, seed_empty: bool) -> Self {
        Self {
            journal: Arc::new(Journal::new(repo, catalog).with_empty_seeding(seed_empty)),
        }
    }
}
