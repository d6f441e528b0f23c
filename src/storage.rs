use crate::errors::AppError;
use crate::models::Entry;
use std::{collections::HashMap, future::Future, path::PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::error;

pub trait EntryRepository: Send + Sync + 'static {
    fn exists(&self, user_id: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    fn load(&self, user_id: &str) -> impl Future<Output = Result<Vec<Entry>, AppError>> + Send;

    fn save(
        &self,
        user_id: &str,
        entries: &[Entry],
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

pub fn storage_key(user_id: &str) -> String {
    format!("entries-{user_id}")
}

#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", storage_key(user_id)))
    }
}

impl EntryRepository for FileRepository {
    async fn exists(&self, user_id: &str) -> Result<bool, AppError> {
        Ok(fs::try_exists(self.path_for(user_id)).await?)
    }

    async fn load(&self, user_id: &str) -> Result<Vec<Entry>, AppError> {
        let path = self.path_for(user_id);
        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                error!("failed to parse {}: {err}", path.display());
                AppError::internal(err)
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                Err(AppError::internal(err))
            }
        }
    }

    async fn save(&self, user_id: &str, entries: &[Entry]) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        let payload = serde_json::to_vec_pretty(entries)?;
        let path = self.path_for(user_id);
        // Readers only ever see the old or the new file, never a partial one.
        let staging = path.with_extension("json.tmp");
        let written = match fs::write(&staging, payload).await {
            Ok(()) => fs::rename(&staging, &path).await,
            Err(err) => Err(err),
        };
        written.map_err(|err| {
            error!("failed to write entries for {user_id}: {err}");
            AppError::internal(err)
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    lists: Mutex<HashMap<String, Vec<Entry>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryRepository for MemoryRepository {
    async fn exists(&self, user_id: &str) -> Result<bool, AppError> {
        let lists = self.lists.lock().await;
        Ok(lists.contains_key(&storage_key(user_id)))
    }

    async fn load(&self, user_id: &str) -> Result<Vec<Entry>, AppError> {
        let lists = self.lists.lock().await;
        Ok(lists.get(&storage_key(user_id)).cloned().unwrap_or_default())
    }

    async fn save(&self, user_id: &str, entries: &[Entry]) -> Result<(), AppError> {
        let mut lists = self.lists.lock().await;
        lists.insert(storage_key(user_id), entries.to_vec());
        Ok(())
    }
}
