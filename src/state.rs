use crate::errors::AppError;
use crate::store::Repository;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handlers take the lock for the whole read-modify-write of a request.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Mutex<Repository>>,
}

impl AppState {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo: Arc::new(Mutex::new(repo)),
        }
    }

    /// Runs `work` against the repository on the blocking pool. Store access
    /// is synchronous file I/O, so it must stay off the async workers. The
    /// lock is held until `work` returns.
    pub async fn with_repo<F, T>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&Repository) -> T + Send + 'static,
        T: Send + 'static,
    {
        let repo = Arc::clone(&self.repo).lock_owned().await;
        tokio::task::spawn_blocking(move || work(&repo))
            .await
            .map_err(AppError::internal)
    }
}
