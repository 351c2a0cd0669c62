use tokio::task::JoinError;

/// Runs SQLite, decoding and encoding work off the async worker threads.
pub async fn run_blocking<F, T>(f: F) -> Result<T, JoinError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await
}
