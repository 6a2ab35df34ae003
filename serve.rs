use borgden::*;

#[tokio::main]
async fn main() -> Result {
    init_tracing();

    let store = Arc::new(Store::open(&APP_CONFIG.data_dir)?);
    SHUTDOWN.on_shutdown({
        let store = store.clone();
        move || {
            if let Err(e) = store.flush() {
                error!("store flush on shutdown failed: {e}");
            }
        }
    });

    RepoWatcher::spawn(store.clone());
    AlertSweep::spawn(store.clone());

    router(store).run().await
}
