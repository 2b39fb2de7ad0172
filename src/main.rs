//! DramaLearn entry point
//!
//! The browser build starts from `web::start` (`wasm-bindgen(start)`). The
//! native build opens the same store over a JSON file in the working
//! directory and reports what it holds.

#[cfg(not(target_arch = "wasm32"))]
const STORAGE_FILE: &str = "dramalearn_storage.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dramalearn::RecordStore;
    use dramalearn::storage::JsonFileStorage;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("DramaLearn (native) starting...");

    let storage = match JsonFileStorage::open(STORAGE_FILE) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Cannot open {STORAGE_FILE}: {e}");
            std::process::exit(1);
        }
    };

    let store = match RecordStore::open(storage) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot load dialogues: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "{} dialogues, theme {}",
        store.entries().len(),
        store.theme().as_str()
    );
    for entry in store.recent() {
        log::info!("[{}] {}: {} / {}", entry.id, entry.title, entry.original, entry.translation);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
