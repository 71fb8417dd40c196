pub mod config;
pub mod data;
pub mod game;
pub mod images;
pub mod models;

use std::sync::Arc;

use tauri::Manager;

use config::RemoteConfig;
use data::CompanyStore;
use game::{
    commands::{get_game_state, reset_game, resolve_image_url, start_game, submit_guess},
    GameController,
};

pub(crate) struct AppState {
    pub(crate) store: Arc<CompanyStore>,
    pub(crate) game: GameController,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("HigherLower starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let store = Arc::new(CompanyStore::connect(RemoteConfig::from_env()));
            if store.is_demo() {
                log::warn!("Playing against the embedded demo dataset");
            }

            let game = GameController::new(app.handle().clone(), store.clone());
            app.manage(AppState { store, game });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_game_state,
            start_game,
            submit_guess,
            reset_game,
            resolve_image_url,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
