use tauri::State;

use crate::{
    game::{GameController, GameSnapshot, GuessDirection},
    images,
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> GameController {
    state.game.clone()
}

#[tauri::command]
pub async fn get_game_state(state: State<'_, AppState>) -> Result<GameSnapshot, String> {
    Ok(controller_from_state(&state).get_snapshot().await)
}

#[tauri::command]
pub async fn start_game(state: State<'_, AppState>) -> Result<GameSnapshot, String> {
    controller_from_state(&state)
        .start_game()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn submit_guess(
    state: State<'_, AppState>,
    direction: GuessDirection,
) -> Result<GameSnapshot, String> {
    controller_from_state(&state)
        .guess(direction)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn reset_game(state: State<'_, AppState>) -> Result<GameSnapshot, String> {
    controller_from_state(&state)
        .reset_game()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn resolve_image_url(
    state: State<'_, AppState>,
    reference: Option<String>,
) -> Result<String, String> {
    Ok(images::resolve_image_url(
        reference.as_deref(),
        state.store.remote(),
    ))
}
