/*
 * Responsibility
 * - URL 構造を定義
 * - 公開ルートを先に、Auth Gate を挟んで保護ルートを後に登録する
 *   (どこまでが保護されるかは登録順で決まる)
 * - /notes は GET が公開、POST のみ保護 (method 単位で gate する)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::handlers::{
    audio::process_full_audio,
    health::health,
    notes::{create_note, list_notes},
    users::user_info,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let notes = get(list_notes).merge(access::gate(post(create_note), state.clone()));

    let public = Router::new()
        .route("/health", get(health))
        .route("/notes", notes);

    let protected = Router::new()
        .route("/user-info", get(user_info))
        .route(
            "/audio/process-full-audio",
            post(process_full_audio).put(process_full_audio),
        );

    public.merge(access::apply(protected, state))
}
