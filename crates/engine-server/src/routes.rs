//! HTTP routes: one thin handler per endpoint, delegating all mutation and
//! ownership logic to `engine-runtime`.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use axum::routing::{get, post};
use engine_core::{stats, GameError};
use engine_runtime::{auth, EngineError};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/:instance/config", get(get_config))
        .route("/:instance/stateVersion", get(get_state_version))
        .route("/:instance/algorithms", get(get_algorithms))
        .route("/:instance/state/player/:player_id", get(get_player_state))
        .route("/:instance/character/:character_id/stats", get(get_character_stats))
        .route("/:instance/tx", post(post_tx));

    if app_state.e2e_mode {
        router = router.route("/__shutdown", post(shutdown));
    }

    router.with_state(app_state)
}

async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": app.started_at.elapsed().as_secs(),
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    auth::parse_bearer_token(Some(raw)).map(str::to_string)
}

async fn get_config(
    State(app): State<AppState>,
    Path(instance): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.registry.get(&instance).await?;
    Ok(Json(serde_json::to_value(app.registry.config().as_ref()).expect("GameConfig always serializes")))
}

async fn get_algorithms(
    State(app): State<AppState>,
    Path(instance): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.registry.get(&instance).await?;
    Ok(Json(serde_json::to_value(&app.registry.config().algorithms).expect("Algorithms always serializes")))
}

async fn get_state_version(
    State(app): State<AppState>,
    Path(instance): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let handle = app.registry.get(&instance).await?;
    let snapshot = handle.snapshot().await?;
    Ok(Json(serde_json::json!({
        "gameInstanceId": snapshot.game_instance_id,
        "stateVersion": snapshot.state_version,
    })))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "errorCode": "UNAUTHORIZED" }))).into_response()
}

fn ownership_violation() -> Response {
    (StatusCode::FORBIDDEN, Json(serde_json::json!({ "errorCode": "OWNERSHIP_VIOLATION" }))).into_response()
}

async fn get_player_state(
    State(app): State<AppState>,
    Path((instance, player_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let handle = app.registry.get(&instance).await?;
    let snapshot = handle.snapshot().await?;
    let admin_key = admin_key_of(&app);
    let token = bearer_token(&headers);

    let Some(principal) = auth::authorize(&snapshot, admin_key.as_deref(), token.as_deref()) else {
        return Ok(unauthorized());
    };
    if let Some(actor_id) = principal.actor_id()
        && !auth::actor_owns_player(&snapshot, actor_id, &player_id)
    {
        return Ok(ownership_violation());
    }

    match snapshot.players.get(&player_id) {
        Some(player) => Ok(Json(serde_json::to_value(player).expect("Player always serializes")).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "errorCode": "PLAYER_NOT_FOUND" })),
        )
            .into_response()),
    }
}

async fn get_character_stats(
    State(app): State<AppState>,
    Path((instance, character_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let handle = app.registry.get(&instance).await?;
    let snapshot = handle.snapshot().await?;
    let admin_key = admin_key_of(&app);
    let token = bearer_token(&headers);

    let Some(principal) = auth::authorize(&snapshot, admin_key.as_deref(), token.as_deref()) else {
        return Ok(unauthorized());
    };

    // Ownership is checked before the character is resolved to exist at all:
    // a non-admin's search is scoped to their own players from the start, so
    // a character owned by someone else is indistinguishable from one that
    // doesn't exist anywhere in the instance.
    let owning_player = match principal.actor_id() {
        Some(actor_id) => {
            let owned_player_ids = snapshot
                .actors
                .get(actor_id)
                .map(|actor| actor.player_ids.as_slice())
                .unwrap_or(&[]);
            owned_player_ids.iter().find_map(|player_id| {
                let player = snapshot.players.get(player_id)?;
                player.characters.contains_key(&character_id).then_some((player_id.as_str(), player))
            })
        }
        None => snapshot
            .players
            .iter()
            .find(|(_, player)| player.characters.contains_key(&character_id))
            .map(|(player_id, player)| (player_id.as_str(), player)),
    };
    let Some((_, player)) = owning_player else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "errorCode": "CHARACTER_NOT_FOUND" })),
        )
            .into_response());
    };

    match stats::project_stats(app.registry.config(), player, &character_id) {
        Ok(projection) => Ok(Json(projection).into_response()),
        Err(error) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "errorCode": error.error_code(), "errorMessage": error.to_string() })),
        )
            .into_response()),
    }
}

async fn post_tx(
    State(app): State<AppState>,
    Path(instance): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let handle = match app.registry.get(&instance).await {
        Ok(handle) => handle,
        Err(EngineError::InstanceNotFound(_)) => {
            app.registry.create_instance(&instance).await?
        }
        Err(other) => return Err(other.into()),
    };

    let result = handle.dispatch(body, bearer_token(&headers)).await?;
    let status = StatusCode::from_u16(result.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(result.body)).into_response())
}

async fn shutdown() -> &'static str {
    std::process::exit(0);
}

fn admin_key_of(app: &AppState) -> Option<String> {
    app.registry.admin_api_key().map(str::to_string)
}
