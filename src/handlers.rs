use crate::auth::{self, CurrentUser, SESSION_COOKIE};
use crate::chart::{self, MoodPoint};
use crate::errors::AppError;
use crate::models::{
    Credentials, EntryPatch, MoodEntry, NewEntryRequest, SessionInfo, SessionResponse, Worksheet,
    WorksheetPayload,
};
use crate::state::AppState;
use crate::store;
use crate::ui;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};

pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn login_page() -> Html<String> {
    Html(ui::login_page())
}

pub async fn signup_page() -> Html<String> {
    Html(ui::signup_page())
}

pub async fn dashboard_page() -> Html<String> {
    Html(ui::dashboard_page())
}

pub async fn worksheets_page() -> Html<String> {
    Html(ui::worksheets_page())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AppError> {
    let mut data = state.data.lock().await;
    let success = auth::sign_up(&mut data, &credentials.email, &credentials.password)?;
    store::persist_data(&state.data_path, &data).await?;
    Ok(session_response(success))
}

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AppError> {
    let mut data = state.data.lock().await;
    let success = auth::sign_in(&mut data, &credentials.email, &credentials.password)?;
    store::persist_data(&state.data_path, &data).await?;
    Ok(session_response(success))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = auth::request_token(&headers) {
        let mut data = state.data.lock().await;
        auth::sign_out(&mut data, &token);
        store::persist_data(&state.data_path, &data).await?;
    }

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

pub async fn session(user: CurrentUser) -> Json<SessionInfo> {
    Json(SessionInfo { email: user.email })
}

pub async fn list_entries(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Vec<MoodEntry>> {
    let data = state.data.lock().await;
    Json(data.entries_for(user.id))
}

pub async fn create_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), AppError> {
    request.validate().map_err(AppError::bad_request)?;

    let mut data = state.data.lock().await;
    let entry = data.insert_entry(user.id, request);
    store::persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<MoodEntry>, AppError> {
    patch.validate().map_err(AppError::bad_request)?;

    let mut data = state.data.lock().await;
    let merged = data.update_entry(user.id, id, &patch)?;
    store::persist_data(&state.data_path, &data).await?;
    Ok(Json(merged))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    data.delete_entry(user.id, id)?;
    store::persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn entry_series(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Vec<MoodPoint>> {
    let data = state.data.lock().await;
    Json(chart::mood_series(&data.entries_for(user.id)))
}

pub async fn create_worksheet(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<WorksheetPayload>,
) -> Result<(StatusCode, Json<Worksheet>), AppError> {
    payload.validate().map_err(AppError::bad_request)?;

    let mut data = state.data.lock().await;
    let worksheet = data.insert_worksheet(user.id, payload);
    store::persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(worksheet)))
}

pub async fn list_worksheets(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Vec<Worksheet>> {
    let data = state.data.lock().await;
    Json(data.worksheets_for(user.id))
}

fn session_response(success: auth::AuthSuccess) -> Response {
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        success.token
    );
    (
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            email: success.email,
            token: success.token,
        }),
    )
        .into_response()
}
