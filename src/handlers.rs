use crate::errors::AppError;
use crate::models::{
    CsvFile, DashboardSnapshot, DragRequest, ReminderView, SelectQuery, SelectSource, StatsView,
    UploadView,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Multipart, Query, State},
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = &state.dashboard;
    Html(render_index(&dashboard.snapshot(), dashboard.locale()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot())
}

/// Receives the file picked in the browser, either from the browse dialog or a drop.
pub async fn select_file(
    State(state): State<AppState>,
    Query(query): Query<SelectQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadView>, AppError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?;
        if name.is_empty() {
            return Err(AppError::bad_request("file field must carry a file name"));
        }
        file = Some(CsvFile::new(name, content.to_vec()));
    }

    let upload = state.dashboard.upload();
    match query.source {
        SelectSource::Browse => upload.select_browsed(file),
        SelectSource::Drop => upload.drop_file(file),
    }
    Ok(Json(upload.view()))
}

pub async fn drag(
    State(state): State<AppState>,
    Json(payload): Json<DragRequest>,
) -> Json<UploadView> {
    let upload = state.dashboard.upload();
    if payload.dragging {
        upload.drag_over();
    } else {
        upload.drag_leave();
    }
    Json(upload.view())
}

pub async fn upload(State(state): State<AppState>) -> Json<UploadView> {
    let upload = state.dashboard.upload();
    upload.upload().await;
    Json(upload.view())
}

pub async fn refresh_stats(State(state): State<AppState>) -> Json<StatsView> {
    state.dashboard.stats().fetch().await;
    Json(state.dashboard.stats().view())
}

pub async fn send_reminders(State(state): State<AppState>) -> Json<ReminderView> {
    state.dashboard.send_reminders().await;
    Json(state.dashboard.reminders().view())
}
