use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use super::{
    error::ApiError,
    models::{
        EntryView, HealthResponse, MentionAccepted, NewEntry, ProfileUpdate, ProfileView,
        VerifiedMention,
    },
    state::AppState,
};
use crate::entry::Entry;
use crate::mention::MentionOutcome;
use crate::store::{Profile, StoreError};

/// Whether the request carries the configured admin bearer token.
///
/// Without a configured token nobody is authenticated: drafts stay hidden
/// and writes are refused.
fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(expected) = state.config.server.admin_token.as_deref() else {
        return false;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if is_authenticated(state, headers) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Entry listing (GET /entries)
///
/// Newest first. Drafts are included only for the authenticated owner.
pub async fn list_entries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let include_drafts = is_authenticated(&state, &headers);

    let views = state
        .store
        .entries()
        .list_reverse_chronological(include_drafts)
        .map(|entry| entry.map(|entry| EntryView::from(&entry)))
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Json(views))
}

/// Single entry (GET /post/{id})
///
/// Unknown, malformed, and hidden-draft identifiers are all 404.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let include_drafts = is_authenticated(&state, &headers);

    let entry = state
        .store
        .entries()
        .get_by_identifier(&id, include_drafts)?
        .ok_or_else(|| ApiError::NotFound(format!("entry {id}")))?;

    Ok(Json(EntryView::from(&entry)))
}

/// Publishing endpoint (POST /entries)
///
/// A non-empty `name` creates an article, otherwise a note. Responds 201
/// with the entry's address in `Location`.
pub async fn create_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<NewEntry>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers)?;

    let blank_name = submission
        .name
        .as_deref()
        .is_none_or(|name| name.trim().is_empty());
    if submission.content.trim().is_empty() && blank_name {
        return Err(ApiError::InvalidPayload("entry has neither name nor content".into()));
    }

    let entry = Entry::from_submission(
        submission.name.as_deref(),
        &submission.content,
        submission.draft,
        Utc::now(),
    );
    let entry = state.store.entries().publish(entry)?;
    state.metrics.entry_published();

    let location = state.indexer.routes().entry_url(&entry.identifier());
    info!(id = %entry.identifier(), kind = entry.kind().as_str(), %location, "Entry published");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(EntryView::from(&entry)),
    ))
}

/// Verified mention intake (POST /webmention/verified)
///
/// Called by the verifier once the source page has been fetched and parsed.
pub async fn receive_mention(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mention): Json<VerifiedMention>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers)?;
    state.metrics.mention_received();

    let outcome = state
        .indexer
        .on_mention(&mention.source, &mention.target, &mention.data)?;
    if matches!(outcome, MentionOutcome::Attached { .. }) {
        state.metrics.mention_attached();
    }

    Ok((StatusCode::ACCEPTED, Json(MentionAccepted::from(outcome))))
}

/// Public profile (GET /profile)
pub async fn get_profile(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .store
        .profile()
        .get()?
        .ok_or_else(|| ApiError::NotFound("profile".into()))?;

    Ok(Json(ProfileView::from(profile)))
}

/// Profile update (PUT /profile)
pub async fn put_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers)?;

    let profiles = state.store.profile();
    let password = match update.password {
        Some(password) => password,
        None => profiles.get()?.map(|p| p.password).unwrap_or_default(),
    };
    let profile = Profile {
        name: update.name,
        home_url: update.home_url,
        github: update.github,
        host: update.host,
        password,
    };
    profiles.put(&profile)?;

    Ok(Json(ProfileView::from(profile)))
}

/// Health check endpoint (GET /health)
///
/// Reports 503 when the store cannot be read.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    use std::collections::HashMap;

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());

    let store_status = match state.store.stats() {
        Ok(_) => "healthy",
        Err(err) => {
            tracing::warn!(error = %err, "Store health check failed");
            "unhealthy"
        }
    };
    components.insert("fjall".to_string(), store_status.to_string());

    let all_healthy = components.values().all(|status| status == "healthy");
    let (overall_status, status_code) = if all_healthy {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        components,
        metrics: state.metrics.snapshot(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}
