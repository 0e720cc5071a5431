use crate::errors::AppError;
use crate::models::{
    parse_timestamp, AggregateStats, AppData, BloodRequest, DonationPayload, DonorRecord,
    ForecastQuery, OtpPayload, OtpVerifyPayload, OtpVerifyResponse, PredictiveSeries,
    RequestPayload,
};
use crate::otp::normalize_email;
use crate::state::AppState;
use crate::stats::{build_predictive, build_stats};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let events = state.data.lock().await.events();
    Html(render_index(&build_stats(&events)))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<AggregateStats>, AppError> {
    let events = state.data.lock().await.events();
    Ok(Json(build_stats(&events)))
}

pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<PredictiveSeries>, AppError> {
    let months = query.months.unwrap_or(state.config.forecast_months);
    if months > state.config.forecast_max_months {
        return Err(AppError::bad_request(format!(
            "months must be at most {}",
            state.config.forecast_max_months
        )));
    }

    let events = state.data.lock().await.events();
    let forecaster = state.forecaster.clone();
    let series =
        tokio::task::spawn_blocking(move || build_predictive(&events, months, forecaster.as_ref()))
            .await?;
    Ok(Json(series))
}

pub async fn record_donation(
    State(state): State<AppState>,
    Json(payload): Json<DonationPayload>,
) -> Result<Json<DonorRecord>, AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() {
        return Err(AppError::bad_request("email is required"));
    }
    let date = match payload.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            if parse_timestamp(raw).is_none() {
                return Err(AppError::bad_request("date must be RFC 3339 or YYYY-MM-DD"));
            }
            raw.to_string()
        }
        _ => Utc::now().date_naive().to_string(),
    };

    let updated = commit(&state, |data| {
        let donor = match data.donors.iter().position(|d| d.email == email) {
            Some(index) => &mut data.donors[index],
            None => {
                data.donors.push(DonorRecord {
                    email: email.clone(),
                    ..DonorRecord::default()
                });
                let last = data.donors.len() - 1;
                &mut data.donors[last]
            }
        };
        if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
            donor.name = name.trim().to_string();
        }
        if let Some(blood_type) = payload.blood_type.filter(|b| !b.trim().is_empty()) {
            donor.blood_type = Some(blood_type.trim().to_string());
        }
        donor.last_donation = Some(date);
        donor.total_donations = donor.total_donations.saturating_add(1);
        donor.clone()
    })
    .await?;

    info!(total = updated.total_donations, "recorded donation");
    Ok(Json(updated))
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<RequestPayload>,
) -> Result<(StatusCode, Json<BloodRequest>), AppError> {
    let requester = payload.requester.trim();
    if requester.is_empty() {
        return Err(AppError::bad_request("requester is required"));
    }

    let request = BloodRequest {
        requester: requester.to_string(),
        blood_type: payload.blood_type.map(|b| b.trim().to_string()),
        created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        hospital: payload.hospital,
    };

    commit(&state, |data| data.requests.push(request.clone())).await?;

    info!(blood_type = ?request.blood_type, "recorded blood request");
    Ok((StatusCode::CREATED, Json(request)))
}

/// Applies `change` to a copy of the records and swaps it in only once it is on disk.
async fn commit<T>(
    state: &AppState,
    change: impl FnOnce(&mut AppData) -> T,
) -> Result<T, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let output = change(&mut next);
    persist_data(&state.config.data_path, &next).await?;
    *data = next;
    Ok(output)
}

pub async fn issue_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpPayload>,
) -> Result<StatusCode, AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() {
        return Err(AppError::bad_request("email is required"));
    }

    // The code itself goes out through the mail collaborator, never the response.
    let _code = state.otp.issue(&email);
    debug!(%email, "issued one-time code");
    Ok(StatusCode::ACCEPTED)
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpVerifyPayload>,
) -> Result<Json<OtpVerifyResponse>, AppError> {
    let verified = state.otp.verify(&payload.email, &payload.code);
    Ok(Json(OtpVerifyResponse { verified }))
}
