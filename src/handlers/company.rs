use axum::{extract::State, response::IntoResponse};

use crate::{
    db::company_store::CompanyStore,
    error::Result,
    extract::ApiJson,
    models::company::CompanyProfileDto,
    response::ApiResponse,
};

/// # GET /api/company
/// `data` is `null` until a profile has been saved.
pub async fn get_company_profile(State(store): State<CompanyStore>) -> Result<impl IntoResponse> {
    let profile = store.get().await?.map(CompanyProfileDto::from);
    Ok(ApiResponse::ok(profile))
}

/// # POST /api/company
pub async fn save_company_profile(
    State(store): State<CompanyStore>,
    ApiJson(payload): ApiJson<CompanyProfileDto>,
) -> Result<impl IntoResponse> {
    let fields = payload.validate()?;
    let profile = store.save(&fields).await?;

    tracing::info!(company_name = %profile.company_name, "company profile saved");
    Ok(ApiResponse::ok(CompanyProfileDto::from(profile))
        .with_message("Company profile saved successfully"))
}
