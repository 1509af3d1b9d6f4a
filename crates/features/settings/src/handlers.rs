use crate::Settings;
use crate::model::{SettingView, UpsertSettingRequest};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/system-configs",
    responses((status = OK, description = "Effective configuration", body = ApiResponse<Vec<SettingView>>)),
    security(("bearer" = [])),
    tag = SETTINGS_TAG,
)]
pub async fn list_settings(
    State(state): State<ApiState>,
    _user: CurrentUser,
) -> Result<ApiResponse<Vec<SettingView>>, ApiError> {
    let settings = state.try_get_slice::<Settings>()?;
    let views = settings.service.list().await?;
    Ok(ApiResponse::ok("Lấy danh sách cấu hình thành công", views))
}

#[api_handler(
    get,
    path = "/api/system-configs/{key}",
    params(("key" = String, Path, description = "Configuration key")),
    responses(
        (status = OK, description = "Configuration entry", body = ApiResponse<SettingView>),
        (status = NOT_FOUND, description = "Unknown key"),
    ),
    security(("bearer" = [])),
    tag = SETTINGS_TAG,
)]
pub async fn get_setting(
    State(state): State<ApiState>,
    _user: CurrentUser,
    Path(key): Path<String>,
) -> Result<ApiResponse<SettingView>, ApiError> {
    let settings = state.try_get_slice::<Settings>()?;
    let view = settings.service.get(&key).await?;
    Ok(ApiResponse::ok("Lấy cấu hình thành công", view))
}

#[api_handler(
    put,
    path = "/api/system-configs/{key}",
    params(("key" = String, Path, description = "Configuration key")),
    request_body = UpsertSettingRequest,
    responses(
        (status = OK, description = "Configuration saved", body = ApiResponse<SettingView>),
        (status = BAD_REQUEST, description = "Invalid key or value"),
    ),
    security(("bearer" = [])),
    tag = SETTINGS_TAG,
)]
pub async fn upsert_setting(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(key): Path<String>,
    ApiJson(request): ApiJson<UpsertSettingRequest>,
) -> Result<ApiResponse<SettingView>, ApiError> {
    user.require(RoleSet::ADMIN)?;
    let settings = state.try_get_slice::<Settings>()?;
    let view = settings.service.upsert(&user, &key, request).await?;
    Ok(ApiResponse::ok("Cập nhật cấu hình thành công", view))
}

#[api_handler(
    delete,
    path = "/api/system-configs/{key}",
    params(("key" = String, Path, description = "Configuration key")),
    responses(
        (status = OK, description = "Override removed", body = ApiResponse<SettingView>),
        (status = NOT_FOUND, description = "Unknown key"),
    ),
    security(("bearer" = [])),
    tag = SETTINGS_TAG,
)]
pub async fn reset_setting(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(key): Path<String>,
) -> Result<ApiResponse<SettingView>, ApiError> {
    user.require(RoleSet::ADMIN)?;
    let settings = state.try_get_slice::<Settings>()?;
    let view = settings.service.reset(&key).await?;
    Ok(ApiResponse::ok("Khôi phục cấu hình mặc định thành công", view))
}
