use crate::Periods;
use crate::model::{CreatePeriodRequest, PeriodFilter, PeriodView, UpdatePeriodRequest};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/submission-periods",
    params(PeriodFilter),
    responses((status = OK, description = "Submission periods", body = ApiResponse<Vec<PeriodView>>)),
    security(("bearer" = [])),
    tag = PERIOD_TAG,
)]
pub async fn list_periods(
    State(state): State<ApiState>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<PeriodFilter>,
) -> Result<ApiResponse<Vec<PeriodView>>, ApiError> {
    let periods = state.try_get_slice::<Periods>()?;
    let views = periods.service.list(&filter).await?;
    Ok(ApiResponse::ok("Lấy danh sách đợt nộp thành công", views))
}

#[api_handler(
    post,
    path = "/api/submission-periods",
    request_body = CreatePeriodRequest,
    responses(
        (status = CREATED, description = "Period created", body = ApiResponse<PeriodView>),
        (status = BAD_REQUEST, description = "Invalid input"),
        (status = CONFLICT, description = "Duplicate round or overlapping dates"),
    ),
    security(("bearer" = [])),
    tag = PERIOD_TAG,
)]
pub async fn create_period(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreatePeriodRequest>,
) -> Result<ApiResponse<PeriodView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let periods = state.try_get_slice::<Periods>()?;
    let view = periods.service.create(&user, request).await?;
    Ok(ApiResponse::created("Tạo đợt nộp thành công", view))
}

#[api_handler(
    get,
    path = "/api/submission-periods/active",
    responses((status = OK, description = "Periods open now", body = ApiResponse<Vec<PeriodView>>)),
    security(("bearer" = [])),
    tag = PERIOD_TAG,
)]
pub async fn active_periods(
    State(state): State<ApiState>,
    _user: CurrentUser,
) -> Result<ApiResponse<Vec<PeriodView>>, ApiError> {
    let periods = state.try_get_slice::<Periods>()?;
    let views = periods.service.active().await?;
    Ok(ApiResponse::ok("Lấy danh sách đợt nộp đang hoạt động thành công", views))
}

#[api_handler(
    get,
    path = "/api/submission-periods/{id}",
    params(("id" = String, Path, description = "Period id")),
    responses(
        (status = OK, description = "Period", body = ApiResponse<PeriodView>),
        (status = NOT_FOUND, description = "Unknown period"),
    ),
    security(("bearer" = [])),
    tag = PERIOD_TAG,
)]
pub async fn get_period(
    State(state): State<ApiState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<PeriodView>, ApiError> {
    let id = ResourceGuard::verify(id, SUBMISSION_PERIOD)?;
    let periods = state.try_get_slice::<Periods>()?;
    let view = periods.service.view(&id).await?;
    Ok(ApiResponse::ok("Lấy thông tin đợt nộp thành công", view))
}

#[api_handler(
    put,
    path = "/api/submission-periods/{id}",
    params(("id" = String, Path, description = "Period id")),
    request_body = UpdatePeriodRequest,
    responses(
        (status = OK, description = "Period updated", body = ApiResponse<PeriodView>),
        (status = BAD_REQUEST, description = "Invalid input or frozen period"),
        (status = NOT_FOUND, description = "Unknown period"),
        (status = CONFLICT, description = "Duplicate round or overlapping dates"),
    ),
    security(("bearer" = [])),
    tag = PERIOD_TAG,
)]
pub async fn update_period(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdatePeriodRequest>,
) -> Result<ApiResponse<PeriodView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, SUBMISSION_PERIOD)?;
    let periods = state.try_get_slice::<Periods>()?;
    let view = periods.service.update(&user, &id, request).await?;
    Ok(ApiResponse::ok("Cập nhật đợt nộp thành công", view))
}

#[api_handler(
    delete,
    path = "/api/submission-periods/{id}",
    params(("id" = String, Path, description = "Period id")),
    responses(
        (status = OK, description = "Period deleted", body = ApiResponse<DeletedResource>),
        (status = NOT_FOUND, description = "Unknown period"),
        (status = CONFLICT, description = "Period still has topics"),
    ),
    security(("bearer" = [])),
    tag = PERIOD_TAG,
)]
pub async fn delete_period(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, SUBMISSION_PERIOD)?;
    let periods = state.try_get_slice::<Periods>()?;
    periods.service.delete(&user, &id).await?;
    Ok(ApiResponse::ok("Xóa đợt nộp thành công", DeletedResource::new(id)))
}
