use crate::Decisions;
use crate::model::{CreateDecisionRequest, DecisionFilter, DecisionView, UpdateDecisionRequest};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/decisions",
    params(DecisionFilter),
    responses((status = OK, description = "Decisions", body = ApiResponse<Vec<DecisionView>>)),
    security(("bearer" = [])),
    tag = DECISION_TAG,
)]
pub async fn list_decisions(
    State(state): State<ApiState>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<DecisionFilter>,
) -> Result<ApiResponse<Vec<DecisionView>>, ApiError> {
    let decisions = state.try_get_slice::<Decisions>()?;
    let records = decisions.service.list(filter).await?;
    Ok(ApiResponse::ok(
        "Lấy danh sách quyết định thành công",
        records.into_iter().map(DecisionView::from).collect(),
    ))
}

#[api_handler(
    post,
    path = "/api/decisions",
    request_body = CreateDecisionRequest,
    responses(
        (status = CREATED, description = "Decision recorded", body = ApiResponse<DecisionView>),
        (status = BAD_REQUEST, description = "Missing field or future signing date"),
        (status = CONFLICT, description = "Number already used"),
    ),
    security(("bearer" = [])),
    tag = DECISION_TAG,
)]
pub async fn create_decision(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreateDecisionRequest>,
) -> Result<ApiResponse<DecisionView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let decisions = state.try_get_slice::<Decisions>()?;
    let record = decisions.service.create(&user, request).await?;
    Ok(ApiResponse::created("Tạo quyết định thành công", record.into()))
}

#[api_handler(
    get,
    path = "/api/decisions/{id}",
    params(("id" = String, Path, description = "Decision id")),
    responses(
        (status = OK, description = "Decision", body = ApiResponse<DecisionView>),
        (status = NOT_FOUND, description = "Unknown decision"),
    ),
    security(("bearer" = [])),
    tag = DECISION_TAG,
)]
pub async fn get_decision(
    State(state): State<ApiState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DecisionView>, ApiError> {
    let id = ResourceGuard::verify(id, DECISION)?;
    let decisions = state.try_get_slice::<Decisions>()?;
    let record = decisions.service.get(&id).await?;
    Ok(ApiResponse::ok("Lấy thông tin quyết định thành công", record.into()))
}

#[api_handler(
    put,
    path = "/api/decisions/{id}",
    params(("id" = String, Path, description = "Decision id")),
    request_body = UpdateDecisionRequest,
    responses(
        (status = OK, description = "Decision updated", body = ApiResponse<DecisionView>),
        (status = CONFLICT, description = "Number already used"),
    ),
    security(("bearer" = [])),
    tag = DECISION_TAG,
)]
pub async fn update_decision(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateDecisionRequest>,
) -> Result<ApiResponse<DecisionView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, DECISION)?;
    let decisions = state.try_get_slice::<Decisions>()?;
    let record = decisions.service.update(&user, &id, request).await?;
    Ok(ApiResponse::ok("Cập nhật quyết định thành công", record.into()))
}

#[api_handler(
    delete,
    path = "/api/decisions/{id}",
    params(("id" = String, Path, description = "Decision id")),
    responses(
        (status = OK, description = "Decision deleted", body = ApiResponse<DeletedResource>),
        (status = NOT_FOUND, description = "Unknown decision"),
    ),
    security(("bearer" = [])),
    tag = DECISION_TAG,
)]
pub async fn delete_decision(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, DECISION)?;
    let decisions = state.try_get_slice::<Decisions>()?;
    decisions.service.delete(&user, &id).await?;
    Ok(ApiResponse::ok("Xóa quyết định thành công", DeletedResource::new(id)))
}
