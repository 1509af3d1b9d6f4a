use crate::Topics;
use crate::model::{
    CreateTopicRequest, ReviewTopicRequest, TopicFilter, TopicValidation, TopicView,
    UpdateTopicRequest, ValidateTopicRequest,
};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/topics",
    params(TopicFilter),
    responses((status = OK, description = "Topics", body = ApiResponse<Vec<TopicView>>)),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn list_topics(
    State(state): State<ApiState>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<TopicFilter>,
) -> Result<ApiResponse<Vec<TopicView>>, ApiError> {
    let topics = state.try_get_slice::<Topics>()?;
    let records = topics.service.list(filter).await?;
    Ok(ApiResponse::ok(
        "Lấy danh sách đề tài thành công",
        records.into_iter().map(TopicView::from).collect(),
    ))
}

#[api_handler(
    post,
    path = "/api/topics",
    request_body = CreateTopicRequest,
    responses(
        (status = CREATED, description = "Topic registered", body = ApiResponse<TopicView>),
        (status = BAD_REQUEST, description = "Invalid input or inactive period"),
        (status = CONFLICT, description = "Duplicate title or mentor quota reached"),
    ),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn create_topic(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreateTopicRequest>,
) -> Result<ApiResponse<TopicView>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::LECTURER)?;
    let topics = state.try_get_slice::<Topics>()?;
    let record = topics.service.create(&user, request).await?;
    Ok(ApiResponse::created("Đăng ký đề tài thành công", record.into()))
}

#[api_handler(
    post,
    path = "/api/topics/validate",
    request_body = ValidateTopicRequest,
    responses((status = OK, description = "Similarity check", body = ApiResponse<TopicValidation>)),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn validate_topic(
    State(state): State<ApiState>,
    _user: CurrentUser,
    ApiJson(request): ApiJson<ValidateTopicRequest>,
) -> Result<ApiResponse<TopicValidation>, ApiError> {
    let topics = state.try_get_slice::<Topics>()?;
    let result = topics.service.validate(&request)?;
    Ok(ApiResponse::ok("Kiểm tra đề tài thành công", result))
}

#[api_handler(
    get,
    path = "/api/topics/{id}",
    params(("id" = String, Path, description = "Topic id")),
    responses(
        (status = OK, description = "Topic", body = ApiResponse<TopicView>),
        (status = NOT_FOUND, description = "Unknown topic"),
    ),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn get_topic(
    State(state): State<ApiState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<TopicView>, ApiError> {
    let id = ResourceGuard::verify(id, TOPIC)?;
    let topics = state.try_get_slice::<Topics>()?;
    let record = topics.service.get(&id).await?;
    Ok(ApiResponse::ok("Lấy thông tin đề tài thành công", record.into()))
}

#[api_handler(
    put,
    path = "/api/topics/{id}",
    params(("id" = String, Path, description = "Topic id")),
    request_body = UpdateTopicRequest,
    responses(
        (status = OK, description = "Topic updated", body = ApiResponse<TopicView>),
        (status = BAD_REQUEST, description = "Invalid input or approved topic"),
        (status = FORBIDDEN, description = "Not the creator, main mentor or staff"),
        (status = NOT_FOUND, description = "Unknown topic"),
    ),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn update_topic(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTopicRequest>,
) -> Result<ApiResponse<TopicView>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::LECTURER)?;
    let id = ResourceGuard::verify(id, TOPIC)?;
    let topics = state.try_get_slice::<Topics>()?;
    let record = topics.service.update(&user, &id, request).await?;
    Ok(ApiResponse::ok("Cập nhật đề tài thành công", record.into()))
}

#[api_handler(
    delete,
    path = "/api/topics/{id}",
    params(("id" = String, Path, description = "Topic id")),
    responses(
        (status = OK, description = "Topic deleted", body = ApiResponse<DeletedResource>),
        (status = NOT_FOUND, description = "Unknown topic"),
        (status = CONFLICT, description = "Topic assigned to a group"),
    ),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn delete_topic(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::LECTURER)?;
    let id = ResourceGuard::verify(id, TOPIC)?;
    let topics = state.try_get_slice::<Topics>()?;
    topics.service.delete(&user, &id).await?;
    Ok(ApiResponse::ok("Xóa đề tài thành công", DeletedResource::new(id)))
}

#[api_handler(
    post,
    path = "/api/topics/{id}/review",
    params(("id" = String, Path, description = "Topic id")),
    request_body = ReviewTopicRequest,
    responses(
        (status = OK, description = "Topic reviewed", body = ApiResponse<TopicView>),
        (status = BAD_REQUEST, description = "Invalid outcome or missing note"),
        (status = NOT_FOUND, description = "Unknown topic"),
    ),
    security(("bearer" = [])),
    tag = TOPIC_TAG,
)]
pub async fn review_topic(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ReviewTopicRequest>,
) -> Result<ApiResponse<TopicView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, TOPIC)?;
    let topics = state.try_get_slice::<Topics>()?;
    let record = topics.service.review(&user, &id, request).await?;
    Ok(ApiResponse::ok("Duyệt đề tài thành công", record.into()))
}
