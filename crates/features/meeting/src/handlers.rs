use crate::Meetings;
use crate::model::{CreateMeetingRequest, MeetingFilter, MeetingView, UpdateMeetingRequest};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/meetings",
    params(MeetingFilter),
    responses((status = OK, description = "Meetings", body = ApiResponse<Vec<MeetingView>>)),
    security(("bearer" = [])),
    tag = MEETING_TAG,
)]
pub async fn list_meetings(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiQuery(filter): ApiQuery<MeetingFilter>,
) -> Result<ApiResponse<Vec<MeetingView>>, ApiError> {
    let meetings = state.try_get_slice::<Meetings>()?;
    let records = meetings.service.list(&user, filter).await?;
    Ok(ApiResponse::ok(
        "Lấy danh sách lịch họp thành công",
        records.into_iter().map(MeetingView::from).collect(),
    ))
}

#[api_handler(
    post,
    path = "/api/meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = CREATED, description = "Meeting scheduled", body = ApiResponse<MeetingView>),
        (status = BAD_REQUEST, description = "Invalid time or duration"),
        (status = FORBIDDEN, description = "Not a mentor of the group"),
        (status = CONFLICT, description = "Group or mentor already busy"),
    ),
    security(("bearer" = [])),
    tag = MEETING_TAG,
)]
pub async fn create_meeting(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreateMeetingRequest>,
) -> Result<ApiResponse<MeetingView>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::LECTURER)?;
    let meetings = state.try_get_slice::<Meetings>()?;
    let record = meetings.service.create(&user, request).await?;
    Ok(ApiResponse::created("Tạo lịch họp thành công", record.into()))
}

#[api_handler(
    get,
    path = "/api/meetings/{id}",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = OK, description = "Meeting", body = ApiResponse<MeetingView>),
        (status = NOT_FOUND, description = "Unknown meeting"),
    ),
    security(("bearer" = [])),
    tag = MEETING_TAG,
)]
pub async fn get_meeting(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<MeetingView>, ApiError> {
    let id = ResourceGuard::verify(id, MEETING)?;
    let meetings = state.try_get_slice::<Meetings>()?;
    let record = meetings.service.get(&user, &id).await?;
    Ok(ApiResponse::ok("Lấy thông tin lịch họp thành công", record.into()))
}

#[api_handler(
    put,
    path = "/api/meetings/{id}",
    params(("id" = String, Path, description = "Meeting id")),
    request_body = UpdateMeetingRequest,
    responses(
        (status = OK, description = "Meeting updated", body = ApiResponse<MeetingView>),
        (status = BAD_REQUEST, description = "Meeting already started"),
        (status = CONFLICT, description = "Group or mentor already busy"),
    ),
    security(("bearer" = [])),
    tag = MEETING_TAG,
)]
pub async fn update_meeting(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateMeetingRequest>,
) -> Result<ApiResponse<MeetingView>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::LECTURER)?;
    let id = ResourceGuard::verify(id, MEETING)?;
    let meetings = state.try_get_slice::<Meetings>()?;
    let record = meetings.service.update(&user, &id, request).await?;
    Ok(ApiResponse::ok("Cập nhật lịch họp thành công", record.into()))
}

#[api_handler(
    delete,
    path = "/api/meetings/{id}",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = OK, description = "Meeting cancelled", body = ApiResponse<DeletedResource>),
        (status = BAD_REQUEST, description = "Meeting already started"),
    ),
    security(("bearer" = [])),
    tag = MEETING_TAG,
)]
pub async fn delete_meeting(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::LECTURER)?;
    let id = ResourceGuard::verify(id, MEETING)?;
    let meetings = state.try_get_slice::<Meetings>()?;
    meetings.service.delete(&user, &id).await?;
    Ok(ApiResponse::ok("Hủy lịch họp thành công", DeletedResource::new(id)))
}
