use crate::Groups;
use crate::model::{
    AddMemberRequest, AddMentorRequest, AssignTopicRequest, ChangeLeaderRequest,
    CreateGroupRequest, GroupFilter, GroupView,
};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/groups",
    params(GroupFilter),
    responses((status = OK, description = "Groups", body = ApiResponse<Vec<GroupView>>)),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn list_groups(
    State(state): State<ApiState>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<GroupFilter>,
) -> Result<ApiResponse<Vec<GroupView>>, ApiError> {
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.list(filter).await?;
    Ok(ApiResponse::ok(
        "Lấy danh sách nhóm thành công",
        details.into_iter().map(GroupView::from).collect(),
    ))
}

#[api_handler(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = CREATED, description = "Group created", body = ApiResponse<GroupView>),
        (status = CONFLICT, description = "Student already in a group"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn create_group(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreateGroupRequest>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    user.require(RoleSet::STAFF | RoleSet::STUDENT)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.create(&user, request).await?;
    Ok(ApiResponse::created("Tạo nhóm thành công", details.into()))
}

#[api_handler(
    get,
    path = "/api/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = OK, description = "Group", body = ApiResponse<GroupView>),
        (status = NOT_FOUND, description = "Unknown group"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn get_group(
    State(state): State<ApiState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    let id = ResourceGuard::verify(id, GROUP)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.get(&id).await?;
    Ok(ApiResponse::ok("Lấy thông tin nhóm thành công", details.into()))
}

#[api_handler(
    delete,
    path = "/api/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = OK, description = "Group deleted", body = ApiResponse<DeletedResource>),
        (status = NOT_FOUND, description = "Unknown group"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn delete_group(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, GROUP)?;
    let groups = state.try_get_slice::<Groups>()?;
    groups.service.delete(&user, &id).await?;
    Ok(ApiResponse::ok("Xóa nhóm thành công", DeletedResource::new(id)))
}

#[api_handler(
    post,
    path = "/api/groups/{id}/members",
    params(("id" = String, Path, description = "Group id")),
    request_body = AddMemberRequest,
    responses(
        (status = OK, description = "Member added", body = ApiResponse<GroupView>),
        (status = CONFLICT, description = "Group full or student already grouped"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn add_member(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AddMemberRequest>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    let id = ResourceGuard::verify(id, GROUP)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.add_member(&user, &id, request).await?;
    Ok(ApiResponse::ok("Thêm thành viên thành công", details.into()))
}

#[api_handler(
    delete,
    path = "/api/groups/{id}/members/{student_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("student_id" = String, Path, description = "Student id"),
    ),
    responses(
        (status = OK, description = "Member removed", body = ApiResponse<GroupView>),
        (status = BAD_REQUEST, description = "Group would fall below its minimum size"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn remove_member(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    let id = ResourceGuard::verify(id, GROUP)?;
    let student_id = ResourceGuard::verify(student_id, USER)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.remove_member(&user, &id, &student_id).await?;
    Ok(ApiResponse::ok("Xóa thành viên thành công", details.into()))
}

#[api_handler(
    put,
    path = "/api/groups/{id}/leader",
    params(("id" = String, Path, description = "Group id")),
    request_body = ChangeLeaderRequest,
    responses(
        (status = OK, description = "Leader changed", body = ApiResponse<GroupView>),
        (status = BAD_REQUEST, description = "Target is not a member"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn change_leader(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ChangeLeaderRequest>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    let id = ResourceGuard::verify(id, GROUP)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.change_leader(&user, &id, request).await?;
    Ok(ApiResponse::ok("Đổi trưởng nhóm thành công", details.into()))
}

#[api_handler(
    post,
    path = "/api/groups/{id}/mentors",
    params(("id" = String, Path, description = "Group id")),
    request_body = AddMentorRequest,
    responses(
        (status = OK, description = "Mentor assigned", body = ApiResponse<GroupView>),
        (status = CONFLICT, description = "Seat taken or mentor load reached"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn add_mentor(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AddMentorRequest>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, GROUP)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.add_mentor(&user, &id, request).await?;
    Ok(ApiResponse::ok("Phân công giảng viên hướng dẫn thành công", details.into()))
}

#[api_handler(
    delete,
    path = "/api/groups/{id}/mentors/{mentor_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("mentor_id" = String, Path, description = "Lecturer id"),
    ),
    responses(
        (status = OK, description = "Mentor removed", body = ApiResponse<GroupView>),
        (status = BAD_REQUEST, description = "Main mentor of a topic-bearing group"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn remove_mentor(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path((id, mentor_id)): Path<(String, String)>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, GROUP)?;
    let mentor_id = ResourceGuard::verify(mentor_id, USER)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.remove_mentor(&user, &id, &mentor_id).await?;
    Ok(ApiResponse::ok("Gỡ giảng viên hướng dẫn thành công", details.into()))
}

#[api_handler(
    put,
    path = "/api/groups/{id}/topic",
    params(("id" = String, Path, description = "Group id")),
    request_body = AssignTopicRequest,
    responses(
        (status = OK, description = "Topic assigned", body = ApiResponse<GroupView>),
        (status = BAD_REQUEST, description = "Topic not approved or group size out of range"),
        (status = CONFLICT, description = "Topic taken by another group"),
    ),
    security(("bearer" = [])),
    tag = GROUP_TAG,
)]
pub async fn assign_topic(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AssignTopicRequest>,
) -> Result<ApiResponse<GroupView>, ApiError> {
    let id = ResourceGuard::verify(id, GROUP)?;
    let groups = state.try_get_slice::<Groups>()?;
    let details = groups.service.assign_topic(&user, &id, request).await?;
    Ok(ApiResponse::ok("Gán đề tài cho nhóm thành công", details.into()))
}
