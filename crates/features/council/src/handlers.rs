use crate::Councils;
use crate::model::{
    AddCouncilMemberRequest, AssignGroupRequest, CouncilFilter, CouncilView, CreateCouncilRequest,
    UpdateCouncilRequest,
};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/councils",
    params(CouncilFilter),
    responses((status = OK, description = "Councils", body = ApiResponse<Vec<CouncilView>>)),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn list_councils(
    State(state): State<ApiState>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<CouncilFilter>,
) -> Result<ApiResponse<Vec<CouncilView>>, ApiError> {
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.list(filter).await?;
    Ok(ApiResponse::ok(
        "Lấy danh sách hội đồng thành công",
        details.into_iter().map(CouncilView::from).collect(),
    ))
}

#[api_handler(
    post,
    path = "/api/councils",
    request_body = CreateCouncilRequest,
    responses(
        (status = CREATED, description = "Council created", body = ApiResponse<CouncilView>),
        (status = BAD_REQUEST, description = "Invalid input"),
        (status = NOT_FOUND, description = "Unknown period"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn create_council(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreateCouncilRequest>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.create(&user, request).await?;
    Ok(ApiResponse::created("Tạo hội đồng thành công", details.into()))
}

#[api_handler(
    get,
    path = "/api/councils/{id}",
    params(("id" = String, Path, description = "Council id")),
    responses(
        (status = OK, description = "Council", body = ApiResponse<CouncilView>),
        (status = NOT_FOUND, description = "Unknown council"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn get_council(
    State(state): State<ApiState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.get(&id).await?;
    Ok(ApiResponse::ok("Lấy thông tin hội đồng thành công", details.into()))
}

#[api_handler(
    put,
    path = "/api/councils/{id}",
    params(("id" = String, Path, description = "Council id")),
    request_body = UpdateCouncilRequest,
    responses(
        (status = OK, description = "Council updated", body = ApiResponse<CouncilView>),
        (status = BAD_REQUEST, description = "Invalid input or completed council"),
        (status = NOT_FOUND, description = "Unknown council"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn update_council(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateCouncilRequest>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.update(&user, &id, request).await?;
    Ok(ApiResponse::ok("Cập nhật hội đồng thành công", details.into()))
}

#[api_handler(
    delete,
    path = "/api/councils/{id}",
    params(("id" = String, Path, description = "Council id")),
    responses(
        (status = OK, description = "Council deleted", body = ApiResponse<DeletedResource>),
        (status = NOT_FOUND, description = "Unknown council"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn delete_council(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let councils = state.try_get_slice::<Councils>()?;
    councils.service.delete(&user, &id).await?;
    Ok(ApiResponse::ok("Xóa hội đồng thành công", DeletedResource::new(id)))
}

#[api_handler(
    post,
    path = "/api/councils/{id}/members",
    params(("id" = String, Path, description = "Council id")),
    request_body = AddCouncilMemberRequest,
    responses(
        (status = OK, description = "Member added", body = ApiResponse<CouncilView>),
        (status = CONFLICT, description = "Seat taken, council full or lecturer load reached"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn add_council_member(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AddCouncilMemberRequest>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.add_member(&user, &id, request).await?;
    Ok(ApiResponse::ok("Thêm thành viên hội đồng thành công", details.into()))
}

#[api_handler(
    delete,
    path = "/api/councils/{id}/members/{lecturer_id}",
    params(
        ("id" = String, Path, description = "Council id"),
        ("lecturer_id" = String, Path, description = "Lecturer id"),
    ),
    responses(
        (status = OK, description = "Member removed", body = ApiResponse<CouncilView>),
        (status = NOT_FOUND, description = "Not a member"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn remove_council_member(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path((id, lecturer_id)): Path<(String, String)>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let lecturer_id = ResourceGuard::verify(lecturer_id, USER)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.remove_member(&user, &id, &lecturer_id).await?;
    Ok(ApiResponse::ok("Xóa thành viên hội đồng thành công", details.into()))
}

#[api_handler(
    post,
    path = "/api/councils/{id}/assignments",
    params(("id" = String, Path, description = "Council id")),
    request_body = AssignGroupRequest,
    responses(
        (status = OK, description = "Group assigned", body = ApiResponse<CouncilView>),
        (status = BAD_REQUEST, description = "Council incomplete or slot outside its window"),
        (status = CONFLICT, description = "Slot clash, mentor conflict or group already assigned"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn assign_group(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AssignGroupRequest>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.assign_group(&user, &id, request).await?;
    Ok(ApiResponse::ok("Phân nhóm cho hội đồng thành công", details.into()))
}

#[api_handler(
    delete,
    path = "/api/councils/{id}/assignments/{group_id}",
    params(
        ("id" = String, Path, description = "Council id"),
        ("group_id" = String, Path, description = "Group id"),
    ),
    responses(
        (status = OK, description = "Group removed", body = ApiResponse<CouncilView>),
        (status = NOT_FOUND, description = "Group not assigned"),
    ),
    security(("bearer" = [])),
    tag = COUNCIL_TAG,
)]
pub async fn unassign_group(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path((id, group_id)): Path<(String, String)>,
) -> Result<ApiResponse<CouncilView>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let id = ResourceGuard::verify(id, COUNCIL)?;
    let group_id = ResourceGuard::verify(group_id, GROUP)?;
    let councils = state.try_get_slice::<Councils>()?;
    let details = councils.service.unassign_group(&user, &id, &group_id).await?;
    Ok(ApiResponse::ok("Gỡ nhóm khỏi hội đồng thành công", details.into()))
}
