use crate::Identity;
use crate::auth::CurrentUser;
use crate::model::{CreateUserRequest, UpdateUserRequest, UserFilter, UserView};
use axum::extract::{Path, State};
use thesis_derive::api_handler;
use thesis_kernel::prelude::*;

#[api_handler(
    get,
    path = "/api/me",
    responses(
        (status = OK, description = "Current account", body = ApiResponse<UserView>),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub async fn me(
    State(state): State<ApiState>,
    user: CurrentUser,
) -> Result<ApiResponse<UserView>, ApiError> {
    let identity = state.try_get_slice::<Identity>()?;
    let record = identity.users.get(&user.id).await?;
    Ok(ApiResponse::ok("Lấy thông tin tài khoản thành công", record.into()))
}

#[api_handler(
    get,
    path = "/api/users",
    params(UserFilter),
    responses((status = OK, description = "Users", body = ApiResponse<Vec<UserView>>)),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub async fn list_users(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> Result<ApiResponse<Vec<UserView>>, ApiError> {
    user.require(RoleSet::STAFF)?;
    let identity = state.try_get_slice::<Identity>()?;
    let users = identity.users.list(&filter).await?;
    Ok(ApiResponse::ok(
        "Lấy danh sách người dùng thành công",
        users.into_iter().map(UserView::from).collect(),
    ))
}

#[api_handler(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = CREATED, description = "User created", body = ApiResponse<UserView>),
        (status = BAD_REQUEST, description = "Invalid input"),
        (status = CONFLICT, description = "Email already used"),
    ),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub async fn create_user(
    State(state): State<ApiState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<ApiResponse<UserView>, ApiError> {
    user.require(RoleSet::ADMIN)?;
    let identity = state.try_get_slice::<Identity>()?;
    let created = identity.users.create(request).await?;
    Ok(ApiResponse::created("Tạo người dùng thành công", created.into()))
}

#[api_handler(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = OK, description = "User", body = ApiResponse<UserView>),
        (status = NOT_FOUND, description = "Unknown user"),
    ),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub async fn get_user(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserView>, ApiError> {
    if user.id != id {
        user.require(RoleSet::STAFF)?;
    }
    let id = ResourceGuard::verify(id, USER)?;
    let identity = state.try_get_slice::<Identity>()?;
    let record = identity.users.get(&id).await?;
    Ok(ApiResponse::ok("Lấy thông tin người dùng thành công", record.into()))
}

#[api_handler(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = OK, description = "User updated", body = ApiResponse<UserView>),
        (status = BAD_REQUEST, description = "Invalid input"),
        (status = NOT_FOUND, description = "Unknown user"),
        (status = CONFLICT, description = "Email already used"),
    ),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub async fn update_user(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<ApiResponse<UserView>, ApiError> {
    user.require(RoleSet::ADMIN)?;
    let id = ResourceGuard::verify(id, USER)?;
    let identity = state.try_get_slice::<Identity>()?;
    let updated = identity.users.update(&user, &id, request).await?;
    Ok(ApiResponse::ok("Cập nhật người dùng thành công", updated.into()))
}

#[api_handler(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = OK, description = "User deactivated", body = ApiResponse<DeletedResource>),
        (status = NOT_FOUND, description = "Unknown user"),
    ),
    security(("bearer" = [])),
    tag = IDENTITY_TAG,
)]
pub async fn deactivate_user(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedResource>, ApiError> {
    user.require(RoleSet::ADMIN)?;
    let id = ResourceGuard::verify(id, USER)?;
    let identity = state.try_get_slice::<Identity>()?;
    identity.users.deactivate(&user, &id).await?;
    Ok(ApiResponse::ok("Vô hiệu hóa người dùng thành công", DeletedResource::new(id)))
}
