use thesis_database::Database;
use thesis_identity::{
    CreateUserRequest, CurrentUser, IdentityError, UpdateUserRequest, UserFilter, UserRepository,
    UserService,
};
use thesis_kernel::domain::config::BootstrapAdmin;
use thesis_kernel::prelude::Role;

async fn service() -> UserService {
    let db = Database::builder().url("mem://").session("thesis", "identity").init().await.unwrap();
    UserService::new(UserRepository::new(db))
}

fn request(email: &str, name: &str, role: Role) -> CreateUserRequest {
    CreateUserRequest { email: email.into(), full_name: name.into(), role }
}

fn actor(id: &str) -> CurrentUser {
    CurrentUser { id: id.into(), role: Role::Admin, email: "a@uni.vn".into(), full_name: "A".into() }
}

#[tokio::test]
async fn create_normalizes_and_rejects_duplicates() {
    let users = service().await;
    let created = users.create(request(" Lan@Uni.vn ", " Trần  Lan ", Role::Lecturer)).await.unwrap();
    assert_eq!(created.email, "lan@uni.vn");
    assert_eq!(created.full_name, "Trần Lan");
    assert!(created.is_active);

    let err = users.create(request("LAN@uni.vn", "Other", Role::Student)).await.unwrap_err();
    assert!(matches!(err, IdentityError::Conflict { .. }));

    let err = users.create(request("bad", "Other", Role::Student)).await.unwrap_err();
    assert!(matches!(err, IdentityError::Validation { .. }));
}

#[tokio::test]
async fn list_filters_by_role_and_activity() {
    let users = service().await;
    let admin = users.create(request("admin@uni.vn", "Admin", Role::Admin)).await.unwrap();
    let lecturer = users.create(request("l@uni.vn", "Lecturer", Role::Lecturer)).await.unwrap();
    users.create(request("s@uni.vn", "Student", Role::Student)).await.unwrap();

    let lecturers = users
        .list(&UserFilter { role: Some(Role::Lecturer), include_inactive: None })
        .await
        .unwrap();
    assert_eq!(lecturers.len(), 1);

    users.deactivate(&actor(&admin.uid), &lecturer.uid).await.unwrap();
    assert_eq!(users.list(&UserFilter::default()).await.unwrap().len(), 2);
    let all = users
        .list(&UserFilter { role: None, include_inactive: Some(true) })
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn update_and_self_protection() {
    let users = service().await;
    let admin = users.create(request("admin@uni.vn", "Admin", Role::Admin)).await.unwrap();
    let other = users.create(request("x@uni.vn", "X", Role::Student)).await.unwrap();

    let updated = users
        .update(
            &actor(&admin.uid),
            &other.uid,
            UpdateUserRequest { full_name: Some("Nguyễn X".into()), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Nguyễn X");

    let err = users
        .update(
            &actor(&other.uid),
            &other.uid,
            UpdateUserRequest { email: Some("admin@uni.vn".into()), ..Default::default() },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Conflict { .. }));

    let err = users.deactivate(&actor(&admin.uid), &admin.uid).await.unwrap_err();
    assert!(matches!(err, IdentityError::Validation { .. }));

    let err = users.get("missing").await.unwrap_err();
    assert!(matches!(err, IdentityError::NotFound { .. }));
}

#[tokio::test]
async fn require_role_checks_activity_and_role() {
    let users = service().await;
    let admin = users.create(request("admin@uni.vn", "Admin", Role::Admin)).await.unwrap();
    let lecturer = users.create(request("l@uni.vn", "L", Role::Lecturer)).await.unwrap();

    assert!(users.require_role(&lecturer.uid, Role::Lecturer).await.is_ok());
    assert!(matches!(
        users.require_role(&lecturer.uid, Role::Student).await,
        Err(IdentityError::Validation { .. })
    ));

    users.deactivate(&actor(&admin.uid), &lecturer.uid).await.unwrap();
    assert!(matches!(
        users.require_role(&lecturer.uid, Role::Lecturer).await,
        Err(IdentityError::NotFound { .. })
    ));
}

#[tokio::test]
async fn bootstrap_admin_is_created_once() {
    let users = service().await;
    let admin = BootstrapAdmin { email: "root@uni.vn".into(), full_name: "Root".into() };

    assert!(users.ensure_bootstrap_admin(&admin).await.unwrap().is_some());
    assert!(users.ensure_bootstrap_admin(&admin).await.unwrap().is_none());
}
