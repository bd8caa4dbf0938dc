mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn directory_lists_accounts_without_passwords() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    app.employee(&admin, "alice").await?;

    let res = app.get("/api/users", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);
    let users = res.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[0]["full_name"], "alice Tester");
    assert!(users.iter().all(|u| u.get("password").is_none()));
    Ok(())
}

#[tokio::test]
async fn create_user_validation_and_conflict() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;

    let res = app
        .post("/api/users", Some(&admin), json!({ "username": "x", "password": "y" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "All fields required");

    let res = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "x", "password": "y", "fullName": "X", "role": "owner" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Invalid role");

    let res = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "admin", "password": "y", "fullName": "X", "role": "admin" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["error"], "Username already exists");
    Ok(())
}

#[tokio::test]
async fn password_change_takes_effect() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let (id, _) = app.employee(&admin, "alice").await?;

    let res = app
        .put(&format!("/api/users/{}", id), Some(&admin), json!({ "password": "rotated", "role": "bogus" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "User updated successfully");

    app.login("alice", "rotated").await?;
    let res = app
        .post("/api/auth/login", None, json!({ "username": "alice", "password": "password1" }))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/api/users", Some(&admin)).await?;
    assert_eq!(res.body[0]["role"], "employee");
    Ok(())
}

#[tokio::test]
async fn update_user_edge_cases() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let (id, _) = app.employee(&admin, "alice").await?;

    let res = app.put(&format!("/api/users/{}", id), Some(&admin), json!({})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "No fields to update");

    let res = app.put("/api/users/9999", Some(&admin), json!({ "fullName": "Z" })).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "User not found");

    let res = app
        .put(&format!("/api/users/{}", id), Some(&admin), json!({ "username": "admin" }))
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn admin_cannot_delete_self() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let me = app.get("/api/auth/me", Some(&admin)).await?;
    let my_id = me.body["id"].as_i64().unwrap();

    let res = app.delete(&format!("/api/users/{}", my_id), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Cannot delete your own account");
    Ok(())
}

#[tokio::test]
async fn delete_user() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let (id, _) = app.employee(&admin, "alice").await?;

    let res = app.delete(&format!("/api/users/{}", id), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "User deleted successfully");

    let res = app
        .put(&format!("/api/users/{}", id), Some(&admin), json!({ "fullName": "Gone" }))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.delete(&format!("/api/users/{}", id), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleted_user_loses_open_session() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let task = app.task(&admin, "Coding").await?;
    let (id, alice) = app.employee(&admin, "alice").await?;
    assert_eq!(app.get("/api/auth/me", Some(&alice)).await?.status, StatusCode::OK);

    let res = app.delete(&format!("/api/users/{}", id), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/api/auth/me", Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .post(
            "/api/timesheet",
            Some(&alice),
            json!({ "taskId": task, "hoursSpent": 2, "entryDate": "2024-06-03" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn role_change_applies_to_open_session() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let res = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "deputy", "password": "pw", "fullName": "Deputy", "role": "admin" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["id"].as_i64().unwrap();

    let deputy = app.login("deputy", "pw").await?;
    assert_eq!(app.get("/api/users", Some(&deputy)).await?.status, StatusCode::OK);

    let res = app
        .put(&format!("/api/users/{}", id), Some(&admin), json!({ "role": "employee", "fullName": "Demoted" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/api/users", Some(&deputy)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get("/api/auth/me", Some(&deputy)).await?;
    assert_eq!(res.body["role"], "employee");
    assert_eq!(res.body["fullName"], "Demoted");
    Ok(())
}
