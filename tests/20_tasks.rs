mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn admin_creates_task_with_defaults() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;

    let res = app
        .post("/api/tasks", Some(&admin), json!({ "taskName": "Design", "estimatedHours": 12.5 }))
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["taskName"], "Design");
    assert_eq!(res.body["estimatedHours"], 12.5);
    assert_eq!(res.body["status"], "active");
    assert_eq!(res.body["description"], "");
    assert_eq!(res.body["message"], "Task created successfully");

    let res = app.get("/api/tasks", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body[0]["task_name"], "Design");
    assert_eq!(res.body[0]["estimated_hours"], 12.5);
    Ok(())
}

#[tokio::test]
async fn employees_can_list_tasks() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    app.task(&admin, "Support").await?;
    let (_, employee) = app.employee(&admin, "alice").await?;

    let res = app.get("/api/tasks", Some(&employee)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn create_validates_input() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;

    let res = app.post("/api/tasks", Some(&admin), json!({ "description": "no name" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Task name required");

    let res = app
        .post("/api/tasks", Some(&admin), json!({ "taskName": "X", "estimatedHours": -3 }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post("/api/tasks", Some(&admin), json!({ "taskName": "X", "status": "archived" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_other_fields() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let res = app
        .post(
            "/api/tasks",
            Some(&admin),
            json!({ "taskName": "Ops", "description": "on call", "estimatedHours": 4 }),
        )
        .await?;
    let id = res.body["id"].as_i64().unwrap();

    let res = app
        .put(&format!("/api/tasks/{}", id), Some(&admin), json!({ "status": "inactive" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Task updated successfully");

    let res = app.get("/api/tasks", Some(&admin)).await?;
    let task = &res.body[0];
    assert_eq!(task["status"], "inactive");
    assert_eq!(task["description"], "on call");
    assert_eq!(task["estimated_hours"], 4.0);
    Ok(())
}

#[tokio::test]
async fn update_edge_cases() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let id = app.task(&admin, "Ops").await?;

    let res = app.put(&format!("/api/tasks/{}", id), Some(&admin), json!({})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "No fields to update");

    let res = app.put("/api/tasks/9999", Some(&admin), json!({ "taskName": "Y" })).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "Task not found");

    let res = app.put("/api/tasks/abc", Some(&admin), json!({ "taskName": "Y" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_task() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let id = app.task(&admin, "Temp").await?;

    let res = app.delete(&format!("/api/tasks/{}", id), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Task deleted successfully");

    let res = app.delete(&format!("/api/tasks/{}", id), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_a_task_orphans_its_entries() -> Result<()> {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await?;
    let task = app.task(&admin, "Retired").await?;
    let (_, alice) = app.employee(&admin, "alice").await?;
    app.entry(&alice, task, 3.0, "2024-06-03").await?;

    let res = app.delete(&format!("/api/tasks/{}", task), Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM timesheet_entries WHERE task_id = ?")
        .bind(task)
        .fetch_one(app.state.db.pool())
        .await?;
    assert_eq!(rows, 1);

    let res = app.get("/api/timesheet", Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().map(Vec::len), Some(0));

    let res = app.get("/api/timesheet/analytics", Some(&admin)).await?;
    assert_eq!(res.body["hoursByTask"].as_array().map(Vec::len), Some(0));
    assert_eq!(res.body["summary"]["total_entries"], 1);
    Ok(())
}
