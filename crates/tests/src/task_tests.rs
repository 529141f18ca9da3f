use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn student_task_lifecycle() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s@task.test", "Student", "student", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/task", &student.access_token)
        .json(&serde_json::json!({
            "title": "Request transcript",
            "description": "Ask the registrar",
            "due_date": "2026-11-15T17:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap();
    assert_eq!(task["status"], "todo");

    let resp = app
        .auth_put(&format!("/api/task/{}", task_id), &student.access_token)
        .json(&serde_json::json!({ "status": "done" }))
        .send()
        .await
        .unwrap();
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "done");

    let resp = app
        .auth_get("/api/task?status=done", &student.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], task_id);

    let resp = app
        .auth_delete(&format!("/api/task/{}", task_id), &student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn task_list_is_paginated() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s2@task.test", "Student", "student", "Password123!")
        .await;

    for i in 0..7 {
        let resp = app
            .auth_post("/api/task", &student.access_token)
            .json(&serde_json::json!({ "title": format!("Task {}", i) }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = app
        .auth_get("/api/task?page=2&per_page=3", &student.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 7);
    assert_eq!(page["page"], 2);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn counselor_manages_tasks_through_student_context() {
    let app = TestApp::spawn().await;
    let family = app.seed_family("tasks").await;

    let resp = app
        .auth_post(
            &format!("/api/task?student_id={}", family.student.id),
            &family.counselor.access_token,
        )
        .json(&serde_json::json!({ "title": "Draft activity list" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    // The task belongs to the student, not the counselor.
    let resp = app
        .auth_get("/api/task", &family.student.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["title"], "Draft activity list");
}

#[tokio::test]
async fn parent_cannot_create_tasks_by_default() {
    let app = TestApp::spawn().await;
    let family = app.seed_family("ptasks").await;

    let resp = app
        .auth_post(
            &format!("/api/task?student_id={}", family.student.id),
            &family.parent.access_token,
        )
        .json(&serde_json::json!({ "title": "Nag about essays" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("manageTasks"));
}

#[tokio::test]
async fn widened_parent_permissions_allow_writes() {
    let app = TestApp::spawn().await;
    let family = app.seed_family("widen").await;

    let resp = app
        .patch_permissions(
            &family.student.access_token,
            &family.parent_link_id,
            serde_json::json!({ "manageTasks": true }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_post(
            &format!("/api/task?student_id={}", family.student.id),
            &family.parent.access_token,
        )
        .json(&serde_json::json!({ "title": "Book campus tour" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
}
