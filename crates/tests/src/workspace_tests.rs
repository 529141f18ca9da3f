use crate::fixtures::test_app::TestApp;
use serde_json::Value;

async fn seed_some_data(app: &TestApp, student_token: &str) {
    app.auth_post("/api/college", student_token)
        .json(&serde_json::json!({
            "name": "Harvard",
            "deadline": "2027-01-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap();

    app.auth_post("/api/task", student_token)
        .json(&serde_json::json!({
            "title": "Request transcript",
            "due_date": "2026-11-15T17:00:00Z",
        }))
        .send()
        .await
        .unwrap();

    app.auth_post("/api/essay", student_token)
        .json(&serde_json::json!({ "title": "Personal statement", "content": "Draft." }))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn student_workspace_has_every_section() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s@ws.test", "Student", "student", "Password123!")
        .await;
    seed_some_data(&app, &student.access_token).await;

    let resp = app
        .auth_get("/api/workspace", &student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let ws: Value = resp.json().await.unwrap();
    assert_eq!(ws["student_id"], student.id);
    assert_eq!(ws["tasks"]["total"], 1);
    assert_eq!(ws["tasks"]["todo"], 1);
    assert_eq!(ws["colleges"]["total"], 1);
    assert_eq!(ws["colleges"]["upcoming_deadlines"][0]["name"], "Harvard");
    assert_eq!(ws["essays"]["drafts"], 1);
    assert!(ws["scholarships"].is_object());
}

#[tokio::test]
async fn sections_without_view_permission_are_omitted() {
    let app = TestApp::spawn().await;
    let family = app.seed_family("ws").await;
    seed_some_data(&app, &family.student.access_token).await;

    let resp = app
        .patch_permissions(
            &family.student.access_token,
            &family.parent_link_id,
            serde_json::json!({ "viewEssays": false, "viewScholarships": false }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/workspace?student_id={}", family.student.id),
            &family.parent.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let ws: Value = resp.json().await.unwrap();
    assert!(ws["tasks"].is_object());
    assert!(ws["colleges"].is_object());
    assert!(ws.get("essays").is_none());
    assert!(ws.get("scholarships").is_none());
}

#[tokio::test]
async fn workspace_without_any_relationship_is_denied() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s2@ws.test", "Student", "student", "Password123!")
        .await;
    let outsider = app
        .register_user("c2@ws.test", "Outsider", "counselor", "Password123!")
        .await;

    let resp = app
        .auth_get(
            &format!("/api/workspace?student_id={}", student.id),
            &outsider.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
