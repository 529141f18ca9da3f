use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn student_crud_on_own_colleges() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s@college.test", "Student", "student", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/college", &student.access_token)
        .json(&serde_json::json!({
            "name": "Harvard",
            "location": "Cambridge, MA",
            "deadline": "2027-01-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let college: Value = resp.json().await.unwrap();
    let college_id = college["id"].as_str().unwrap();
    assert_eq!(college["status"], "considering");

    let resp = app
        .auth_put(
            &format!("/api/college/{}", college_id),
            &student.access_token,
        )
        .json(&serde_json::json!({ "status": "applying", "notes": "Early action" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "applying");
    assert_eq!(updated["notes"], "Early action");

    let resp = app
        .auth_delete(
            &format!("/api/college/{}", college_id),
            &student.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/college/{}", college_id),
            &student.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn parent_can_read_but_not_write_colleges() {
    let app = TestApp::spawn().await;
    let family = app.seed_family("harvard").await;

    // Student adds Harvard with a deadline.
    let resp = app
        .auth_post("/api/college", &family.student.access_token)
        .json(&serde_json::json!({
            "name": "Harvard",
            "deadline": "2027-01-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    let college: Value = resp.json().await.unwrap();
    let college_id = college["id"].as_str().unwrap();

    // Parent reads it through the student context.
    let resp = app
        .auth_get(
            &format!("/api/college?student_id={}", family.student.id),
            &family.parent.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let colleges: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(colleges.len(), 1);
    assert_eq!(colleges[0]["name"], "Harvard");

    // Default parent permissions deny writes, naming the capability.
    let resp = app
        .auth_put(
            &format!(
                "/api/college/{}?student_id={}",
                college_id, family.student.id
            ),
            &family.parent.access_token,
        )
        .json(&serde_json::json!({ "status": "applying" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = resp.json().await.unwrap();
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("manageColleges"),
        "message should name the missing capability: {body}"
    );

    // Counselor defaults do allow the same write.
    let resp = app
        .auth_put(
            &format!(
                "/api/college/{}?student_id={}",
                college_id, family.student.id
            ),
            &family.counselor.access_token,
        )
        .json(&serde_json::json!({ "status": "applying" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn colleges_are_scoped_to_the_target_student() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice@college.test", "Alice", "student", "Password123!")
        .await;
    let bob = app
        .register_user("bob@college.test", "Bob", "student", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/college", &alice.access_token)
        .json(&serde_json::json!({ "name": "Oberlin" }))
        .send()
        .await
        .unwrap();
    let college: Value = resp.json().await.unwrap();
    let college_id = college["id"].as_str().unwrap();

    // Bob sees an empty list and cannot fetch Alice's college by id.
    let resp = app
        .auth_get("/api/college", &bob.access_token)
        .send()
        .await
        .unwrap();
    let colleges: Vec<Value> = resp.json().await.unwrap();
    assert!(colleges.is_empty());

    let resp = app
        .auth_get(&format!("/api/college/{}", college_id), &bob.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // Naming Alice as student context is rejected outright for a student.
    let resp = app
        .auth_get(
            &format!("/api/college?student_id={}", alice.id),
            &bob.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn create_requires_a_name() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s2@college.test", "Student", "student", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/college", &student.access_token)
        .json(&serde_json::json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
