use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn document_metadata_lifecycle() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("s@doc.test", "Student", "student", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/document", &student.access_token)
        .json(&serde_json::json!({
            "name": "Junior year transcript",
            "doc_type": "transcript",
            "url": "https://drive.example.com/transcript.pdf",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let document: Value = resp.json().await.unwrap();
    let document_id = document["id"].as_str().unwrap();
    assert_eq!(document["doc_type"], "transcript");

    let resp = app
        .auth_put(
            &format!("/api/document/{}", document_id),
            &student.access_token,
        )
        .json(&serde_json::json!({ "notes": "Final version" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_delete(
            &format!("/api/document/{}", document_id),
            &student.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn parent_reads_documents_but_cannot_manage_them() {
    let app = TestApp::spawn().await;
    let family = app.seed_family("docs").await;

    app.auth_post("/api/document", &family.student.access_token)
        .json(&serde_json::json!({
            "name": "SAT score report",
            "doc_type": "test_score",
        }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            &format!("/api/document?student_id={}", family.student.id),
            &family.parent.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let documents: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(documents.len(), 1);

    let resp = app
        .auth_post(
            &format!("/api/document?student_id={}", family.student.id),
            &family.parent.access_token,
        )
        .json(&serde_json::json!({ "name": "Report card" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("manageDocuments"));
}
