use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn register_creates_user_and_returns_tokens() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "alice@test.com",
            "name": "Alice",
            "role": "student",
            "password": "Password123!",
            "intake_year": 2027,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["email"], "alice@test.com");
    assert_eq!(json["user"]["name"], "Alice");
    assert_eq!(json["user"]["role"], "student");
    assert_eq!(json["user"]["intake_year"], 2027);
}

#[tokio::test]
async fn register_duplicate_email_fails() {
    let app = TestApp::spawn().await;

    let body = serde_json::json!({
        "email": "dup@test.com",
        "name": "User 1",
        "role": "student",
        "password": "Password123!",
    });

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "dup@test.com",
            "name": "User 2",
            "role": "student",
            "password": "Password456!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn register_with_invalid_email_fails_validation() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "not-an-email",
            "name": "Nobody",
            "role": "student",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let app = TestApp::spawn().await;
    app.register_user("carol@test.com", "Carol", "student", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "carol@test.com",
            "password": "WrongPassword!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_rotates_tokens() {
    let app = TestApp::spawn().await;
    let user = app
        .register_user("dave@test.com", "Dave", "student", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": user.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["email"], "dave@test.com");
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/auth/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn registering_claims_a_placeholder_invite_account() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("erin@test.com", "Erin", "student", "Password123!")
        .await;

    // Inviting an unknown email creates a placeholder counselor account.
    app.invite_collaborator(&student.access_token, "coach@test.com", "counselor")
        .await;

    // The counselor registers later with the same email and keeps the role.
    let counselor = app
        .register_user("coach@test.com", "Coach", "counselor", "Password123!")
        .await;

    let resp = app
        .auth_get("/api/auth/me", &counselor.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["role"], "counselor");
    assert_eq!(json["name"], "Coach");
}

#[tokio::test]
async fn placeholder_role_cannot_be_changed_at_registration() {
    let app = TestApp::spawn().await;
    let student = app
        .register_user("frank@test.com", "Frank", "student", "Password123!")
        .await;

    app.invite_collaborator(&student.access_token, "mom@test.com", "parent")
        .await;

    // The invited email tries to register as a student.
    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "mom@test.com",
            "name": "Mom",
            "role": "student",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
