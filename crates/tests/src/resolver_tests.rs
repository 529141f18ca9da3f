//! Service-level tests for the student context resolver.

use bson::oid::ObjectId;
use compass_db::models::{PermissionKey, Relationship, Role};
use compass_services::authz::{AuthzError, ContextResolver};
use compass_services::dao::{collaboration::CollaborationDao, user::UserDao};

use crate::fixtures::test_app::TestApp;

struct ResolverHarness {
    resolver: ContextResolver,
    users: UserDao,
    collaborations: CollaborationDao,
}

impl ResolverHarness {
    fn new(app: &TestApp) -> Self {
        Self {
            resolver: ContextResolver::new(&app.db),
            users: UserDao::new(&app.db),
            collaborations: CollaborationDao::new(&app.db),
        }
    }

    async fn student(&self, email: &str) -> ObjectId {
        self.users
            .create(
                email.to_string(),
                "Student".to_string(),
                Role::Student,
                "hash".to_string(),
                Some(2027),
            )
            .await
            .unwrap()
            .id
            .unwrap()
    }

    async fn collaborator(&self, email: &str, role: Role) -> ObjectId {
        self.users
            .create(
                email.to_string(),
                "Collaborator".to_string(),
                role,
                "hash".to_string(),
                None,
            )
            .await
            .unwrap()
            .id
            .unwrap()
    }

    /// Invite + accept, returning the link id.
    async fn active_link(
        &self,
        student_id: ObjectId,
        collaborator_id: ObjectId,
        email: &str,
        relationship: Relationship,
    ) -> ObjectId {
        let link = self
            .collaborations
            .create_link(student_id, email, relationship)
            .await
            .unwrap();
        let link_id = link.id.unwrap();
        self.collaborations
            .accept_link(link_id, collaborator_id)
            .await
            .unwrap();
        link_id
    }
}

#[tokio::test]
async fn student_self_access_is_unconditional() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("self@resolver.test").await;

    for key in PermissionKey::ALL {
        let ctx = h.resolver.resolve(student_id, None, key).await.unwrap();
        assert_eq!(ctx.target_user_id, student_id);
        assert_eq!(ctx.viewer.id, student_id);

        // Explicitly naming their own id behaves identically.
        let ctx = h
            .resolver
            .resolve(student_id, Some(student_id), key)
            .await
            .unwrap();
        assert_eq!(ctx.target_user_id, student_id);
    }
}

#[tokio::test]
async fn student_can_never_target_another_student() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let alice = h.student("alice@resolver.test").await;
    let bob = h.student("bob@resolver.test").await;

    for key in PermissionKey::ALL {
        let err = h.resolver.resolve(alice, Some(bob), key).await.unwrap_err();
        assert!(matches!(err, AuthzError::StudentMismatch), "got {err:?}");
        assert_eq!(err.status_code(), 403);
    }
}

#[tokio::test]
async fn student_mismatch_wins_over_any_stored_link() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let alice = h.student("alice2@resolver.test").await;
    let bob = h.student("bob2@resolver.test").await;

    // Force a link document naming a student as collaborator; the
    // role boundary must still deny before any link lookup.
    let now = bson::DateTime::now();
    let rogue = compass_db::models::CollaboratorLink {
        id: None,
        student_id: bob,
        collaborator_id: alice,
        relationship: Relationship::Counselor,
        status: compass_db::models::LinkStatus::Active,
        permissions: compass_db::models::PermissionSet::all(),
        invited_email: "alice2@resolver.test".to_string(),
        accepted_at: Some(now),
        created_at: now,
        updated_at: now,
    };
    h.collaborations.base.insert_one(&rogue).await.unwrap();

    let err = h
        .resolver
        .resolve(alice, Some(bob), PermissionKey::ViewTasks)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::StudentMismatch));
}

#[tokio::test]
async fn counselor_permissions_are_checked_per_operation() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s3@resolver.test").await;
    let counselor_id = h.collaborator("c3@resolver.test", Role::Counselor).await;
    let link_id = h
        .active_link(
            student_id,
            counselor_id,
            "c3@resolver.test",
            Relationship::Counselor,
        )
        .await;

    // Narrow the default full grant: keep viewTasks, drop manageTasks.
    let patch: compass_db::models::PermissionPatch =
        serde_json::from_str(r#"{"manageTasks": false}"#).unwrap();
    h.collaborations
        .update_permissions(link_id, student_id, &patch)
        .await
        .unwrap();

    let ctx = h
        .resolver
        .resolve(counselor_id, Some(student_id), PermissionKey::ViewTasks)
        .await
        .unwrap();
    assert_eq!(ctx.target_user_id, student_id);
    assert_eq!(ctx.viewer.role, Role::Counselor);

    let err = h
        .resolver
        .resolve(counselor_id, Some(student_id), PermissionKey::ManageTasks)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthzError::MissingPermission(PermissionKey::ManageTasks)
    ));
    assert!(err.to_string().contains("manageTasks"));
}

#[tokio::test]
async fn pending_link_grants_nothing() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s4@resolver.test").await;
    let counselor_id = h.collaborator("c4@resolver.test", Role::Counselor).await;

    // Invited but never accepted. Default counselor permissions are all
    // true, which must not matter.
    h.collaborations
        .create_link(student_id, "c4@resolver.test", Relationship::Counselor)
        .await
        .unwrap();

    for key in PermissionKey::ALL {
        let err = h
            .resolver
            .resolve(counselor_id, Some(student_id), key)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::PendingRelationship), "got {err:?}");
    }
}

#[tokio::test]
async fn revoked_link_grants_nothing_despite_stored_flags() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s5@resolver.test").await;
    let counselor_id = h.collaborator("c5@resolver.test", Role::Counselor).await;
    let link_id = h
        .active_link(
            student_id,
            counselor_id,
            "c5@resolver.test",
            Relationship::Counselor,
        )
        .await;

    h.collaborations
        .revoke_link(link_id, student_id)
        .await
        .unwrap();

    // Permission flags are still all-true in the stored document.
    let stored = h.collaborations.base.find_by_id(link_id).await.unwrap();
    assert!(stored.permissions.view_tasks);

    for key in PermissionKey::ALL {
        let err = h
            .resolver
            .resolve(counselor_id, Some(student_id), key)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::NoRelationship), "got {err:?}");
    }
}

#[tokio::test]
async fn revoking_twice_is_a_no_op() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s6@resolver.test").await;
    let counselor_id = h.collaborator("c6@resolver.test", Role::Counselor).await;
    let link_id = h
        .active_link(
            student_id,
            counselor_id,
            "c6@resolver.test",
            Relationship::Counselor,
        )
        .await;

    h.collaborations
        .revoke_link(link_id, student_id)
        .await
        .unwrap();
    h.collaborations
        .revoke_link(link_id, student_id)
        .await
        .unwrap();

    let stored = h.collaborations.base.find_by_id(link_id).await.unwrap();
    assert_eq!(stored.status, compass_db::models::LinkStatus::Revoked);
}

#[tokio::test]
async fn collaborator_without_context_is_denied_not_guessed() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let s1 = h.student("s7a@resolver.test").await;
    let s2 = h.student("s7b@resolver.test").await;
    let counselor_id = h.collaborator("c7@resolver.test", Role::Counselor).await;

    // Two active links, no explicit student, no stored active student:
    // the resolver must refuse rather than pick one.
    h.active_link(s1, counselor_id, "c7@resolver.test", Relationship::Counselor)
        .await;
    let link = h
        .collaborations
        .create_link(s2, "c7@resolver.test", Relationship::Counselor)
        .await
        .unwrap();
    h.collaborations
        .accept_link(link.id.unwrap(), counselor_id)
        .await
        .unwrap();

    let err = h
        .resolver
        .resolve(counselor_id, None, PermissionKey::ViewTasks)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::NoStudentContext));
}

#[tokio::test]
async fn stored_active_student_is_the_fallback_context() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s8@resolver.test").await;
    let counselor_id = h.collaborator("c8@resolver.test", Role::Counselor).await;
    h.active_link(
        student_id,
        counselor_id,
        "c8@resolver.test",
        Relationship::Counselor,
    )
    .await;

    h.collaborations
        .set_active_student(counselor_id, student_id)
        .await
        .unwrap();

    let ctx = h
        .resolver
        .resolve(counselor_id, None, PermissionKey::ViewEssays)
        .await
        .unwrap();
    assert_eq!(ctx.target_user_id, student_id);
}

#[tokio::test]
async fn collaborator_without_link_is_denied() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s9@resolver.test").await;
    let parent_id = h.collaborator("p9@resolver.test", Role::Parent).await;

    let err = h
        .resolver
        .resolve(parent_id, Some(student_id), PermissionKey::ViewTasks)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::NoRelationship));
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn unknown_actor_is_unauthenticated() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);

    let err = h
        .resolver
        .resolve(ObjectId::new(), None, PermissionKey::ViewTasks)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::Unauthenticated));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn parent_defaults_deny_writes() {
    let app = TestApp::spawn().await;
    let h = ResolverHarness::new(&app);
    let student_id = h.student("s10@resolver.test").await;
    let parent_id = h.collaborator("p10@resolver.test", Role::Parent).await;
    h.active_link(
        student_id,
        parent_id,
        "p10@resolver.test",
        Relationship::Parent,
    )
    .await;

    for key in [
        PermissionKey::ViewColleges,
        PermissionKey::ViewTasks,
        PermissionKey::ViewEssays,
        PermissionKey::ViewDocuments,
        PermissionKey::ViewScholarships,
    ] {
        assert!(
            h.resolver
                .resolve(parent_id, Some(student_id), key)
                .await
                .is_ok(),
            "parent default should grant {key}"
        );
    }

    for key in [
        PermissionKey::ManageColleges,
        PermissionKey::ManageTasks,
        PermissionKey::ManageEssays,
        PermissionKey::ManageDocuments,
        PermissionKey::ManageScholarships,
    ] {
        let err = h
            .resolver
            .resolve(parent_id, Some(student_id), key)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::MissingPermission(_)), "got {err:?}");
    }
}
