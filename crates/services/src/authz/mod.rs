//! The authorization chokepoint. Every data-bearing request resolves its
//! student context here before any query runs.

use bson::{doc, oid::ObjectId};
use mongodb::Database;
use thiserror::Error;
use tracing::debug;

use compass_db::models::{CollaboratorLink, LinkStatus, PermissionKey, Role, User};

use super::dao::base::{BaseDao, DaoError};

#[derive(Debug, Error)]
pub enum AuthzError {
    /// The acting user id does not resolve to an account. Callers have
    /// already verified a session, so this is a stale or forged token.
    #[error("Not signed in")]
    Unauthenticated,
    #[error("Students can only access their own workspace")]
    StudentMismatch,
    #[error("No student selected")]
    NoStudentContext,
    #[error("You do not have access to this student's workspace")]
    NoRelationship,
    #[error("This invitation has not been accepted yet")]
    PendingRelationship,
    #[error("Missing the {0} permission for this student")]
    MissingPermission(PermissionKey),
    #[error(transparent)]
    Dao(#[from] DaoError),
}

impl AuthzError {
    /// HTTP status the denial surfaces as. Sub-reasons only affect the
    /// message and status, never caller control flow.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthzError::Unauthenticated => 401,
            AuthzError::StudentMismatch
            | AuthzError::NoStudentContext
            | AuthzError::NoRelationship
            | AuthzError::PendingRelationship
            | AuthzError::MissingPermission(_) => 403,
            AuthzError::Dao(DaoError::NotFound) => 404,
            AuthzError::Dao(_) => 500,
        }
    }
}

/// Who is asking, and whose data they may touch. Computed per request,
/// never cached: a revoked link must deny on the very next request.
#[derive(Debug, Clone)]
pub struct StudentContext {
    pub target_user_id: ObjectId,
    pub viewer: Viewer,
}

#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub id: ObjectId,
    pub role: Role,
}

pub struct ContextResolver {
    users: BaseDao<User>,
    links: BaseDao<CollaboratorLink>,
}

impl ContextResolver {
    pub fn new(db: &Database) -> Self {
        Self {
            users: BaseDao::new(db, User::COLLECTION),
            links: BaseDao::new(db, CollaboratorLink::COLLECTION),
        }
    }

    /// Resolve the student whose data `actor_user_id` may operate on, and
    /// verify the actor holds `required` for that student.
    ///
    /// Students always target themselves and hold every permission over
    /// their own data; a student naming any other student is denied before
    /// any link lookup, there is no permission that grants it.
    /// Collaborators target the explicitly requested student, falling back
    /// to their stored active student, and must hold an active link whose
    /// permission set grants `required`.
    pub async fn resolve(
        &self,
        actor_user_id: ObjectId,
        requested_student_id: Option<ObjectId>,
        required: PermissionKey,
    ) -> Result<StudentContext, AuthzError> {
        let actor = self
            .users
            .find_one(doc! { "_id": actor_user_id })
            .await?
            .ok_or(AuthzError::Unauthenticated)?;

        let viewer = Viewer {
            id: actor_user_id,
            role: actor.role,
        };

        match actor.role {
            Role::Student => {
                if let Some(requested) = requested_student_id {
                    if requested != actor_user_id {
                        return Err(AuthzError::StudentMismatch);
                    }
                }
                Ok(StudentContext {
                    target_user_id: actor_user_id,
                    viewer,
                })
            }
            Role::Counselor | Role::Parent => {
                let student_id = requested_student_id
                    .or(actor.active_student_id)
                    .ok_or(AuthzError::NoStudentContext)?;

                let link = self
                    .links
                    .find_one(doc! {
                        "student_id": student_id,
                        "collaborator_id": actor_user_id,
                        "status": { "$ne": "revoked" },
                    })
                    .await?
                    .ok_or(AuthzError::NoRelationship)?;

                if link.status != LinkStatus::Active {
                    return Err(AuthzError::PendingRelationship);
                }

                if !link.permissions.get(required) {
                    return Err(AuthzError::MissingPermission(required));
                }

                debug!(
                    actor = %actor_user_id,
                    student = %student_id,
                    permission = %required,
                    "Resolved collaborator context"
                );

                Ok(StudentContext {
                    target_user_id: student_id,
                    viewer,
                })
            }
        }
    }
}
