use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use compass_db::models::{
    CollaboratorLink, LinkStatus, PermissionPatch, PermissionSet, Relationship, Role,
};

use super::base::{BaseDao, DaoError, DaoResult};
use super::user::{UserDao, normalize_email};

/// Link lifecycle operations. Management calls are always made by the
/// owning student; `accept` is the one collaborator-side transition.
pub struct CollaborationDao {
    pub base: BaseDao<CollaboratorLink>,
    pub users: UserDao,
}

impl CollaborationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, CollaboratorLink::COLLECTION),
            users: UserDao::new(db),
        }
    }

    /// Invite a collaborator by email. Resolves the collaborator account or
    /// creates a placeholder, then creates a pending link seeded with the
    /// relationship's default permissions.
    pub async fn create_link(
        &self,
        student_id: ObjectId,
        collaborator_email: &str,
        relationship: Relationship,
    ) -> DaoResult<CollaboratorLink> {
        let email = normalize_email(collaborator_email);
        let expected_role = match relationship {
            Relationship::Counselor => Role::Counselor,
            Relationship::Parent => Role::Parent,
        };

        let collaborator = match self.users.base.find_one(doc! { "email": &email }).await? {
            Some(user) => {
                if user.role != expected_role {
                    return Err(DaoError::Validation(format!(
                        "{email} is registered as a {:?} and cannot be invited as a {:?}",
                        user.role, expected_role
                    )));
                }
                user
            }
            None => self.users.create_placeholder(&email, expected_role).await?,
        };

        let collaborator_id = collaborator.id.expect("stored user has an id");
        if collaborator_id == student_id {
            return Err(DaoError::Validation(
                "You cannot invite yourself as a collaborator".to_string(),
            ));
        }

        // One non-revoked link per (student, collaborator) pair.
        let existing = self
            .base
            .find_one(doc! {
                "student_id": student_id,
                "collaborator_id": collaborator_id,
                "status": { "$ne": "revoked" },
            })
            .await?;
        if existing.is_some() {
            return Err(DaoError::DuplicateKey(format!(
                "A collaboration link with {email} already exists"
            )));
        }

        let now = DateTime::now();
        let link = CollaboratorLink {
            id: None,
            student_id,
            collaborator_id,
            relationship,
            status: LinkStatus::Pending,
            permissions: PermissionSet::defaults_for(relationship),
            invited_email: email,
            accepted_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&link).await?;
        self.base.find_by_id(id).await
    }

    /// The collaborator accepts a pending invite. Accepting an already
    /// active link is a no-op; a revoked link can never be accepted.
    pub async fn accept_link(
        &self,
        link_id: ObjectId,
        collaborator_id: ObjectId,
    ) -> DaoResult<CollaboratorLink> {
        let link = self.base.find_by_id(link_id).await?;
        if link.collaborator_id != collaborator_id {
            return Err(DaoError::Forbidden(
                "Only the invited collaborator may accept this invite".to_string(),
            ));
        }

        match link.status {
            LinkStatus::Active => Ok(link),
            LinkStatus::Revoked => Err(DaoError::Forbidden(
                "This invitation has been revoked".to_string(),
            )),
            LinkStatus::Pending => {
                self.base
                    .update_by_id(
                        link_id,
                        doc! { "$set": {
                            "status": "active",
                            "accepted_at": DateTime::now(),
                        }},
                    )
                    .await?;
                self.base.find_by_id(link_id).await
            }
        }
    }

    /// Merge a permission patch into the stored set. Owner-only.
    pub async fn update_permissions(
        &self,
        link_id: ObjectId,
        student_id: ObjectId,
        patch: &PermissionPatch,
    ) -> DaoResult<CollaboratorLink> {
        let link = self.owned_link(link_id, student_id).await?;
        if link.status == LinkStatus::Revoked {
            return Err(DaoError::Validation(
                "Cannot update permissions on a revoked link".to_string(),
            ));
        }

        let mut permissions = link.permissions;
        permissions.apply(patch);

        self.base
            .update_by_id(
                link_id,
                doc! { "$set": { "permissions": bson::to_bson(&permissions)? } },
            )
            .await?;
        self.base.find_by_id(link_id).await
    }

    /// Revoke a link. Idempotent: revoking a revoked link is a no-op.
    pub async fn revoke_link(&self, link_id: ObjectId, student_id: ObjectId) -> DaoResult<()> {
        let link = self.owned_link(link_id, student_id).await?;
        if link.status == LinkStatus::Revoked {
            return Ok(());
        }

        self.base
            .update_by_id(link_id, doc! { "$set": { "status": "revoked" } })
            .await?;
        Ok(())
    }

    /// Remember the collaborator's last-selected student. Requires a
    /// non-revoked link to that student.
    pub async fn set_active_student(
        &self,
        collaborator_id: ObjectId,
        student_id: ObjectId,
    ) -> DaoResult<()> {
        let link = self
            .base
            .find_one(doc! {
                "student_id": student_id,
                "collaborator_id": collaborator_id,
                "status": { "$ne": "revoked" },
            })
            .await?;
        if link.is_none() {
            return Err(DaoError::Forbidden(
                "You do not have access to this student's workspace".to_string(),
            ));
        }

        let result = self
            .users
            .base
            .collection()
            .update_one(
                doc! { "_id": collaborator_id },
                doc! { "$set": {
                    "active_student_id": student_id,
                    "updated_at": DateTime::now(),
                }},
            )
            .await?;
        if result.matched_count == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    /// All links owned by a student, newest first. Includes revoked links
    /// so the management view can show history.
    pub async fn links_for_student(&self, student_id: ObjectId) -> DaoResult<Vec<CollaboratorLink>> {
        self.base
            .find_many(
                doc! { "student_id": student_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn pending_for_collaborator(
        &self,
        collaborator_id: ObjectId,
    ) -> DaoResult<Vec<CollaboratorLink>> {
        self.base
            .find_many(
                doc! { "collaborator_id": collaborator_id, "status": "pending" },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn active_for_collaborator(
        &self,
        collaborator_id: ObjectId,
    ) -> DaoResult<Vec<CollaboratorLink>> {
        self.base
            .find_many(
                doc! { "collaborator_id": collaborator_id, "status": "active" },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    async fn owned_link(
        &self,
        link_id: ObjectId,
        student_id: ObjectId,
    ) -> DaoResult<CollaboratorLink> {
        let link = self.base.find_by_id(link_id).await?;
        if link.student_id != student_id {
            return Err(DaoError::Forbidden(
                "Only the owning student may manage this link".to_string(),
            ));
        }
        Ok(link)
    }
}
