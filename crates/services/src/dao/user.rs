use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use compass_db::models::{Role, User};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        email: String,
        name: String,
        role: Role,
        password_hash: String,
        intake_year: Option<i32>,
    ) -> DaoResult<User> {
        let email = normalize_email(&email);

        // An invitation may have created a placeholder account for this
        // email already; registering claims it instead of duplicating.
        if let Some(existing) = self.base.find_one(doc! { "email": &email }).await? {
            if existing.password_hash.is_some() {
                return Err(DaoError::DuplicateKey(format!(
                    "An account with email {email} already exists"
                )));
            }
            if existing.role != role {
                return Err(DaoError::Validation(format!(
                    "This email was invited as a {:?}; the role cannot be changed",
                    existing.role
                )));
            }
            let id = existing.id.expect("stored user has an id");
            self.base
                .update_by_id(
                    id,
                    doc! { "$set": {
                        "name": &name,
                        "password_hash": &password_hash,
                        "intake_year": intake_year,
                    }},
                )
                .await?;
            return self.base.find_by_id(id).await;
        }

        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            name,
            role,
            password_hash: Some(password_hash),
            active_student_id: None,
            intake_year,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    /// Account stub for a collaborator invited by email before they have
    /// ever signed in. No password hash until they register.
    pub async fn create_placeholder(&self, email: &str, role: Role) -> DaoResult<User> {
        let email = normalize_email(email);
        let name = email
            .split('@')
            .next()
            .unwrap_or(email.as_str())
            .to_string();

        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            name,
            role,
            password_hash: None,
            active_student_id: None,
            intake_year: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": normalize_email(email) })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn update_profile(
        &self,
        user_id: ObjectId,
        name: Option<String>,
        intake_year: Option<i32>,
    ) -> DaoResult<bool> {
        let mut update = bson::Document::new();
        if let Some(name) = name {
            update.insert("name", name);
        }
        if let Some(year) = intake_year {
            update.insert("intake_year", year);
        }

        if update.is_empty() {
            return Ok(false);
        }

        self.base
            .update_by_id(user_id, doc! { "$set": update })
            .await
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
