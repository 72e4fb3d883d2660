//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{RegisterRequest, User, UserUpdate, VALID_ROLES};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY name")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// 空闲服务员：active 的 waiter，且没有被任何桌台占用
    pub async fn find_available_waiters(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE role = 'waiter' AND active = true \
                 AND id NOT IN (SELECT VALUE current_waiter FROM dining_table \
                 WHERE current_waiter != NONE) ORDER BY name",
            )
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Register a new user (email must be free, role must be valid)
    pub async fn register(&self, data: RegisterRequest) -> RepoResult<User> {
        let role = data.role.unwrap_or_else(|| "waiter".to_string());
        if !VALID_ROLES.contains(&role.as_str()) {
            return Err(RepoError::Validation(format!(
                "Invalid role '{}', expected one of: {}",
                role,
                VALID_ROLES.join(", ")
            )));
        }

        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Validation(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            hash_pass,
            role,
            active: true,
            last_login: None,
            created_at: now_millis(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Verify credentials and stamp last_login.
    /// None when the user is unknown, inactive or the password is wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> RepoResult<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        if !user.active || !user.verify_password(password) {
            return Ok(None);
        }

        let thing = user
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("User record has no id".into()))?;
        self.base
            .db()
            .query("UPDATE $thing SET last_login = $now")
            .bind(("thing", thing.clone()))
            .bind(("now", now_millis()))
            .await?;

        self.find_by_id(&thing.to_string()).await
    }

    /// Update a user (admin operation)
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("User record has no id".into()))?;

        if let Some(ref role) = data.role
            && !VALID_ROLES.contains(&role.as_str())
        {
            return Err(RepoError::Validation(format!(
                "Invalid role '{}', expected one of: {}",
                role,
                VALID_ROLES.join(", ")
            )));
        }

        if let Some(ref email) = data.email
            && email != &existing.email
            && self.find_by_email(email).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let hash_pass = match data.password {
            Some(ref password) => User::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            None => existing.hash_pass,
        };

        // id 留空：带字符串 id 的 content 会被目标记录更新拒绝
        let updated = User {
            id: None,
            name: data.name.unwrap_or(existing.name),
            email: data.email.unwrap_or(existing.email),
            hash_pass,
            role: data.role.unwrap_or(existing.role),
            active: data.active.unwrap_or(existing.active),
            last_login: existing.last_login,
            created_at: existing.created_at,
        };

        let result: Option<User> = self.base.db().update(thing).content(updated).await?;
        result.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
