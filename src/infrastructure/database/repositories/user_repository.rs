use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let message = e.to_string();
    message.contains("UNIQUE") || message.contains("duplicate")
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        let active = user::ActiveModel {
            username: Set(new_user.username.clone()),
            password_hash: Set(new_user.password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict(format!("username '{}'", new_user.username))
            } else {
                DomainError::from(e)
            }
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "$2b$12$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = SeaOrmUserRepository::new(test_connection().await);

        let created = repo.create(new_user("alice")).await.unwrap();
        assert_eq!(created.username, "alice");

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_id(created.id).await.unwrap().is_some());
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create(new_user("alice")).await.unwrap();

        let err = repo.create(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)), "{err}");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_hash_is_stored_in_password_hash_column() {
        use sea_orm::{ConnectionTrait, Statement};

        let db = test_connection().await;
        let repo = SeaOrmUserRepository::new(db.clone());
        repo.create(new_user("alice")).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT password_hash FROM users WHERE username = 'alice'",
            ))
            .await
            .unwrap()
            .unwrap();
        let hash: String = row.try_get("", "password_hash").unwrap();
        assert_eq!(hash, "$2b$12$hash");
    }
}
