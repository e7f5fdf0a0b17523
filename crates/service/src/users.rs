use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, UpdateMany,
};

use models::{user, Role};
use crate::{errors::ServiceError, write_result::WriteResult};

/// Fields of a new account; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Full replacement of the editable profile fields.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Every account except the owner, oldest first.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    let users = user::Entity::find()
        .filter(user::Column::Id.ne(user::OWNER_ID))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;
    Ok(users)
}

pub async fn get_user_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<user::Model>, ServiceError> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_user_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<user::Model>, ServiceError> {
    let found = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    Ok(found)
}

/// Insert an account; a duplicate username or email surfaces as `Conflict`.
pub async fn add_user(db: &DatabaseConnection, new: NewUser) -> Result<WriteResult, ServiceError> {
    user::validate_username(&new.username)?;
    user::validate_email(&new.email)?;
    let am = user::ActiveModel {
        name: Set(new.name),
        username: Set(new.username),
        email: Set(new.email),
        password: Set(new.password_hash),
        role: Set(new.role),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let res = user::Entity::insert(am).exec(db).await?;
    Ok(WriteResult::inserted(res.last_insert_id))
}

fn set_profile(query: UpdateMany<user::Entity>, changes: &UserChanges) -> UpdateMany<user::Entity> {
    query
        .col_expr(user::Column::Name, Expr::value(changes.name.clone()))
        .col_expr(user::Column::Username, Expr::value(changes.username.clone()))
        .col_expr(user::Column::Email, Expr::value(changes.email.clone()))
        .col_expr(user::Column::Password, Expr::value(changes.password_hash.clone()))
}

/// Self-service edit; the role column is never touched.
pub async fn update_profile(db: &DatabaseConnection, id: i32, changes: &UserChanges) -> Result<WriteResult, ServiceError> {
    user::validate_username(&changes.username)?;
    user::validate_email(&changes.email)?;
    let res = set_profile(user::Entity::update_many(), changes)
        .filter(user::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(WriteResult::affected(res.rows_affected))
}

/// Owner edit of any account, optionally reassigning the role.
pub async fn owner_update_user(
    db: &DatabaseConnection,
    id: i32,
    changes: &UserChanges,
    role: Option<Role>,
) -> Result<WriteResult, ServiceError> {
    user::validate_username(&changes.username)?;
    user::validate_email(&changes.email)?;
    let mut query = set_profile(user::Entity::update_many(), changes);
    if let Some(role) = role {
        query = query.col_expr(user::Column::Role, Expr::value(role.as_str()));
    }
    let res = query.filter(user::Column::Id.eq(id)).exec(db).await?;
    Ok(WriteResult::affected(res.rows_affected))
}

pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<WriteResult, ServiceError> {
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    Ok(WriteResult::affected(res.rows_affected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::PaginatorTrait;

    use crate::test_support::{get_db, seed_user};

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            name: "Budi".into(),
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: Role::User,
        }
    }

    fn changes(username: &str) -> UserChanges {
        UserChanges {
            name: "Budi Santoso".into(),
            username: username.into(),
            email: format!("{username}@laundry.test"),
            password_hash: "hash2".into(),
        }
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_user(&db, "owner", Role::Owner).await?;
        assert_eq!(owner, user::OWNER_ID);

        let res = add_user(&db, new_user("budi", "budi@laundry.test")).await?;
        let id = res.last_insert_id.unwrap();
        assert_eq!(res.rows_affected, 1);

        let listed = list_users(&db).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(user::Entity::find().count(&db).await?, 2);

        let found = find_user_by_username(&db, "budi").await?.unwrap();
        assert_eq!(found.email, "budi@laundry.test");

        let res = update_profile(&db, id, &changes("budi2")).await?;
        assert_eq!(res.rows_affected, 1);
        let updated = get_user_by_id(&db, id).await?.unwrap();
        assert_eq!(updated.username, "budi2");
        assert_eq!(updated.role, Role::User);

        let res = delete_user(&db, id).await?;
        assert_eq!(res.rows_affected, 1);
        assert!(get_user_by_id(&db, id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        add_user(&db, new_user("budi", "budi@laundry.test")).await?;
        let err = add_user(&db, new_user("budi", "other@laundry.test")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn owner_update_changes_role() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "owner", Role::Owner).await?;
        let id = seed_user(&db, "siti", Role::User).await?;
        owner_update_user(&db, id, &changes("siti"), Some(Role::Admin)).await?;
        assert_eq!(get_user_by_id(&db, id).await?.unwrap().role, Role::Admin);

        owner_update_user(&db, id, &changes("siti"), None).await?;
        assert_eq!(get_user_by_id(&db, id).await?.unwrap().role, Role::Admin);
        Ok(())
    }

    #[tokio::test]
    async fn missing_ids_affect_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(update_profile(&db, 99, &changes("ghost")).await?.is_noop());
        assert!(owner_update_user(&db, 99, &changes("ghost"), Some(Role::Admin)).await?.is_noop());
        assert!(delete_user(&db, 99).await?.is_noop());
        Ok(())
    }
}
