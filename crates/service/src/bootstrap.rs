//! First-start seeding of the owner account (id 1).

use chrono::Utc;
use models::{user, Role};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::{debug, info, instrument};

use crate::auth::credentials::hash_password;
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct OwnerSeed {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Insert the owner at id 1 unless a row already holds that id.
///
/// Returns whether a row was written.
#[instrument(skip_all, fields(username = %seed.username))]
pub async fn seed_owner(db: &DatabaseConnection, seed: &OwnerSeed) -> Result<bool, ServiceError> {
    if user::Entity::find_by_id(user::OWNER_ID).one(db).await?.is_some() {
        debug!("owner already present");
        return Ok(false);
    }
    let password = hash_password(&seed.password).map_err(|e| ServiceError::Internal(e.to_string()))?;
    let am = user::ActiveModel {
        id: Set(user::OWNER_ID),
        name: Set(seed.name.clone()),
        username: Set(seed.username.clone()),
        email: Set(seed.email.clone()),
        password: Set(password),
        role: Set(Role::Owner),
        created_at: Set(Utc::now()),
    };
    user::Entity::insert(am).exec(db).await?;
    info!("owner_seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::PaginatorTrait;

    use crate::auth::credentials::verify_password;
    use crate::test_support::get_db;
    use crate::users;

    fn seed() -> OwnerSeed {
        OwnerSeed {
            name: "Owner".into(),
            username: "owner".into(),
            email: "owner@laundry.local".into(),
            password: "owner".into(),
        }
    }

    #[tokio::test]
    async fn seeds_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(seed_owner(&db, &seed()).await?);
        assert!(!seed_owner(&db, &seed()).await?);
        assert_eq!(user::Entity::find().count(&db).await?, 1);

        let owner = users::get_user_by_id(&db, user::OWNER_ID).await?.unwrap();
        assert_eq!(owner.role, Role::Owner);
        assert!(verify_password("owner", &owner.password));
        // the owner is hidden from the staff list
        assert!(users::list_users(&db).await?.is_empty());
        Ok(())
    }
}
