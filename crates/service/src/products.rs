use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use models::product;
use crate::{errors::ServiceError, write_result::WriteResult};

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub kind: String,
}

pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ServiceError> {
    let products = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(products)
}

pub async fn get_product_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<product::Model>, ServiceError> {
    Ok(product::Entity::find_by_id(id).one(db).await?)
}

/// Current unit price, used to freeze a sale's total.
pub async fn get_product_price(db: &DatabaseConnection, id: i32) -> Result<Option<i64>, ServiceError> {
    let price = product::Entity::find_by_id(id)
        .select_only()
        .column(product::Column::Price)
        .into_tuple::<i64>()
        .one(db)
        .await?;
    Ok(price)
}

pub async fn add_product(db: &DatabaseConnection, new: NewProduct) -> Result<WriteResult, ServiceError> {
    product::validate_price(new.price)?;
    let am = product::ActiveModel {
        name: Set(new.name),
        price: Set(new.price),
        kind: Set(new.kind),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let res = product::Entity::insert(am).exec(db).await?;
    Ok(WriteResult::inserted(res.last_insert_id))
}

/// Replace name, price and type; past sales keep their frozen totals.
pub async fn update_product(db: &DatabaseConnection, id: i32, changes: &NewProduct) -> Result<WriteResult, ServiceError> {
    product::validate_price(changes.price)?;
    let res = product::Entity::update_many()
        .col_expr(product::Column::Name, Expr::value(changes.name.clone()))
        .col_expr(product::Column::Price, Expr::value(changes.price))
        .col_expr(product::Column::Kind, Expr::value(changes.kind.clone()))
        .filter(product::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(WriteResult::affected(res.rows_affected))
}

pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<WriteResult, ServiceError> {
    let res = product::Entity::delete_by_id(id).exec(db).await?;
    Ok(WriteResult::affected(res.rows_affected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn cuci(price: i64) -> NewProduct {
        NewProduct { name: "Cuci Kering".into(), price, kind: "kiloan".into() }
    }

    #[tokio::test]
    async fn product_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let id = add_product(&db, cuci(7000)).await?.last_insert_id.unwrap();
        assert_eq!(get_product_price(&db, id).await?, Some(7000));

        let res = update_product(&db, id, &cuci(8000)).await?;
        assert_eq!(res.rows_affected, 1);
        let found = get_product_by_id(&db, id).await?.unwrap();
        assert_eq!(found.price, 8000);
        assert_eq!(found.kind, "kiloan");
        assert_eq!(list_products(&db).await?.len(), 1);

        assert_eq!(delete_product(&db, id).await?.rows_affected, 1);
        assert_eq!(get_product_price(&db, id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = add_product(&db, cuci(0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        assert!(list_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_id_is_noop() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(update_product(&db, 5, &cuci(100)).await?.is_noop());
        assert!(delete_product(&db, 5).await?.is_noop());
        Ok(())
    }
}
