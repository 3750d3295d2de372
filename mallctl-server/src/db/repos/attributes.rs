//! Goods attribute repository

use mallctl_core::GoodsAttribute;
use sqlx::{PgConnection, PgPool};

use crate::store::StoreError;

const COLUMNS: &str = "id, goods_id, attribute, value, add_time, update_time";

pub struct AttributeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AttributeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_goods(&self, goods_id: i32) -> Result<Vec<GoodsAttribute>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM mall_goods_attribute \
             WHERE goods_id = $1 AND deleted = FALSE ORDER BY id"
        );
        let rows = sqlx::query_as(&sql).bind(goods_id).fetch_all(self.pool).await?;
        Ok(rows)
    }
}

pub(crate) async fn insert(
    conn: &mut PgConnection,
    goods_id: i32,
    attribute: &GoodsAttribute,
) -> Result<GoodsAttribute, StoreError> {
    let sql = format!(
        "INSERT INTO mall_goods_attribute (goods_id, attribute, value) \
         VALUES ($1, $2, $3) RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as(&sql)
        .bind(goods_id)
        .bind(attribute.attribute.as_deref())
        .bind(attribute.value.as_deref())
        .fetch_one(conn)
        .await?;
    Ok(row)
}

pub(crate) async fn soft_delete_for_goods(
    conn: &mut PgConnection,
    goods_id: i32,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE mall_goods_attribute SET deleted = TRUE, update_time = NOW() \
         WHERE goods_id = $1 AND deleted = FALSE",
    )
    .bind(goods_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
