//! Goods specification repository

use mallctl_core::GoodsSpecification;
use sqlx::{PgConnection, PgPool};

use crate::store::StoreError;

const COLUMNS: &str = "id, goods_id, specification, value, pic_url, add_time, update_time";

pub struct SpecificationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SpecificationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_goods(&self, goods_id: i32) -> Result<Vec<GoodsSpecification>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM mall_goods_specification \
             WHERE goods_id = $1 AND deleted = FALSE ORDER BY id"
        );
        let rows = sqlx::query_as(&sql).bind(goods_id).fetch_all(self.pool).await?;
        Ok(rows)
    }
}

pub(crate) async fn insert(
    conn: &mut PgConnection,
    goods_id: i32,
    spec: &GoodsSpecification,
) -> Result<GoodsSpecification, StoreError> {
    let sql = format!(
        "INSERT INTO mall_goods_specification (goods_id, specification, value, pic_url) \
         VALUES ($1, $2, $3, COALESCE($4, '')) RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as(&sql)
        .bind(goods_id)
        .bind(spec.specification.as_deref())
        .bind(spec.value.as_deref())
        .bind(spec.pic_url.as_deref())
        .fetch_one(conn)
        .await?;
    Ok(row)
}

pub(crate) async fn soft_delete_for_goods(
    conn: &mut PgConnection,
    goods_id: i32,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE mall_goods_specification SET deleted = TRUE, update_time = NOW() \
         WHERE goods_id = $1 AND deleted = FALSE",
    )
    .bind(goods_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
