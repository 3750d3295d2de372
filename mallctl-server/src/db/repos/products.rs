//! Goods product (variant) repository
//!
//! Replaced products are only flagged deleted, so order and cart rows that
//! still carry their ids can resolve them by id.

use mallctl_core::GoodsProduct;
use sqlx::{PgConnection, PgPool};

use crate::store::StoreError;

const COLUMNS: &str = "id, goods_id, specifications, price, number, url, add_time, update_time";

pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_goods(&self, goods_id: i32) -> Result<Vec<GoodsProduct>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM mall_goods_product \
             WHERE goods_id = $1 AND deleted = FALSE ORDER BY id"
        );
        let rows = sqlx::query_as(&sql).bind(goods_id).fetch_all(self.pool).await?;
        Ok(rows)
    }
}

pub(crate) async fn insert(
    conn: &mut PgConnection,
    goods_id: i32,
    product: &GoodsProduct,
) -> Result<GoodsProduct, StoreError> {
    let sql = format!(
        "INSERT INTO mall_goods_product (goods_id, specifications, price, number, url) \
         VALUES ($1, $2, $3, $4, COALESCE($5, '')) RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as(&sql)
        .bind(goods_id)
        .bind(product.specifications.as_deref())
        .bind(product.price)
        .bind(product.number)
        .bind(product.url.as_deref())
        .fetch_one(conn)
        .await?;
    Ok(row)
}

pub(crate) async fn soft_delete_for_goods(
    conn: &mut PgConnection,
    goods_id: i32,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE mall_goods_product SET deleted = TRUE, update_time = NOW() \
         WHERE goods_id = $1 AND deleted = FALSE",
    )
    .bind(goods_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
