//! Goods repository
//!
//! Reads go through the pool; writes take a connection so the store can
//! run them inside its transaction.

use mallctl_core::{Goods, GoodsQuery, Page};
use sqlx::{PgConnection, PgPool};

use crate::db::map_conflict;
use crate::store::StoreError;

const COLUMNS: &str = "id, goods_sn, name, category_id, brand_id, gallery, keywords, brief, \
     is_on_sale, sort_order, pic_url, share_url, is_new, is_hot, unit, counter_price, \
     retail_price, detail, add_time, update_time";

/// Goods repository
pub struct GoodsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> GoodsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of live goods matching the query.
    ///
    /// Sort column and direction come from a whitelist, so they are
    /// spliced into the statement; filter values are bound.
    pub async fn list(&self, query: &GoodsQuery) -> Result<Page<Goods>, StoreError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM mall_goods
            WHERE deleted = FALSE
              AND ($1::text IS NULL OR goods_sn = $1)
              AND ($2::text IS NULL OR strpos(lower(name), lower($2)) > 0)
            "#,
        )
        .bind(query.goods_sn.as_deref())
        .bind(query.name.as_deref())
        .fetch_one(self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM mall_goods
            WHERE deleted = FALSE
              AND ($1::text IS NULL OR goods_sn = $1)
              AND ($2::text IS NULL OR strpos(lower(name), lower($2)) > 0)
            ORDER BY {} {}, id {}
            LIMIT $3 OFFSET $4
            "#,
            query.sort.column(),
            query.order.keyword(),
            query.order.keyword(),
        );

        let items: Vec<Goods> = sqlx::query_as(&sql)
            .bind(query.goods_sn.as_deref())
            .bind(query.name.as_deref())
            .bind(i64::from(query.limit))
            .bind(query.offset() as i64)
            .fetch_all(self.pool)
            .await?;

        Ok(Page::new(items, total, query))
    }

    pub async fn find(&self, id: i32) -> Result<Option<Goods>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM mall_goods WHERE id = $1 AND deleted = FALSE");
        let goods = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(goods)
    }

    pub async fn name_exists(&self, name: &str) -> Result<bool, StoreError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM mall_goods WHERE name = $1 AND deleted = FALSE)",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(exists.0)
    }
}

/// Insert a goods row; absent fields take the column defaults.
pub(crate) async fn insert(conn: &mut PgConnection, goods: &Goods) -> Result<Goods, StoreError> {
    let sql = format!(
        r#"
        INSERT INTO mall_goods (
            goods_sn, name, category_id, brand_id, gallery, keywords, brief,
            is_on_sale, sort_order, pic_url, share_url, is_new, is_hot, unit,
            counter_price, retail_price, detail
        )
        VALUES (
            $1, $2, COALESCE($3, 0), COALESCE($4, 0), COALESCE($5, '{{}}'::text[]),
            COALESCE($6, ''), COALESCE($7, ''), COALESCE($8, TRUE), COALESCE($9, 100),
            COALESCE($10, ''), COALESCE($11, ''), COALESCE($12, FALSE), COALESCE($13, FALSE),
            COALESCE($14, ''), COALESCE($15, 0), COALESCE($16, 0), COALESCE($17, '')
        )
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as(&sql)
        .bind(goods.goods_sn.as_deref())
        .bind(goods.name.as_deref())
        .bind(goods.category_id)
        .bind(goods.brand_id)
        .bind(goods.gallery.as_deref())
        .bind(goods.keywords.as_deref())
        .bind(goods.brief.as_deref())
        .bind(goods.is_on_sale)
        .bind(goods.sort_order)
        .bind(goods.pic_url.as_deref())
        .bind(goods.share_url.as_deref())
        .bind(goods.is_new)
        .bind(goods.is_hot)
        .bind(goods.unit.as_deref())
        .bind(goods.counter_price)
        .bind(goods.retail_price)
        .bind(goods.detail.as_deref())
        .fetch_one(conn)
        .await
        .map_err(map_conflict)
}

/// Overwrite supplied fields of a live goods row. `share_url` is always
/// written. Returns `None` when no live row has this id.
pub(crate) async fn update(
    conn: &mut PgConnection,
    id: i32,
    goods: &Goods,
    share_url: &str,
) -> Result<Option<Goods>, StoreError> {
    let sql = format!(
        r#"
        UPDATE mall_goods SET
            goods_sn = COALESCE($2, goods_sn),
            name = COALESCE($3, name),
            category_id = COALESCE($4, category_id),
            brand_id = COALESCE($5, brand_id),
            gallery = COALESCE($6, gallery),
            keywords = COALESCE($7, keywords),
            brief = COALESCE($8, brief),
            is_on_sale = COALESCE($9, is_on_sale),
            sort_order = COALESCE($10, sort_order),
            pic_url = COALESCE($11, pic_url),
            share_url = $12,
            is_new = COALESCE($13, is_new),
            is_hot = COALESCE($14, is_hot),
            unit = COALESCE($15, unit),
            counter_price = COALESCE($16, counter_price),
            retail_price = COALESCE($17, retail_price),
            detail = COALESCE($18, detail),
            update_time = NOW()
        WHERE id = $1 AND deleted = FALSE
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as(&sql)
        .bind(id)
        .bind(goods.goods_sn.as_deref())
        .bind(goods.name.as_deref())
        .bind(goods.category_id)
        .bind(goods.brand_id)
        .bind(goods.gallery.as_deref())
        .bind(goods.keywords.as_deref())
        .bind(goods.brief.as_deref())
        .bind(goods.is_on_sale)
        .bind(goods.sort_order)
        .bind(goods.pic_url.as_deref())
        .bind(share_url)
        .bind(goods.is_new)
        .bind(goods.is_hot)
        .bind(goods.unit.as_deref())
        .bind(goods.counter_price)
        .bind(goods.retail_price)
        .bind(goods.detail.as_deref())
        .fetch_optional(conn)
        .await
        .map_err(map_conflict)
}

pub(crate) async fn set_share_url(
    conn: &mut PgConnection,
    id: i32,
    share_url: &str,
) -> Result<Goods, StoreError> {
    let sql = format!(
        "UPDATE mall_goods SET share_url = $2, update_time = NOW() \
         WHERE id = $1 AND deleted = FALSE RETURNING {COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(id)
        .bind(share_url)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| StoreError::goods_not_found(id))
}

/// Soft-delete; returns the number of rows flagged.
pub(crate) async fn soft_delete(conn: &mut PgConnection, id: i32) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE mall_goods SET deleted = TRUE, update_time = NOW() WHERE id = $1 AND deleted = FALSE",
    )
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
