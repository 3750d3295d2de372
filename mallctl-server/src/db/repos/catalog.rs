//! Category and brand lookups (read-only)

use mallctl_core::{Brand, Category};
use sqlx::PgPool;

use crate::store::StoreError;

const CATEGORY_COLUMNS: &str = "id, name, keywords, description, pid, icon_url, pic_url, level, \
     sort_order, add_time, update_time";

const BRAND_COLUMNS: &str =
    "id, name, description, pic_url, sort_order, floor_price, add_time, update_time";

pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Category>, StoreError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM mall_category WHERE id = $1 AND deleted = FALSE"
        );
        let row = sqlx::query_as(&sql).bind(id).fetch_optional(self.pool).await?;
        Ok(row)
    }

    /// Live categories of one level, `sort_order` then `id` ascending.
    pub async fn list_level(&self, level: &str) -> Result<Vec<Category>, StoreError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM mall_category \
             WHERE level = $1 AND deleted = FALSE ORDER BY sort_order, id"
        );
        let rows = sqlx::query_as(&sql).bind(level).fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Live categories that hang under some parent, whatever their level.
    pub async fn list_children(&self) -> Result<Vec<Category>, StoreError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM mall_category \
             WHERE pid <> 0 AND deleted = FALSE ORDER BY sort_order, id"
        );
        let rows = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(rows)
    }
}

pub struct BrandRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Brand>, StoreError> {
        let sql = format!("SELECT {BRAND_COLUMNS} FROM mall_brand WHERE id = $1 AND deleted = FALSE");
        let row = sqlx::query_as(&sql).bind(id).fetch_optional(self.pool).await?;
        Ok(row)
    }

    pub async fn list(&self) -> Result<Vec<Brand>, StoreError> {
        let sql = format!(
            "SELECT {BRAND_COLUMNS} FROM mall_brand WHERE deleted = FALSE ORDER BY sort_order, id"
        );
        let rows = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(rows)
    }
}
