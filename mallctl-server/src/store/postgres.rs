//! Postgres-backed goods store

use async_trait::async_trait;
use mallctl_core::{
    Brand, Category, Goods, GoodsAllinone, GoodsAttribute, GoodsProduct, GoodsQuery,
    GoodsSpecification, Page,
};
use sqlx::{PgConnection, PgPool};

use super::{GoodsStore, StoreError, StoreResult};
use crate::db::repos::{
    attributes, goods, products, specifications, AttributeRepo, BrandRepo, CategoryRepo,
    GoodsRepo, ProductRepo, SpecificationRepo,
};
use crate::share::ShareImage;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Insert every child row of the graph under `goods_id`.
async fn insert_children(
    conn: &mut PgConnection,
    goods_id: i32,
    graph: &GoodsAllinone,
) -> StoreResult<()> {
    for spec in &graph.specifications {
        specifications::insert(&mut *conn, goods_id, spec).await?;
    }
    for attribute in &graph.attributes {
        attributes::insert(&mut *conn, goods_id, attribute).await?;
    }
    for product in &graph.products {
        products::insert(&mut *conn, goods_id, product).await?;
    }
    Ok(())
}

#[async_trait]
impl GoodsStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_goods(&self, query: &GoodsQuery) -> StoreResult<Page<Goods>> {
        GoodsRepo::new(&self.pool).list(query).await
    }

    async fn find_goods(&self, id: i32) -> StoreResult<Option<Goods>> {
        GoodsRepo::new(&self.pool).find(id).await
    }

    async fn goods_name_exists(&self, name: &str) -> StoreResult<bool> {
        GoodsRepo::new(&self.pool).name_exists(name).await
    }

    async fn find_category(&self, id: i32) -> StoreResult<Option<Category>> {
        CategoryRepo::new(&self.pool).find(id).await
    }

    async fn find_brand(&self, id: i32) -> StoreResult<Option<Brand>> {
        BrandRepo::new(&self.pool).find(id).await
    }

    async fn list_l1_categories(&self) -> StoreResult<Vec<Category>> {
        CategoryRepo::new(&self.pool).list_level("L1").await
    }

    async fn list_child_categories(&self) -> StoreResult<Vec<Category>> {
        CategoryRepo::new(&self.pool).list_children().await
    }

    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        BrandRepo::new(&self.pool).list().await
    }

    async fn list_specifications(&self, goods_id: i32) -> StoreResult<Vec<GoodsSpecification>> {
        SpecificationRepo::new(&self.pool).list_for_goods(goods_id).await
    }

    async fn list_attributes(&self, goods_id: i32) -> StoreResult<Vec<GoodsAttribute>> {
        AttributeRepo::new(&self.pool).list_for_goods(goods_id).await
    }

    async fn list_products(&self, goods_id: i32) -> StoreResult<Vec<GoodsProduct>> {
        ProductRepo::new(&self.pool).list_for_goods(goods_id).await
    }

    async fn create_goods(
        &self,
        graph: &GoodsAllinone,
        share: &dyn ShareImage,
    ) -> StoreResult<Goods> {
        let mut tx = self.pool.begin().await?;

        let mut created = goods::insert(&mut *tx, &graph.goods).await?;
        let id = created.id.ok_or(StoreError::Sqlx(sqlx::Error::RowNotFound))?;

        let share_url = share.share_url(
            id,
            created.pic_url.as_deref().unwrap_or_default(),
            created.name.as_deref().unwrap_or_default(),
        );
        if let Some(url) = share_url.filter(|u| !u.is_empty()) {
            created = goods::set_share_url(&mut *tx, id, &url).await?;
        }

        insert_children(&mut *tx, id, graph).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn replace_goods(
        &self,
        id: i32,
        graph: &GoodsAllinone,
        share_url: &str,
    ) -> StoreResult<Goods> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` without commit rolls back
        let updated = goods::update(&mut *tx, id, &graph.goods, share_url)
            .await?
            .ok_or_else(|| StoreError::goods_not_found(id))?;

        let specs = specifications::soft_delete_for_goods(&mut *tx, id).await?;
        let attrs = attributes::soft_delete_for_goods(&mut *tx, id).await?;
        let prods = products::soft_delete_for_goods(&mut *tx, id).await?;
        tracing::debug!(goods_id = id, specs, attrs, prods, "retired child rows");

        insert_children(&mut *tx, id, graph).await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_goods(&self, id: i32) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let flagged = goods::soft_delete(&mut *tx, id).await?;
        specifications::soft_delete_for_goods(&mut *tx, id).await?;
        attributes::soft_delete_for_goods(&mut *tx, id).await?;
        products::soft_delete_for_goods(&mut *tx, id).await?;

        tx.commit().await?;
        if flagged == 0 {
            tracing::debug!(goods_id = id, "delete matched no live goods");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::{NoShareImage, TemplateShareImage};
    use rust_decimal::Decimal;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p mallctl-server -- --ignored

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        PgStore::new(pool)
    }

    fn graph(name: &str) -> GoodsAllinone {
        GoodsAllinone {
            goods: Goods {
                name: Some(name.to_owned()),
                goods_sn: Some(format!("SN-{name}")),
                ..Goods::default()
            },
            specifications: vec![GoodsSpecification {
                specification: Some("Color".into()),
                value: Some("Red".into()),
                ..GoodsSpecification::default()
            }],
            attributes: vec![GoodsAttribute {
                attribute: Some("Material".into()),
                value: Some("Cotton".into()),
                ..GoodsAttribute::default()
            }],
            products: vec![GoodsProduct {
                specifications: Some(vec!["Red".into()]),
                price: Some(Decimal::new(2500, 2)),
                number: Some(3),
                ..GoodsProduct::default()
            }],
        }
    }

    fn unique_name(prefix: &str) -> String {
        format!("{prefix}-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_replace_retires_children() {
        let store = store().await;
        let name = unique_name("pg-replace");
        let share = TemplateShareImage::new("https://cdn.test");

        let created = store.create_goods(&graph(&name), &share).await.unwrap();
        let id = created.id.unwrap();
        assert_eq!(
            created.share_url.as_deref(),
            Some(format!("https://cdn.test/goods/{id}.png").as_str())
        );

        let old_products = store.list_products(id).await.unwrap();
        assert_eq!(old_products.len(), 1);

        let mut next = graph(&name);
        next.products[0].number = Some(9);
        next.attributes.clear();
        store.replace_goods(id, &next, "").await.unwrap();

        let products = store.list_products(id).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].number, Some(9));
        assert_ne!(products[0].id, old_products[0].id);
        assert!(store.list_attributes(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn replace_unknown_goods_writes_nothing() {
        let store = store().await;
        let err = store
            .replace_goods(i32::MAX, &graph(&unique_name("ghost")), "")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.list_products(i32::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_live_name_conflicts() {
        let store = store().await;
        let name = unique_name("pg-dup");
        store.create_goods(&graph(&name), &NoShareImage).await.unwrap();

        let err = store
            .create_goods(&graph(&name), &NoShareImage)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_hides_goods_and_frees_name() {
        let store = store().await;
        let name = unique_name("pg-delete");
        let created = store.create_goods(&graph(&name), &NoShareImage).await.unwrap();
        let id = created.id.unwrap();

        store.delete_goods(id).await.unwrap();
        assert!(store.find_goods(id).await.unwrap().is_none());
        assert!(store.list_specifications(id).await.unwrap().is_empty());
        assert!(!store.goods_name_exists(&name).await.unwrap());
    }
}
