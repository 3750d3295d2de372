//! In-process goods store
//!
//! Same semantics as `PgStore`: soft deletes, live-name uniqueness and
//! all-or-nothing writes (each write mutates a copy of the state and swaps
//! it in only on success).

use async_trait::async_trait;
use chrono::Utc;
use mallctl_core::{
    Brand, Category, Goods, GoodsAllinone, GoodsAttribute, GoodsProduct, GoodsQuery,
    GoodsSpecification, Page, SortField, SortOrder,
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::{GoodsStore, StoreError, StoreResult};
use crate::share::ShareImage;

#[derive(Debug, Clone)]
struct Row<T> {
    value: T,
    deleted: bool,
}

impl<T> Row<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            deleted: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    seq: i32,
    goods: Vec<Row<Goods>>,
    specifications: Vec<Row<GoodsSpecification>>,
    attributes: Vec<Row<GoodsAttribute>>,
    products: Vec<Row<GoodsProduct>>,
    categories: Vec<Row<Category>>,
    brands: Vec<Row<Brand>>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.seq += 1;
        self.seq
    }

    fn live_goods_mut(&mut self, id: i32) -> Option<&mut Goods> {
        self.goods
            .iter_mut()
            .find(|r| !r.deleted && r.value.id == Some(id))
            .map(|r| &mut r.value)
    }

    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.goods.iter().any(|r| {
            !r.deleted && r.value.name.as_deref() == Some(name) && r.value.id != except
        })
    }

    fn retire_children(&mut self, goods_id: i32) {
        let now = Some(Utc::now());
        retire(&mut self.specifications, goods_id, |s| s.goods_id, |s| s.update_time = now);
        retire(&mut self.attributes, goods_id, |a| a.goods_id, |a| a.update_time = now);
        retire(&mut self.products, goods_id, |p| p.goods_id, |p| p.update_time = now);
    }

    fn insert_children(&mut self, goods_id: i32, graph: &GoodsAllinone) {
        let now = Some(Utc::now());

        for spec in &graph.specifications {
            let id = self.next_id();
            self.specifications.push(Row::live(GoodsSpecification {
                id: Some(id),
                goods_id: Some(goods_id),
                pic_url: Some(spec.pic_url.clone().unwrap_or_default()),
                add_time: now,
                update_time: now,
                ..spec.clone()
            }));
        }

        for attribute in &graph.attributes {
            let id = self.next_id();
            self.attributes.push(Row::live(GoodsAttribute {
                id: Some(id),
                goods_id: Some(goods_id),
                add_time: now,
                update_time: now,
                ..attribute.clone()
            }));
        }

        for product in &graph.products {
            let id = self.next_id();
            self.products.push(Row::live(GoodsProduct {
                id: Some(id),
                goods_id: Some(goods_id),
                url: Some(product.url.clone().unwrap_or_default()),
                add_time: now,
                update_time: now,
                ..product.clone()
            }));
        }
    }
}

/// Flag the live rows owned by `goods_id` as deleted.
fn retire<T>(
    rows: &mut [Row<T>],
    goods_id: i32,
    owner: impl Fn(&T) -> Option<i32>,
    touch: impl Fn(&mut T),
) {
    for row in rows
        .iter_mut()
        .filter(|r| !r.deleted && owner(&r.value) == Some(goods_id))
    {
        row.deleted = true;
        touch(&mut row.value);
    }
}

/// Fill absent fields with the column defaults of `mall_goods`.
fn with_defaults(input: &Goods, id: i32) -> Goods {
    let now = Some(Utc::now());
    Goods {
        id: Some(id),
        goods_sn: input.goods_sn.clone(),
        name: input.name.clone(),
        category_id: Some(input.category_id.unwrap_or(0)),
        brand_id: Some(input.brand_id.unwrap_or(0)),
        gallery: Some(input.gallery.clone().unwrap_or_default()),
        keywords: Some(input.keywords.clone().unwrap_or_default()),
        brief: Some(input.brief.clone().unwrap_or_default()),
        is_on_sale: Some(input.is_on_sale.unwrap_or(true)),
        sort_order: Some(input.sort_order.unwrap_or(100)),
        pic_url: Some(input.pic_url.clone().unwrap_or_default()),
        share_url: Some(input.share_url.clone().unwrap_or_default()),
        is_new: Some(input.is_new.unwrap_or(false)),
        is_hot: Some(input.is_hot.unwrap_or(false)),
        unit: Some(input.unit.clone().unwrap_or_default()),
        counter_price: Some(input.counter_price.unwrap_or(Decimal::ZERO)),
        retail_price: Some(input.retail_price.unwrap_or(Decimal::ZERO)),
        detail: Some(input.detail.clone().unwrap_or_default()),
        add_time: now,
        update_time: now,
    }
}

/// Overwrite the fields `patch` supplies.
macro_rules! merge_fields {
    ($target:ident, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = Some(value.clone());
            }
        )+
    };
}

/// In-memory goods store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category. `pid` of 0 with level `L1` makes a root.
    pub async fn add_category(&self, name: &str, pid: i32, level: &str) -> Category {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let now = Utc::now();
        let category = Category {
            id,
            name: name.to_owned(),
            keywords: String::new(),
            description: String::new(),
            pid,
            icon_url: String::new(),
            pic_url: String::new(),
            level: level.to_owned(),
            sort_order: 50,
            add_time: now,
            update_time: now,
        };
        state.categories.push(Row::live(category.clone()));
        category
    }

    /// Soft-delete a category.
    pub async fn remove_category(&self, id: i32) {
        let mut state = self.state.lock().await;
        for row in state.categories.iter_mut().filter(|r| r.value.id == id) {
            row.deleted = true;
        }
    }

    pub async fn add_brand(&self, name: &str) -> Brand {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let now = Utc::now();
        let brand = Brand {
            id,
            name: name.to_owned(),
            description: String::new(),
            pic_url: String::new(),
            sort_order: 50,
            floor_price: Decimal::ZERO,
            add_time: now,
            update_time: now,
        };
        state.brands.push(Row::live(brand.clone()));
        brand
    }

    /// Products of a goods record including retired ones, oldest first.
    pub async fn all_products(&self, goods_id: i32) -> Vec<(GoodsProduct, bool)> {
        let state = self.state.lock().await;
        state
            .products
            .iter()
            .filter(|r| r.value.goods_id == Some(goods_id))
            .map(|r| (r.value.clone(), r.deleted))
            .collect()
    }
}

fn sorted_categories(rows: &[Row<Category>], keep: impl Fn(&Category) -> bool) -> Vec<Category> {
    let mut out: Vec<Category> = rows
        .iter()
        .filter(|r| !r.deleted && keep(&r.value))
        .map(|r| r.value.clone())
        .collect();
    out.sort_by_key(|c| (c.sort_order, c.id));
    out
}

fn live_children<T: Clone>(
    rows: &[Row<T>],
    goods_id: i32,
    owner: impl Fn(&T) -> Option<i32>,
) -> Vec<T> {
    rows.iter()
        .filter(|r| !r.deleted && owner(&r.value) == Some(goods_id))
        .map(|r| r.value.clone())
        .collect()
}

#[async_trait]
impl GoodsStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_goods(&self, query: &GoodsQuery) -> StoreResult<Page<Goods>> {
        let state = self.state.lock().await;
        let mut matched: Vec<Goods> = state
            .goods
            .iter()
            .filter(|r| !r.deleted)
            .filter(|r| {
                query.matches(
                    r.value.goods_sn.as_deref().unwrap_or_default(),
                    r.value.name.as_deref().unwrap_or_default(),
                )
            })
            .map(|r| r.value.clone())
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match query.sort {
                SortField::AddTime => a.add_time.cmp(&b.add_time).then(a.id.cmp(&b.id)),
                SortField::Id => a.id.cmp(&b.id),
            };
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as i64;
        let list = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok(Page::new(list, total, query))
    }

    async fn find_goods(&self, id: i32) -> StoreResult<Option<Goods>> {
        let state = self.state.lock().await;
        Ok(state
            .goods
            .iter()
            .find(|r| !r.deleted && r.value.id == Some(id))
            .map(|r| r.value.clone()))
    }

    async fn goods_name_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.state.lock().await.name_taken(name, None))
    }

    async fn find_category(&self, id: i32) -> StoreResult<Option<Category>> {
        let state = self.state.lock().await;
        Ok(state
            .categories
            .iter()
            .find(|r| !r.deleted && r.value.id == id)
            .map(|r| r.value.clone()))
    }

    async fn find_brand(&self, id: i32) -> StoreResult<Option<Brand>> {
        let state = self.state.lock().await;
        Ok(state
            .brands
            .iter()
            .find(|r| !r.deleted && r.value.id == id)
            .map(|r| r.value.clone()))
    }

    async fn list_l1_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.state.lock().await;
        Ok(sorted_categories(&state.categories, |c| c.level == "L1"))
    }

    async fn list_child_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.state.lock().await;
        Ok(sorted_categories(&state.categories, |c| c.pid != 0))
    }

    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        let state = self.state.lock().await;
        let mut brands: Vec<Brand> = state
            .brands
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| r.value.clone())
            .collect();
        brands.sort_by_key(|b| (b.sort_order, b.id));
        Ok(brands)
    }

    async fn list_specifications(&self, goods_id: i32) -> StoreResult<Vec<GoodsSpecification>> {
        let state = self.state.lock().await;
        Ok(live_children(&state.specifications, goods_id, |s| s.goods_id))
    }

    async fn list_attributes(&self, goods_id: i32) -> StoreResult<Vec<GoodsAttribute>> {
        let state = self.state.lock().await;
        Ok(live_children(&state.attributes, goods_id, |a| a.goods_id))
    }

    async fn list_products(&self, goods_id: i32) -> StoreResult<Vec<GoodsProduct>> {
        let state = self.state.lock().await;
        Ok(live_children(&state.products, goods_id, |p| p.goods_id))
    }

    async fn create_goods(
        &self,
        graph: &GoodsAllinone,
        share: &dyn ShareImage,
    ) -> StoreResult<Goods> {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();

        let name = graph.goods.name.as_deref().unwrap_or_default();
        if next.name_taken(name, None) {
            return Err(StoreError::Conflict {
                constraint: "mall_goods_name_live".into(),
            });
        }

        let id = next.next_id();
        let mut goods = with_defaults(&graph.goods, id);
        let url = share.share_url(
            id,
            goods.pic_url.as_deref().unwrap_or_default(),
            goods.name.as_deref().unwrap_or_default(),
        );
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            goods.share_url = Some(url);
        }

        next.goods.push(Row::live(goods.clone()));
        next.insert_children(id, graph);

        *guard = next;
        Ok(goods)
    }

    async fn replace_goods(
        &self,
        id: i32,
        graph: &GoodsAllinone,
        share_url: &str,
    ) -> StoreResult<Goods> {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();

        // Unknown id wins over a name clash, as with the UPDATE in PgStore
        if next.live_goods_mut(id).is_none() {
            return Err(StoreError::goods_not_found(id));
        }
        if let Some(name) = graph.goods.name.as_deref() {
            if next.name_taken(name, Some(id)) {
                return Err(StoreError::Conflict {
                    constraint: "mall_goods_name_live".into(),
                });
            }
        }

        let patch = &graph.goods;
        let current = next
            .live_goods_mut(id)
            .ok_or_else(|| StoreError::goods_not_found(id))?;
        merge_fields!(
            current,
            patch,
            goods_sn,
            name,
            category_id,
            brand_id,
            gallery,
            keywords,
            brief,
            is_on_sale,
            sort_order,
            pic_url,
            is_new,
            is_hot,
            unit,
            counter_price,
            retail_price,
            detail,
        );
        current.share_url = Some(share_url.to_owned());
        current.update_time = Some(Utc::now());
        let updated = current.clone();

        next.retire_children(id);
        next.insert_children(id, graph);

        *guard = next;
        Ok(updated)
    }

    async fn delete_goods(&self, id: i32) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        for row in state
            .goods
            .iter_mut()
            .filter(|r| !r.deleted && r.value.id == Some(id))
        {
            row.deleted = true;
            row.value.update_time = Some(now);
        }
        state.retire_children(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::{NoShareImage, TemplateShareImage};

    fn graph(name: &str, sn: &str) -> GoodsAllinone {
        GoodsAllinone {
            goods: Goods {
                name: Some(name.into()),
                goods_sn: Some(sn.into()),
                ..Goods::default()
            },
            specifications: vec![GoodsSpecification {
                specification: Some("Size".into()),
                value: Some("L".into()),
                ..GoodsSpecification::default()
            }],
            attributes: vec![],
            products: vec![GoodsProduct {
                specifications: Some(vec!["L".into()]),
                price: Some(Decimal::new(10, 0)),
                number: Some(1),
                ..GoodsProduct::default()
            }],
        }
    }

    #[tokio::test]
    async fn create_fills_defaults_and_share_url() {
        let store = MemoryStore::new();
        let share = TemplateShareImage::new("http://img");
        let goods = store.create_goods(&graph("Cup", "C-1"), &share).await.unwrap();

        let id = goods.id.unwrap();
        assert_eq!(goods.is_on_sale, Some(true));
        assert_eq!(goods.brand_id, Some(0));
        assert_eq!(goods.share_url, Some(format!("http://img/goods/{id}.png")));
        assert_eq!(store.list_products(id).await.unwrap()[0].goods_id, Some(id));
    }

    #[tokio::test]
    async fn create_rejects_live_duplicate_name() {
        let store = MemoryStore::new();
        store.create_goods(&graph("Cup", "C-1"), &NoShareImage).await.unwrap();
        let err = store
            .create_goods(&graph("Cup", "C-2"), &NoShareImage)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn replace_keeps_unsupplied_fields_and_retires_children() {
        let store = MemoryStore::new();
        let mut original = graph("Cup", "C-1");
        original.goods.brief = Some("sturdy".into());
        let created = store.create_goods(&original, &NoShareImage).await.unwrap();
        let id = created.id.unwrap();

        let mut edit = graph("Cup", "C-1b");
        edit.products[0].number = Some(7);
        let updated = store.replace_goods(id, &edit, "").await.unwrap();

        assert_eq!(updated.goods_sn.as_deref(), Some("C-1b"));
        assert_eq!(updated.brief.as_deref(), Some("sturdy"));
        assert_eq!(updated.share_url.as_deref(), Some(""));

        let history = store.all_products(id).await;
        assert_eq!(history.len(), 2);
        assert!(history[0].1, "old product retired");
        assert!(!history[1].1);
        assert_eq!(history[1].0.number, Some(7));
    }

    #[tokio::test]
    async fn replace_missing_goods_changes_nothing() {
        let store = MemoryStore::new();
        let err = store
            .replace_goods(99, &graph("Ghost", "G"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "goods", .. }));
        assert!(store.all_products(99).await.is_empty());
    }

    #[tokio::test]
    async fn delete_retires_graph_and_frees_name() {
        let store = MemoryStore::new();
        let id = store
            .create_goods(&graph("Cup", "C-1"), &NoShareImage)
            .await
            .unwrap()
            .id
            .unwrap();

        store.delete_goods(id).await.unwrap();
        store.delete_goods(id).await.unwrap();

        assert!(store.find_goods(id).await.unwrap().is_none());
        assert!(store.list_specifications(id).await.unwrap().is_empty());
        assert!(!store.goods_name_exists("Cup").await.unwrap());
        assert!(store.create_goods(&graph("Cup", "C-1"), &NoShareImage).await.is_ok());
    }

    #[tokio::test]
    async fn list_filters_sorts_and_pages() {
        let store = MemoryStore::new();
        for (name, sn) in [("Red shirt", "S-1"), ("Blue shirt", "S-2"), ("Mug", "M-1")] {
            store.create_goods(&graph(name, sn), &NoShareImage).await.unwrap();
        }

        let query = GoodsQuery {
            name: Some("SHIRT".into()),
            sort: SortField::Id,
            order: SortOrder::Asc,
            ..GoodsQuery::default()
        };
        let page = store.list_goods(&query).await.unwrap();
        assert_eq!(page.total, 2);
        let names: Vec<_> = page.list.iter().map(|g| g.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Red shirt", "Blue shirt"]);

        let query = GoodsQuery {
            limit: 1,
            page: 2,
            sort: SortField::Id,
            ..GoodsQuery::default()
        };
        let page = store.list_goods(&query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 3);
        assert_eq!(page.list[0].name.as_deref(), Some("Blue shirt"));
    }

    #[tokio::test]
    async fn roots_by_level_children_by_parent() {
        let store = MemoryStore::new();
        let root = store.add_category("Home", 0, "L1").await;
        store.add_category("Kitchen", root.id, "L2").await;
        let gone = store.add_category("Old", root.id, "L2").await;
        store.remove_category(gone.id).await;
        store.add_category("Pantry", root.id, "L1").await;

        assert_eq!(store.list_l1_categories().await.unwrap().len(), 2);
        let children = store.list_child_categories().await.unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Kitchen", "Pantry"]);
        assert!(store.find_category(gone.id).await.unwrap().is_none());
    }
}
