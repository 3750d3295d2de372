//! Category and brand taxonomy, and the selector payload built from it

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category row. Level `L1` categories are roots; children point at
/// their root through `pid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub keywords: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub pid: i32,
    pub icon_url: String,
    pub pic_url: String,
    pub level: String,
    pub sort_order: i32,
    pub add_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i32,
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub pic_url: String,
    pub sort_order: i32,
    pub floor_price: Decimal,
    pub add_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Cascader node for the "category" selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub value: i32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryOption>>,
}

/// Entry of the "brand" selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandOption {
    pub value: i32,
    pub label: String,
}

/// Both selector payloads in one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatAndBrand {
    pub category_list: Vec<CategoryOption>,
    pub brand_list: Vec<BrandOption>,
}

impl CatAndBrand {
    /// Build the selector payload.
    ///
    /// Every root becomes a node whose children are the `children` rows
    /// whose `pid` names it, in input order. Their level is ignored. Rows
    /// whose parent is not among the roots are dropped.
    pub fn build(l1: &[Category], children: &[Category], brands: &[Brand]) -> Self {
        let mut by_parent: HashMap<i32, Vec<CategoryOption>> = HashMap::new();
        for child in children {
            by_parent.entry(child.pid).or_default().push(CategoryOption {
                value: child.id,
                label: child.name.clone(),
                children: None,
            });
        }

        let category_list = l1
            .iter()
            .map(|root| CategoryOption {
                value: root.id,
                label: root.name.clone(),
                children: Some(by_parent.remove(&root.id).unwrap_or_default()),
            })
            .collect();

        let brand_list = brands
            .iter()
            .map(|b| BrandOption {
                value: b.id,
                label: b.name.clone(),
            })
            .collect();

        Self {
            category_list,
            brand_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, pid: i32, level: &str, name: &str) -> Category {
        let now = Utc::now();
        Category {
            id,
            name: name.into(),
            keywords: String::new(),
            description: String::new(),
            pid,
            icon_url: String::new(),
            pic_url: String::new(),
            level: level.into(),
            sort_order: 0,
            add_time: now,
            update_time: now,
        }
    }

    fn brand(id: i32, name: &str) -> Brand {
        let now = Utc::now();
        Brand {
            id,
            name: name.into(),
            description: String::new(),
            pic_url: String::new(),
            sort_order: 0,
            floor_price: Decimal::ZERO,
            add_time: now,
            update_time: now,
        }
    }

    #[test]
    fn builds_two_level_cascade() {
        let l1 = vec![category(1, 0, "L1", "Home"), category(2, 0, "L1", "Apparel")];
        let l2 = vec![
            category(10, 1, "L2", "Kitchen"),
            category(11, 2, "L2", "Shirts"),
            category(12, 1, "L2", "Bath"),
        ];
        let out = CatAndBrand::build(&l1, &l2, &[brand(5, "Acme")]);

        assert_eq!(out.category_list.len(), 2);
        let home = &out.category_list[0];
        assert_eq!(home.label, "Home");
        let kids: Vec<_> = home
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.value)
            .collect();
        assert_eq!(kids, vec![10, 12]);
        assert_eq!(
            out.brand_list,
            vec![BrandOption {
                value: 5,
                label: "Acme".into()
            }]
        );
    }

    #[test]
    fn roots_without_children_get_empty_list() {
        let out = CatAndBrand::build(&[category(1, 0, "L1", "Solo")], &[], &[]);
        assert_eq!(out.category_list[0].children, Some(vec![]));
        assert!(out.brand_list.is_empty());
    }

    #[test]
    fn orphans_are_dropped() {
        let out = CatAndBrand::build(
            &[category(1, 0, "L1", "Home")],
            &[category(20, 99, "L2", "Lost")],
            &[],
        );
        assert_eq!(out.category_list[0].children, Some(vec![]));
    }

    #[test]
    fn serializes_ui_shape() {
        let out = CatAndBrand::build(
            &[category(1, 0, "L1", "Home")],
            &[category(10, 1, "L2", "Kitchen")],
            &[brand(3, "Acme")],
        );
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["categoryList"][0]["children"][0]["label"], "Kitchen");
        assert!(json["categoryList"][0]["children"][0].get("children").is_none());
        assert_eq!(json["brandList"][0]["value"], 3);
    }
}
