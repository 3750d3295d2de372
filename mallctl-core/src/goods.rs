//! Goods records and the create/update payload
//!
//! Every field is optional so the same types serve as request bodies
//! (where the admin UI sends partial records) and as stored rows (where
//! every column is populated).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{require_text, ValidationError};

/// Sellable goods record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Goods {
    pub id: Option<i32>,
    pub goods_sn: Option<String>,
    pub name: Option<String>,
    /// `0` or absent means "no category"
    pub category_id: Option<i32>,
    /// `0` or absent means "no brand"
    pub brand_id: Option<i32>,
    pub gallery: Option<Vec<String>>,
    pub keywords: Option<String>,
    pub brief: Option<String>,
    pub is_on_sale: Option<bool>,
    pub sort_order: Option<i32>,
    pub pic_url: Option<String>,
    pub share_url: Option<String>,
    pub is_new: Option<bool>,
    pub is_hot: Option<bool>,
    pub unit: Option<String>,
    pub counter_price: Option<Decimal>,
    pub retail_price: Option<Decimal>,
    pub detail: Option<String>,
    pub add_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl Goods {
    /// Brand reference, with the UI's `0` placeholder folded into `None`.
    pub fn brand_ref(&self) -> Option<i32> {
        self.brand_id.filter(|id| *id != 0)
    }

    /// Category reference, with the UI's `0` placeholder folded into `None`.
    pub fn category_ref(&self) -> Option<i32> {
        self.category_id.filter(|id| *id != 0)
    }
}

/// Option dimension of a goods record, e.g. Color: Red
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct GoodsSpecification {
    pub id: Option<i32>,
    pub goods_id: Option<i32>,
    pub specification: Option<String>,
    pub value: Option<String>,
    pub pic_url: Option<String>,
    pub add_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// Descriptive key/value pair, e.g. Material: Cotton
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct GoodsAttribute {
    pub id: Option<i32>,
    pub goods_id: Option<i32>,
    pub attribute: Option<String>,
    pub value: Option<String>,
    pub add_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// Purchasable variant: one combination of specification values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct GoodsProduct {
    pub id: Option<i32>,
    pub goods_id: Option<i32>,
    pub specifications: Option<Vec<String>>,
    pub price: Option<Decimal>,
    /// Stock count
    pub number: Option<i32>,
    pub url: Option<String>,
    pub add_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// Full goods graph as submitted by the admin editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodsAllinone {
    #[serde(default)]
    pub goods: Goods,
    #[serde(default)]
    pub specifications: Vec<GoodsSpecification>,
    #[serde(default)]
    pub attributes: Vec<GoodsAttribute>,
    #[serde(default)]
    pub products: Vec<GoodsProduct>,
}

impl GoodsAllinone {
    /// Structural checks that need no lookups.
    ///
    /// Runs in two stages so callers can slot reference checks between
    /// the goods header and the child rows, matching the order the admin
    /// UI reports problems in.
    pub fn check_fields(&self) -> Result<(), ValidationError> {
        self.check_header()?;
        self.check_children()
    }

    /// Goods name and SKU must be present and non-empty.
    pub fn check_header(&self) -> Result<(), ValidationError> {
        require_text(self.goods.name.as_deref(), "name")?;
        require_text(self.goods.goods_sn.as_deref(), "goodsSn")
    }

    /// Attribute, specification and product rows.
    pub fn check_children(&self) -> Result<(), ValidationError> {
        for attribute in &self.attributes {
            require_text(attribute.attribute.as_deref(), "attribute")?;
            require_text(attribute.value.as_deref(), "attribute value")?;
        }

        for specification in &self.specifications {
            require_text(specification.specification.as_deref(), "specification")?;
            require_text(specification.value.as_deref(), "specification value")?;
        }

        for product in &self.products {
            match product.number {
                None => return Err(ValidationError::Missing { field: "product number" }),
                Some(n) if n < 0 => {
                    return Err(ValidationError::Negative {
                        field: "product number",
                        value: i64::from(n),
                    })
                }
                Some(_) => {}
            }

            if product.price.is_none() {
                return Err(ValidationError::Missing { field: "product price" });
            }

            match &product.specifications {
                None => {
                    return Err(ValidationError::Missing {
                        field: "product specifications",
                    })
                }
                Some(specs) if specs.is_empty() => {
                    return Err(ValidationError::Empty {
                        field: "product specifications",
                    })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Everything the editor needs to render one goods record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsDetail {
    pub goods: Goods,
    pub specifications: Vec<GoodsSpecification>,
    pub products: Vec<GoodsProduct>,
    pub attributes: Vec<GoodsAttribute>,
    /// `[parent category id, category id]`, or empty when the category is gone
    pub category_ids: Vec<i32>,
}
