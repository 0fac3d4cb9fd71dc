use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: Option<String>,
    pub sku: String,
    pub stock: i32,
    pub creation_date: DateTime<Utc>,
    pub update_date: Option<DateTime<Utc>>,
    pub category_id: i32,
}

/// Product row joined with its category name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: Option<String>,
    pub sku: String,
    pub stock: i32,
    pub creation_date: DateTime<Utc>,
    pub update_date: Option<DateTime<Utc>>,
    pub category_id: i32,
    pub category_name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: Option<String>,
    pub sku: String,
    pub stock: i32,
    pub creation_date: DateTime<Utc>,
    pub update_date: Option<DateTime<Utc>>,
    pub category_id: i32,
    pub category_name: String,
}

impl From<ProductRecord> for ProductDto {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price: record.price,
            img_url: record.img_url,
            sku: record.sku,
            stock: record.stock,
            creation_date: record.creation_date,
            update_date: record.update_date,
            category_id: record.category_id,
            category_name: record.category_name,
        }
    }
}

/// Fields accepted by the multipart create/update form. The optional image
/// part is handled separately by the upload service.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub img_url: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<UploadedImage>,
}

#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Validated form with every required field present.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: Option<String>,
    pub sku: String,
    pub stock: i32,
    pub category_id: i32,
    pub image: Option<UploadedImage>,
}

const NAME_MAX_LEN: usize = 200;
const DESCRIPTION_MAX_LEN: usize = 500;
const SKU_MAX_LEN: usize = 50;

impl ProductForm {
    pub fn into_new_product(self) -> Result<NewProduct> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
        let price = self
            .price
            .ok_or_else(|| AppError::BadRequest("price is required".to_string()))?;
        let sku = self
            .sku
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("sku is required".to_string()))?;
        let stock = self
            .stock
            .ok_or_else(|| AppError::BadRequest("stock is required".to_string()))?;
        let category_id = self
            .category_id
            .ok_or_else(|| AppError::BadRequest("category_id is required".to_string()))?;

        if name.chars().count() > NAME_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "name cannot exceed {} characters",
                NAME_MAX_LEN
            )));
        }
        let description = self.description.unwrap_or_default();
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "description cannot exceed {} characters",
                DESCRIPTION_MAX_LEN
            )));
        }
        if sku.chars().count() > SKU_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "sku cannot exceed {} characters",
                SKU_MAX_LEN
            )));
        }
        if price < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "price must be greater than or equal to 0".to_string(),
            ));
        }
        if stock < 0 {
            return Err(AppError::BadRequest(
                "stock must be greater than or equal to 0".to_string(),
            ));
        }

        Ok(NewProduct {
            name,
            description,
            price,
            img_url: self.img_url,
            sku,
            stock,
            category_id,
            image: self.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> ProductForm {
        ProductForm {
            name: Some("Widget".to_string()),
            description: Some("A widget".to_string()),
            price: Some(Decimal::new(1999, 2)),
            img_url: None,
            sku: Some("WID-001".to_string()),
            stock: Some(5),
            category_id: Some(1),
            image: None,
        }
    }

    #[test]
    fn complete_form_validates() {
        let product = full_form().into_new_product().unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.stock, 5);
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut form = full_form();
        form.name = None;
        assert!(matches!(
            form.into_new_product(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn blank_sku_is_rejected() {
        let mut form = full_form();
        form.sku = Some("   ".to_string());
        assert!(form.into_new_product().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut form = full_form();
        form.price = Some(Decimal::new(-1, 0));
        assert!(form.into_new_product().is_err());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut form = full_form();
        form.stock = Some(-1);
        assert!(form.into_new_product().is_err());
    }

    #[test]
    fn dto_carries_the_category_name() {
        let record = ProductRecord {
            id: 7,
            name: "Widget".to_string(),
            description: String::new(),
            price: Decimal::new(100, 0),
            img_url: None,
            sku: "WID-001".to_string(),
            stock: 3,
            creation_date: Utc::now(),
            update_date: None,
            category_id: 2,
            category_name: "Tools".to_string(),
        };

        let dto = ProductDto::from(record);
        assert_eq!(dto.category_name, "Tools");
        assert_eq!(dto.category_id, 2);
    }
}
