use dukkan_core::pricing::ProductPrice;
use dukkan_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub active_campaign_id: Option<DbId>,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

/// Storefront view of a product with its effective price.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: Product,
    pub effective_price: Decimal,
}

impl From<Product> for ProductListItem {
    fn from(product: Product) -> Self {
        let effective_price = product.effective_price();
        Self {
            product,
            effective_price,
        }
    }
}

/// Price columns only, as read by the campaign lifecycle.
#[derive(Debug, Clone, FromRow)]
pub struct ProductPriceRow {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub active_campaign_id: Option<DbId>,
}

impl From<ProductPriceRow> for ProductPrice {
    fn from(row: ProductPriceRow) -> Self {
        ProductPrice {
            id: row.id,
            category_id: row.category_id,
            price: row.price,
            sale_price: row.sale_price,
            active_campaign_id: row.active_campaign_id,
        }
    }
}
