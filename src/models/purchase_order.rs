use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::{Uuid, fmt::Hyphenated};

use crate::{
    error::{AppError, Result},
    validation::{FieldError, Violations, non_empty},
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Database purchase order model, serialized as-is in API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrder {
    #[sqlx(try_from = "Hyphenated")]
    pub id: Uuid,
    pub date: NaiveDate,
    pub order_number: String,
    pub party_name: String,
    pub broker: Option<String>,
    pub mill: Option<String>,
    pub weight: Option<f64>,
    pub bags: Option<i64>,
    pub product: Option<String>,
    pub rate: Option<f64>,
    pub terms_and_conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update request body. Every field is optional at the serde level
/// so missing values surface as field errors rather than parse failures.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseOrderPayload {
    pub date: Option<String>,
    pub order_number: Option<String>,
    pub party_name: Option<String>,
    pub broker: Option<String>,
    pub mill: Option<String>,
    pub weight: Option<f64>,
    pub bags: Option<f64>,
    pub product: Option<String>,
    pub rate: Option<f64>,
    pub terms_and_conditions: Option<String>,
}

/// Validated business fields of a purchase order.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderFields {
    pub date: NaiveDate,
    pub order_number: String,
    pub party_name: String,
    pub broker: Option<String>,
    pub mill: Option<String>,
    pub weight: Option<f64>,
    pub bags: Option<i64>,
    pub product: Option<String>,
    pub rate: Option<f64>,
    pub terms_and_conditions: Option<String>,
}

impl PurchaseOrderPayload {
    pub fn validate(self) -> Result<PurchaseOrderFields> {
        let mut violations = Violations::new();

        let date = violations.date("date", self.date);
        let order_number = violations.required_text(
            "order_number",
            self.order_number,
            "Order number is required",
        );
        let party_name =
            violations.required_text("party_name", self.party_name, "Party name is required");
        let weight = violations.positive("weight", self.weight, "Weight must be positive");
        let bags = violations.positive_integer("bags", self.bags, "Bags must be a positive integer");
        let rate = violations.positive("rate", self.rate, "Rate must be positive");

        violations.finish(())?;
        let date = date.ok_or_else(|| {
            AppError::validation(vec![FieldError::new("date", "date is required")])
        })?;

        Ok(PurchaseOrderFields {
            date,
            order_number,
            party_name,
            broker: non_empty(self.broker),
            mill: non_empty(self.mill),
            weight,
            bags,
            product: non_empty(self.product),
            rate,
            terms_and_conditions: non_empty(self.terms_and_conditions),
        })
    }
}

/// Query string of `GET /api/purchase-orders`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Normalized search and paging parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub search: String,
    pub page: u32,
    pub limit: u32,
}

impl From<ListQuery> for PageRequest {
    fn from(query: ListQuery) -> Self {
        Self {
            search: query.q.unwrap_or_default(),
            page: query.page.unwrap_or(1).max(1),
            limit: query
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// Paging metadata returned next to a page of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(request: &PageRequest, total: i64) -> Self {
        let limit = i64::from(request.limit);
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}
