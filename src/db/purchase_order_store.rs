use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::purchase_order::{PageRequest, PurchaseOrder, PurchaseOrderFields},
};

const DUPLICATE_ORDER_NUMBER: &str = "Order number already exists";
const NOT_FOUND: &str = "Purchase order not found";

/// Purchase order store for database operations
#[derive(Clone)]
pub struct PurchaseOrderStore {
    pool: DbPool,
}

impl PurchaseOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// One page of orders whose order number or party name contains the
    /// search text, newest first, plus the total number of matches.
    /// Matching runs on the case-folded `search_key` column because SQLite
    /// only folds ASCII in `LIKE`.
    pub async fn list(&self, request: &PageRequest) -> Result<(Vec<PurchaseOrder>, i64)> {
        let pattern = format!("%{}%", escape_like(&fold_case(&request.search)));

        let rows = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT * FROM purchase_orders
            WHERE search_key LIKE ? ESCAPE '\'
            ORDER BY date DESC, created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(i64::from(request.limit))
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM purchase_orders WHERE search_key LIKE ? ESCAPE '\\'",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<PurchaseOrder> {
        sqlx::query_as::<_, PurchaseOrder>("SELECT * FROM purchase_orders WHERE id = ?")
            .bind(id.hyphenated())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn create(&self, fields: &PurchaseOrderFields) -> Result<PurchaseOrder> {
        let now = Utc::now();

        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders
            (id, date, order_number, party_name, broker, mill, weight, bags, product, rate,
             terms_and_conditions, search_key, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().hyphenated())
        .bind(fields.date)
        .bind(&fields.order_number)
        .bind(&fields.party_name)
        .bind(&fields.broker)
        .bind(&fields.mill)
        .bind(fields.weight)
        .bind(fields.bags)
        .bind(&fields.product)
        .bind(fields.rate)
        .bind(&fields.terms_and_conditions)
        .bind(search_key(fields))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_ORDER_NUMBER))?;

        Ok(order)
    }

    /// Replace every business field of an existing order.
    pub async fn update(&self, id: Uuid, fields: &PurchaseOrderFields) -> Result<PurchaseOrder> {
        sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders
            SET date = ?, order_number = ?, party_name = ?, broker = ?, mill = ?,
                weight = ?, bags = ?, product = ?, rate = ?, terms_and_conditions = ?,
                search_key = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(fields.date)
        .bind(&fields.order_number)
        .bind(&fields.party_name)
        .bind(&fields.broker)
        .bind(&fields.mill)
        .bind(fields.weight)
        .bind(fields.bags)
        .bind(&fields.product)
        .bind(fields.rate)
        .bind(&fields.terms_and_conditions)
        .bind(search_key(fields))
        .bind(Utc::now())
        .bind(id.hyphenated())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_ORDER_NUMBER))?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM purchase_orders WHERE id = ?")
            .bind(id.hyphenated())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }

        Ok(())
    }
}

/// Folded order number and party name, separated so a match cannot span
/// both fields.
fn search_key(fields: &PurchaseOrderFields) -> String {
    format!(
        "{}\u{1f}{}",
        fold_case(&fields.order_number),
        fold_case(&fields.party_name)
    )
}

/// Unicode lowercase. `İ` lowercases to `i` plus U+0307, so the combining
/// dot is dropped to let it match a plain `i`.
fn fold_case(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\u{307}')
        .collect()
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("ABC"), "ABC");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn case_folding_covers_non_ascii() {
        assert_eq!(fold_case("ÄRZTE Mühle"), "ärzte mühle");
        assert_eq!(fold_case("ÇELİK"), fold_case("çelik"));
        assert_eq!(fold_case("PO-1"), "po-1");
    }
}
