use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::Price;
use crate::error::Result;

use super::Store;

impl Store {
    /// The current price is the row with the greatest `active_from` not in
    /// the future. Returns `None` when no such row exists — the booking
    /// engine treats that as `PriceUnavailable`.
    pub async fn current_price(&self, master_id: i64, service_id: i64, as_of: NaiveDate) -> Result<Option<Price>> {
        let price = sqlx::query_as::<_, Price>(
            r#"
            SELECT * FROM master_service_prices
            WHERE master_id = $1 AND service_id = $2 AND active_from <= $3
            ORDER BY active_from DESC
            LIMIT 1
            "#,
        )
        .bind(master_id)
        .bind(service_id)
        .bind(as_of)
        .fetch_optional(&self.pool)
        .await?;
        Ok(price)
    }

    pub async fn set_price(&self, master_id: i64, service_id: i64, price: Decimal, active_from: NaiveDate) -> Result<Price> {
        let row = sqlx::query_as::<_, Price>(
            r#"
            INSERT INTO master_service_prices (master_id, service_id, price, active_from)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(master_id)
        .bind(service_id)
        .bind(price)
        .bind(active_from)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
