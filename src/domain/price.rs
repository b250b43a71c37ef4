use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A time-effective price for a (master, service) pair. The *current* price
/// is the row with the greatest `active_from` not in the future; see
/// `store::price_repo::current_price`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Price {
    pub id: i64,
    pub master_id: i64,
    pub service_id: i64,
    pub price: Decimal,
    pub active_from: NaiveDate,
    pub created_at: DateTime<Utc>,
}
