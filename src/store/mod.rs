//! Relational persistence. `Store` wraps a `sqlx::PgPool`; each repository
//! module below contributes an `impl Store` block for the entity it owns, in
//! the style of a single service-layer struct built from many files (the
//! `other_examples` docpat `AppointmentService` shape generalized to eight
//! entities instead of one).

pub mod appointment_repo;
pub mod blackout_repo;
pub mod client_repo;
pub mod event_repo;
pub mod master_repo;
pub mod price_repo;
pub mod reminder_repo;
pub mod schema;
pub mod service_repo;

use sqlx::PgPool;

#[derive(Clone)]
pub struct Store {
    pub pool: PgPool,
}

impl Store {
    pub async fn connect(database_url: &str) -> crate::error::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}
