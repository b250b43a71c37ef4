use crate::domain::Service;
use crate::error::Result;

use super::Store;

impl Store {
    pub async fn active_services(&self) -> Result<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE active = true ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(services)
    }

    pub async fn service_by_id(&self, id: i64) -> Result<Option<Service>> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(service)
    }

    pub async fn create_service(&self, name: &str, duration_min: i32) -> Result<Service> {
        let service = sqlx::query_as::<_, Service>(
            "INSERT INTO services (name, duration_min) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(duration_min)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    pub async fn set_service_active(&self, id: i64, active: bool) -> Result<Service> {
        let service = sqlx::query_as::<_, Service>(
            "UPDATE services SET active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }
}
