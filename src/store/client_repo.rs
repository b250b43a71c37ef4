use chrono::Utc;

use crate::domain::{Client, ClientStatus};
use crate::error::Result;

use super::Store;

impl Store {
    pub async fn client_by_external_user_id(&self, external_user_id: i64) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE external_user_id = $1")
            .bind(external_user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn client_by_id(&self, id: i64) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn create_client(&self, external_user_id: i64, chat_id: i64) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(
            "INSERT INTO clients (external_user_id, chat_id, status) VALUES ($1, $2, 'active') RETURNING *",
        )
        .bind(external_user_id)
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn set_client_status(&self, id: i64, status: ClientStatus) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(
            "UPDATE clients SET status = $2, status_updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn set_client_reactivated(&self, id: i64) -> Result<Client> {
        let now = Utc::now();
        let client = sqlx::query_as::<_, Client>(
            "UPDATE clients SET status = 'sleeping', last_reactivation_sent_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn set_client_last_visit(&self, id: i64, at: chrono::DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE clients SET last_visit_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Clients dormant per the lifecycle sweeper's selection rule: active,
    /// no visit in `sleeping_threshold_days`, and either never reactivated
    /// or not reactivated within `reactivation_cooldown_days`.
    pub async fn dormant_clients(&self, sleeping_threshold_days: i64, reactivation_cooldown_days: i64) -> Result<Vec<Client>> {
        let now = Utc::now();
        let sleeping_threshold = now - chrono::Duration::days(sleeping_threshold_days);
        let reactivation_cooldown = now - chrono::Duration::days(reactivation_cooldown_days);

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE status = 'active'
              AND last_visit_at < $1
              AND (last_reactivation_sent_at IS NULL OR last_reactivation_sent_at < $2)
            "#,
        )
        .bind(sleeping_threshold)
        .bind(reactivation_cooldown)
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }
}
