use crate::domain::Master;
use crate::error::Result;

use super::Store;

impl Store {
    /// The MVP entry point: "the first master". Every engine function still
    /// takes the returned `Master` as explicit input, never a global.
    pub async fn first_master(&self) -> Result<Option<Master>> {
        let master = sqlx::query_as::<_, Master>("SELECT * FROM masters ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(master)
    }

    pub async fn master_by_id(&self, id: i64) -> Result<Option<Master>> {
        let master = sqlx::query_as::<_, Master>("SELECT * FROM masters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(master)
    }

    pub async fn master_by_external_user_id(&self, external_user_id: i64) -> Result<Option<Master>> {
        let master = sqlx::query_as::<_, Master>("SELECT * FROM masters WHERE external_user_id = $1")
            .bind(external_user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(master)
    }

    pub async fn update_master_profile(
        &self,
        id: i64,
        display_name: &str,
        timezone: &str,
        work_start_time: chrono::NaiveTime,
        work_end_time: chrono::NaiveTime,
        buffer_min: i32,
    ) -> Result<Master> {
        let master = sqlx::query_as::<_, Master>(
            r#"
            UPDATE masters
            SET display_name = $2, timezone = $3, work_start_time = $4, work_end_time = $5, buffer_min = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(display_name)
        .bind(timezone)
        .bind(work_start_time)
        .bind(work_end_time)
        .bind(buffer_min)
        .fetch_one(&self.pool)
        .await?;
        Ok(master)
    }
}
