//! Startup schema migration, run once at process boot. Mirrors
//! `original_source/app/migrations/versions/0001_initial.py` (alembic) —
//! same tables, same indexes, same exclusion constraint — expressed as a
//! single idempotent SQL script rather than a migration framework, since the
//! pack carries no migration-runner crate and the schema here never evolves
//! within a single deployment's lifetime.

use super::Store;

pub const SCHEMA_SQL: &str = r#"
CREATE EXTENSION IF NOT EXISTS btree_gist;

DO $$ BEGIN
    IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'client_status') THEN
        CREATE TYPE client_status AS ENUM ('active', 'sleeping', 'blocked', 'unsubscribed');
    END IF;
    IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'appointment_status') THEN
        CREATE TYPE appointment_status AS ENUM ('booked', 'confirmed', 'arrived', 'done', 'cancelled', 'late_cancel');
    END IF;
    IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'reminder_type') THEN
        CREATE TYPE reminder_type AS ENUM ('confirm_24h', 'confirm_6h', 'remind_3h');
    END IF;
    IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'reminder_status') THEN
        CREATE TYPE reminder_status AS ENUM ('pending', 'sent', 'cancelled', 'failed');
    END IF;
    IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'actor_kind') THEN
        CREATE TYPE actor_kind AS ENUM ('client', 'master', 'scheduler', 'admin');
    END IF;
END $$;

CREATE TABLE IF NOT EXISTS masters (
    id BIGSERIAL PRIMARY KEY,
    display_name TEXT NOT NULL,
    external_user_id BIGINT NOT NULL UNIQUE,
    timezone TEXT NOT NULL DEFAULT 'Europe/Moscow',
    work_start_time TIME NOT NULL DEFAULT '09:00:00',
    work_end_time TIME NOT NULL DEFAULT '20:00:00',
    buffer_min INTEGER NOT NULL DEFAULT 10,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS services (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    duration_min INTEGER NOT NULL DEFAULT 30,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS master_service_prices (
    id BIGSERIAL PRIMARY KEY,
    master_id BIGINT NOT NULL REFERENCES masters(id),
    service_id BIGINT NOT NULL REFERENCES services(id),
    price NUMERIC(10, 2) NOT NULL,
    active_from DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS ix_msp_master_service ON master_service_prices (master_id, service_id);

CREATE TABLE IF NOT EXISTS clients (
    id BIGSERIAL PRIMARY KEY,
    external_user_id BIGINT NOT NULL UNIQUE,
    chat_id BIGINT NOT NULL,
    status client_status NOT NULL DEFAULT 'active',
    status_updated_at TIMESTAMPTZ,
    last_visit_at TIMESTAMPTZ,
    last_reactivation_sent_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS appointments (
    id BIGSERIAL PRIMARY KEY,
    master_id BIGINT NOT NULL REFERENCES masters(id),
    client_id BIGINT NOT NULL REFERENCES clients(id),
    service_id BIGINT NOT NULL REFERENCES services(id),
    start_ts TIMESTAMPTZ NOT NULL,
    end_ts TIMESTAMPTZ NOT NULL,
    status appointment_status NOT NULL DEFAULT 'booked',
    confirmed_at TIMESTAMPTZ,
    price_snapshot NUMERIC(10, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    cancelled_at TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS ix_appointments_master_start ON appointments (master_id, start_ts);
CREATE INDEX IF NOT EXISTS ix_appointments_client ON appointments (client_id);

DO $$ BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM pg_constraint WHERE conname = 'appointments_no_overlap'
    ) THEN
        ALTER TABLE appointments
        ADD CONSTRAINT appointments_no_overlap
        EXCLUDE USING GIST (
            master_id WITH =,
            tstzrange(start_ts, end_ts, '[)') WITH &&
        )
        WHERE (status NOT IN ('cancelled', 'late_cancel'));
    END IF;
END $$;

CREATE TABLE IF NOT EXISTS blackouts (
    id BIGSERIAL PRIMARY KEY,
    master_id BIGINT NOT NULL REFERENCES masters(id),
    start_ts TIMESTAMPTZ NOT NULL,
    end_ts TIMESTAMPTZ NOT NULL,
    reason TEXT,
    created_by_admin_id BIGINT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS reminders (
    id BIGSERIAL PRIMARY KEY,
    appointment_id BIGINT NOT NULL REFERENCES appointments(id),
    remind_at_ts TIMESTAMPTZ NOT NULL,
    kind reminder_type NOT NULL,
    status reminder_status NOT NULL DEFAULT 'pending',
    sent_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS ix_reminders_pending ON reminders (status, remind_at_ts);

CREATE TABLE IF NOT EXISTS events (
    id BIGSERIAL PRIMARY KEY,
    event_type TEXT NOT NULL,
    appointment_id BIGINT REFERENCES appointments(id) ON DELETE SET NULL,
    client_id BIGINT REFERENCES clients(id) ON DELETE SET NULL,
    master_id BIGINT REFERENCES masters(id) ON DELETE SET NULL,
    actor_type actor_kind NOT NULL,
    actor_id BIGINT NOT NULL,
    payload JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS ix_events_type ON events (event_type);
CREATE INDEX IF NOT EXISTS ix_events_created_at ON events (created_at);
"#;

impl Store {
    pub async fn run_migrations(&self) -> crate::error::Result<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::info!("schema migration applied");
        Ok(())
    }
}
