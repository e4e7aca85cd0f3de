//! Diesel-backed Postgres store.
//!
//! Blocking diesel calls run on the tokio blocking pool; transient failures
//! (pool checkout, serialization conflicts) are retried with exponential
//! backoff before surfacing. The schema ships as embedded migrations next to
//! this module and is applied on startup.
//!
//! Connection settings come from the environment:
//! `DATABASE_URL`/`PG_DATABASE_URL` plus the optional `PG_POOL_MAX`,
//! `PG_POOL_MIN`, `PG_CONN_TIMEOUT_SEC`, `PG_IDLE_TIMEOUT_SEC`,
//! `PG_MAX_RETRIES` and `PG_RETRY_DELAY_MS` knobs.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::api::{Appointment, AppointmentId, ArtistId, BedId, NewAppointment};
use crate::db::repository::{
    AppointmentRepository, DirectoryRepository, ErrorContext, RepositoryError, RepositoryResult,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Pool and retry settings for the Postgres backend.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Retry attempts for transient failures on top of the first try.
    pub max_retries: u32,
    /// First retry delay; doubles on every further attempt.
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Settings from the environment; only the URL is mandatory.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "set DATABASE_URL (or PG_DATABASE_URL) to reach Postgres".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }
}

/// Snapshot of pool state and query counters, for monitoring.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// The appointment store on top of a Postgres schema.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Open the pool and bring the schema up to date.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        let mut conn = pool.get().map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("migrations"),
            )
        })?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Failed to run pending migrations: {}", e),
                ErrorContext::new("migrations"),
            )
        })?;
        drop(conn);

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run a blocking diesel closure off the async runtime, retrying
    /// retryable failures up to `max_retries` with doubling delays.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let first_delay = Duration::from_millis(self.config.retry_delay_ms);
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut delay = first_delay;
            let mut attempt: u32 = 0;

            loop {
                let outcome = match pool.get() {
                    Ok(mut conn) => {
                        total_queries.fetch_add(1, Ordering::Relaxed);
                        f.clone()(&mut conn)
                    }
                    Err(e) => Err(RepositoryError::connection_with_context(
                        e.to_string(),
                        ErrorContext::new("get_connection")
                            .with_details(format!("attempt={}", attempt + 1)),
                    )),
                };

                match outcome {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        attempt += 1;
                        retried_operations.fetch_add(1, Ordering::Relaxed);
                        std::thread::sleep(delay);
                        delay *= 2;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Blocking task failed: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn rows_to_entities(rows: Vec<AppointmentRow>) -> RepositoryResult<Vec<Appointment>> {
    let mut entities = Vec::with_capacity(rows.len());
    for row in rows {
        entities.push(row.into_entity()?);
    }
    Ok(entities)
}

#[async_trait]
impl AppointmentRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn store_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        let new_row = NewAppointmentRow::from(appointment);
        self.with_conn(move |conn| {
            let inserted: AppointmentRow = diesel::insert_into(appointments::table)
                .values(&new_row)
                .returning(AppointmentRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;

            inserted.into_entity()
        })
        .await
    }

    async fn get_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> RepositoryResult<Appointment> {
        self.with_conn(move |conn| {
            let row = appointments::table
                .filter(appointments::appointment_id.eq(appointment_id.value()))
                .select(AppointmentRow::as_select())
                .first::<AppointmentRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("appointment {} not found", appointment_id),
                        ErrorContext::new("get_appointment")
                            .with_entity("appointment")
                            .with_entity_id(appointment_id),
                    )
                })?;

            row.into_entity()
        })
        .await
    }

    async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> RepositoryResult<Appointment> {
        let appointment = appointment.clone();
        self.with_conn(move |conn| {
            // updated_at is refreshed by the diesel_set_updated_at trigger.
            let updated = diesel::update(
                appointments::table
                    .filter(appointments::appointment_id.eq(appointment.id.value())),
            )
            .set((
                appointments::client_id.eq(appointment.client_id.value()),
                appointments::artist_id.eq(appointment.artist_id.value()),
                appointments::bed_id.eq(appointment.bed_id.map(|id| id.value())),
                appointments::date.eq(appointment.date),
                appointments::start_time.eq(appointment.start_time),
                appointments::duration_minutes.eq(appointment.duration_minutes),
                appointments::service_type.eq(appointment.service_type.as_str()),
                appointments::status.eq(appointment.status.as_str()),
                appointments::price.eq(appointment.price),
                appointments::notes.eq(appointment.notes.clone()),
            ))
            .returning(AppointmentRow::as_returning())
            .get_result::<AppointmentRow>(conn)
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("appointment {} not found", appointment.id),
                    ErrorContext::new("update_appointment")
                        .with_entity("appointment")
                        .with_entity_id(appointment.id),
                )
            })?;

            updated.into_entity()
        })
        .await
    }

    async fn delete_appointment(&self, appointment_id: AppointmentId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(
                appointments::table
                    .filter(appointments::appointment_id.eq(appointment_id.value())),
            )
            .execute(conn)
            .map_err(map_diesel_error)?;

            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("appointment {} not found", appointment_id),
                    ErrorContext::new("delete_appointment")
                        .with_entity("appointment")
                        .with_entity_id(appointment_id),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn appointments_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Appointment>> {
        self.with_conn(move |conn| {
            let rows = appointments::table
                .filter(appointments::date.eq(date))
                .select(AppointmentRow::as_select())
                .order(appointments::start_time.asc())
                .load::<AppointmentRow>(conn)
                .map_err(map_diesel_error)?;

            rows_to_entities(rows)
        })
        .await
    }

    async fn appointments_by_artist(
        &self,
        artist_id: ArtistId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Appointment>> {
        self.with_conn(move |conn| {
            let mut query = appointments::table
                .filter(appointments::artist_id.eq(artist_id.value()))
                .into_boxed();

            if let Some(start) = start {
                query = query.filter(appointments::date.ge(start));
            }
            if let Some(end) = end {
                query = query.filter(appointments::date.le(end));
            }

            let rows = query
                .select(AppointmentRow::as_select())
                .order((appointments::date.asc(), appointments::start_time.asc()))
                .load::<AppointmentRow>(conn)
                .map_err(map_diesel_error)?;

            rows_to_entities(rows)
        })
        .await
    }

    async fn list_appointments(&self) -> RepositoryResult<Vec<Appointment>> {
        self.with_conn(|conn| {
            let rows = appointments::table
                .select(AppointmentRow::as_select())
                .order(appointments::appointment_id.asc())
                .load::<AppointmentRow>(conn)
                .map_err(map_diesel_error)?;

            rows_to_entities(rows)
        })
        .await
    }
}

#[async_trait]
impl DirectoryRepository for PostgresRepository {
    async fn artist_is_available(
        &self,
        artist_id: ArtistId,
        _date: NaiveDate,
    ) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let active = artists::table
                .filter(artists::artist_id.eq(artist_id.value()))
                .select(artists::is_active)
                .first::<bool>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            // Unknown artists are not blocked by the directory.
            Ok(active.unwrap_or(true))
        })
        .await
    }

    async fn bed_is_available(&self, bed_id: BedId, _date: NaiveDate) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let active = beds::table
                .filter(beds::bed_id.eq(bed_id.value()))
                .select(beds::is_active)
                .first::<bool>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            Ok(active.unwrap_or(true))
        })
        .await
    }
}
