//! Example demonstrating repository pattern usage.
//!
//! Shows how the scheduling core is assembled from a repository, a
//! commission ledger and the scheduling service, and how storage
//! backends swap without touching the calling code.
//!
//! Run with: `cargo run --example repository_usage`

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use inkbook::api::{AppointmentStatus, ArtistId, ClientId, ServiceType};
use inkbook::db::{
    FullRepository, RepositoryBuilder, RepositoryError, RepositoryFactory, RepositoryType,
};
use inkbook::ledger::RecordingLedger;
use inkbook::models::NewAppointment;
use inkbook::scheduler::{SchedulingError, SchedulingService};

fn walk_in(artist: i64, date: NaiveDate, hour: u32, minute: u32) -> NewAppointment {
    NewAppointment {
        client_id: ClientId::new(1),
        artist_id: ArtistId::new(artist),
        bed_id: None,
        date,
        start_time: NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time"),
        duration_minutes: 60,
        service_type: ServiceType::Tattoo,
        price: Some(200.0),
        notes: None,
    }
}

fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
}

/// Example 1: Environment-driven backend selection
async fn example_basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Example 1: Basic Usage ===");

    // Picks the backend from REPOSITORY_TYPE / DATABASE_URL; falls back
    // to the in-memory repository when neither is set.
    let repo = RepositoryFactory::from_env().await?;

    let is_healthy = repo.health_check().await?;
    println!("Repository healthy: {}", is_healthy);

    let stored = repo.store_appointment(&walk_in(7, saturday(), 14, 0)).await?;
    println!(
        "Stored appointment {} for artist {} on {}",
        stored.id, stored.artist_id, stored.date
    );

    let all = repo.list_appointments().await?;
    println!("Repository now holds {} appointment(s)", all.len());

    Ok(())
}

/// Example 2: Using the builder pattern
async fn example_builder_pattern() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Example 2: Builder Pattern ===");

    let repo = RepositoryBuilder::new()
        .repository_type(RepositoryType::Local)
        .build()
        .await?;

    println!("Created local repository");
    println!("Health check: {}", repo.health_check().await?);

    Ok(())
}

/// Example 3: Dependency injection pattern
struct FrontDesk {
    scheduler: SchedulingService,
}

impl FrontDesk {
    pub fn new(repo: Arc<dyn FullRepository>, ledger: Arc<RecordingLedger>) -> Self {
        Self {
            scheduler: SchedulingService::new(repo, ledger),
        }
    }

    pub async fn book(&self, request: NewAppointment) -> Result<String, SchedulingError> {
        let appointment = self.scheduler.create_appointment(request).await?;
        Ok(format!(
            "appointment {} with artist {} at {}",
            appointment.id, appointment.artist_id, appointment.start_time
        ))
    }
}

async fn example_dependency_injection() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Example 3: Dependency Injection ===");

    let repo = RepositoryFactory::create_local();
    let ledger = Arc::new(RecordingLedger::new());
    let desk = FrontDesk::new(repo, ledger);

    let summary = desk.book(walk_in(7, saturday(), 10, 0)).await?;
    println!("Booked {}", summary);

    Ok(())
}

/// Example 4: Conflict detection
async fn example_conflict_detection() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Example 4: Conflict Detection ===");

    let repo = RepositoryFactory::create_local();
    let ledger = Arc::new(RecordingLedger::new());
    let scheduler = SchedulingService::new(repo, ledger);

    let first = scheduler
        .create_appointment(walk_in(7, saturday(), 14, 0))
        .await?;
    println!("Booked appointment {} at 14:00", first.id);

    // The same artist cannot take an overlapping slot.
    match scheduler
        .create_appointment(walk_in(7, saturday(), 14, 30))
        .await
    {
        Ok(appointment) => println!("Unexpectedly booked {}", appointment.id),
        Err(SchedulingError::Conflict { conflicts }) => {
            for conflict in &conflicts {
                println!("Expected conflict ({:?}): {}", conflict.kind, conflict.message);
            }
        }
        Err(e) => println!("Unexpected error: {}", e),
    }

    Ok(())
}

/// Example 5: Lifecycle and commission
async fn example_lifecycle_and_commission() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Example 5: Lifecycle and Commission ===");

    let repo = RepositoryFactory::create_local();
    let ledger = Arc::new(RecordingLedger::new());
    let scheduler = SchedulingService::new(repo, ledger.clone());

    let appointment = scheduler
        .create_appointment(walk_in(7, saturday(), 16, 0))
        .await?;

    for status in [
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
    ] {
        let outcome = scheduler.update_status(appointment.id, status).await?;
        println!("Appointment {} is now {}", appointment.id, outcome.appointment.status);
    }

    for record in ledger.records() {
        println!(
            "Commission: {:.2} ({}% of {:.2}) for artist {}",
            record.commission_amount,
            record.rate * 100.0,
            record.base_amount,
            record.artist_id
        );
    }

    Ok(())
}

/// Example 6: Switching implementations
async fn example_switching_implementations() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Example 6: Switching Implementations ===");

    // Works against any backend implementing the repository traits.
    async fn count_bookings(
        repo: &dyn FullRepository,
        date: NaiveDate,
    ) -> Result<usize, RepositoryError> {
        Ok(repo.appointments_on(date).await?.len())
    }

    let local_repo = RepositoryFactory::create_local();
    local_repo.store_appointment(&walk_in(7, saturday(), 9, 0)).await?;
    let count = count_bookings(&*local_repo, saturday()).await?;
    println!("Local repository bookings on {}: {}", saturday(), count);

    // The same function works against Postgres (requires configuration):
    // let pg_repo = RepositoryFactory::from_env().await?;
    // let pg_count = count_bookings(&*pg_repo, saturday()).await?;

    Ok(())
}


#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Scheduling Core Examples\n");

    example_basic_usage().await?;
    example_builder_pattern().await?;
    example_dependency_injection().await?;
    example_conflict_detection().await?;
    example_lifecycle_and_commission().await?;
    example_switching_implementations().await?;

    println!("\nAll examples completed");
    Ok(())
}
