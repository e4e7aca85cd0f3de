//! The persistence contract exercised through `Arc<dyn FullRepository>`,
//! the handle shape every caller in the crate holds.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use inkbook::api::{AppointmentStatus, ArtistId, BedId, ClientId, ServiceType};
use inkbook::db::repositories::LocalRepository;
use inkbook::db::repository::{FullRepository, RepositoryError};
use inkbook::models::NewAppointment;

fn repository() -> Arc<dyn FullRepository> {
    Arc::new(LocalRepository::new())
}

fn request(artist: i64, date: NaiveDate, hour: u32, minute: u32) -> NewAppointment {
    NewAppointment {
        client_id: ClientId::new(1),
        artist_id: ArtistId::new(artist),
        bed_id: None,
        date,
        start_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        duration_minutes: 60,
        service_type: ServiceType::Tattoo,
        price: None,
        notes: None,
    }
}

fn april(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

#[tokio::test]
async fn test_crud_round_trip_through_trait_object() {
    let repo = repository();

    let stored = repo
        .store_appointment(&request(7, april(10), 11, 0))
        .await
        .unwrap();
    assert_eq!(stored.status, AppointmentStatus::Scheduled);

    let mut changed = stored.clone();
    changed.status = AppointmentStatus::Confirmed;
    changed.price = Some(220.0);
    let updated = repo.update_appointment(&changed).await.unwrap();
    assert!(updated.updated_at >= stored.updated_at);
    assert_eq!(updated.created_at, stored.created_at);

    let fetched = repo.get_appointment(stored.id).await.unwrap();
    assert_eq!(fetched.status, AppointmentStatus::Confirmed);
    assert_eq!(fetched.price, Some(220.0));

    repo.delete_appointment(stored.id).await.unwrap();
    assert!(matches!(
        repo.get_appointment(stored.id).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_stores_assign_distinct_ids() {
    let repo = repository();

    let req_a = request(7, april(10), 9, 0);
    let req_b = request(8, april(10), 10, 0);
    let req_c = request(9, april(11), 11, 0);
    let (a, b, c) = tokio::join!(
        repo.store_appointment(&req_a),
        repo.store_appointment(&req_b),
        repo.store_appointment(&req_c),
    );
    let ids = [a.unwrap().id, b.unwrap().id, c.unwrap().id];
    assert!(ids[0] != ids[1] && ids[1] != ids[2] && ids[0] != ids[2]);

    let all = repo.list_appointments().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test]
async fn test_artist_history_spans_dates_in_order() {
    let repo = repository();

    repo.store_appointment(&request(7, april(20), 9, 0))
        .await
        .unwrap();
    repo.store_appointment(&request(7, april(18), 16, 0))
        .await
        .unwrap();
    repo.store_appointment(&request(7, april(18), 9, 30))
        .await
        .unwrap();
    repo.store_appointment(&request(8, april(18), 9, 30))
        .await
        .unwrap();

    let history = repo
        .appointments_by_artist(ArtistId::new(7), None, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|a| a.artist_id == ArtistId::new(7)));
    assert_eq!(history[0].date, april(18));
    assert_eq!(history[0].start_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_eq!(history[1].start_time, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
    assert_eq!(history[2].date, april(20));
}

#[tokio::test]
async fn test_open_ended_date_bounds() {
    let repo = repository();

    repo.store_appointment(&request(7, april(18), 10, 0))
        .await
        .unwrap();
    repo.store_appointment(&request(7, april(18), 14, 0))
        .await
        .unwrap();
    repo.store_appointment(&request(7, april(20), 10, 0))
        .await
        .unwrap();

    let from_19th = repo
        .appointments_by_artist(ArtistId::new(7), Some(april(19)), None)
        .await
        .unwrap();
    assert_eq!(from_19th.len(), 1);
    assert_eq!(from_19th[0].date, april(20));

    let until_18th = repo
        .appointments_by_artist(ArtistId::new(7), None, Some(april(18)))
        .await
        .unwrap();
    assert_eq!(until_18th.len(), 2);
}

#[tokio::test]
async fn test_cloned_handles_share_storage() {
    let local = LocalRepository::new();
    local.upsert_artist(ArtistId::new(7), false);
    local.upsert_bed(BedId::new(2), false);

    let repo: Arc<dyn FullRepository> = Arc::new(local.clone());
    assert!(!repo
        .artist_is_available(ArtistId::new(7), april(10))
        .await
        .unwrap());
    assert!(!repo.bed_is_available(BedId::new(2), april(10)).await.unwrap());
    assert!(repo
        .artist_is_available(ArtistId::new(9), april(10))
        .await
        .unwrap());

    // Flipping the flag on the original handle shows through the clone.
    local.upsert_artist(ArtistId::new(7), true);
    assert!(repo
        .artist_is_available(ArtistId::new(7), april(10))
        .await
        .unwrap());
}
