use db::models::{
    house_photo::{CreateHousePhoto, HousePhoto},
    job_record::{CreateJobRecord, JobRecord, TaskKind, UpdateJobRecord},
    phase_assignment::{CreatePhaseAssignment, PhaseAssignment},
    worker::{CreateWorker, Worker},
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use uuid::Uuid;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::MIGRATOR.run(&pool).await.expect("migrations");
    pool
}

fn record_for_house(house_number: i64) -> CreateJobRecord {
    CreateJobRecord {
        house_number,
        sealant_minutes: Some(30),
        sealant_remarks: Some("rear elevation".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_and_fetch_job_record() {
    let pool = test_pool().await;
    let id = Uuid::new_v4();

    let created = JobRecord::create(&pool, &record_for_house(12), id)
        .await
        .unwrap();
    assert_eq!(created.id, id);
    assert_eq!(created.house_number, 12);
    assert_eq!(created.sealant_minutes, Some(30));
    assert!(created.deleted_at.is_none());
    assert!(created.performed(TaskKind::Sealant));
    assert!(!created.performed(TaskKind::Glazing));

    let fetched = JobRecord::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(fetched.house_number, 12);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn find_active_filters_by_house_and_worker() {
    let pool = test_pool().await;
    let worker = Worker::create(
        &pool,
        &CreateWorker {
            name: "Jan".to_string(),
            active: None,
        },
        Uuid::new_v4(),
    )
    .await
    .unwrap();
    assert!(worker.active);

    let mut with_worker = record_for_house(5);
    with_worker.worker_id = Some(worker.id);
    JobRecord::create(&pool, &with_worker, Uuid::new_v4())
        .await
        .unwrap();
    JobRecord::create(&pool, &record_for_house(5), Uuid::new_v4())
        .await
        .unwrap();
    let deleted = JobRecord::create(&pool, &record_for_house(5), Uuid::new_v4())
        .await
        .unwrap();
    JobRecord::soft_delete(&pool, deleted.id).await.unwrap();
    JobRecord::create(&pool, &record_for_house(9), Uuid::new_v4())
        .await
        .unwrap();

    let house_5 = JobRecord::find_active(&pool, Some(5), None).await.unwrap();
    assert_eq!(house_5.len(), 2);
    assert!(house_5.iter().all(|r| r.house_number == 5));

    let by_worker = JobRecord::find_active(&pool, None, Some(worker.id))
        .await
        .unwrap();
    assert_eq!(by_worker.len(), 1);

    let everything = JobRecord::find_all(&pool).await.unwrap();
    assert_eq!(everything.len(), 4, "find_all keeps soft-deleted rows");
}

#[tokio::test]
async fn partial_update_keeps_clears_and_sets_fields() {
    let pool = test_pool().await;
    let created = JobRecord::create(&pool, &record_for_house(3), Uuid::new_v4())
        .await
        .unwrap();

    let patch = UpdateJobRecord {
        sealant_remarks: Some(None),              // explicit null clears
        glazing_minutes: Some(Some(45)),          // set
        glazing_reinstalled: Some(Some(true)),
        ..Default::default()
    };
    let updated = JobRecord::update(&pool, created.id, &patch).await.unwrap();

    assert_eq!(updated.sealant_minutes, Some(30), "untouched field survives");
    assert_eq!(updated.sealant_remarks, None);
    assert_eq!(updated.glazing_minutes, Some(45));
    assert_eq!(updated.glazing_reinstalled, Some(true));
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_missing_or_deleted_record_is_not_found() {
    let pool = test_pool().await;

    let missing = JobRecord::update(&pool, Uuid::new_v4(), &UpdateJobRecord::default()).await;
    assert!(matches!(missing, Err(sqlx::Error::RowNotFound)));

    let created = JobRecord::create(&pool, &record_for_house(4), Uuid::new_v4())
        .await
        .unwrap();
    JobRecord::soft_delete(&pool, created.id).await.unwrap();

    let on_deleted = JobRecord::update(&pool, created.id, &UpdateJobRecord::default()).await;
    assert!(matches!(on_deleted, Err(sqlx::Error::RowNotFound)));

    let second_delete = JobRecord::soft_delete(&pool, created.id).await;
    assert!(matches!(second_delete, Err(sqlx::Error::RowNotFound)));
}

#[tokio::test]
async fn photos_round_trip_and_multi_house_lookup() {
    let pool = test_pool().await;
    for house_number in [1, 1, 2] {
        HousePhoto::create(
            &pool,
            &CreateHousePhoto {
                house_number,
                storage_key: format!("photos/{house_number}/{}.jpg", Uuid::new_v4()),
                thumbnail_key: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
    }

    let house_1 = HousePhoto::find_by_house(&pool, 1).await.unwrap();
    assert_eq!(house_1.len(), 2);

    let photos = HousePhoto::find_by_houses(&pool, &[1, 2, 99]).await.unwrap();
    assert_eq!(photos.len(), 3);

    let none = HousePhoto::find_by_houses(&pool, &[]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn mapping_import_first_row_wins_on_duplicates() {
    let pool = test_pool().await;
    let rows = vec![
        CreatePhaseAssignment {
            house_number: 10,
            phase_number: 1,
        },
        CreatePhaseAssignment {
            house_number: 11,
            phase_number: 1,
        },
        // duplicate house, later phase: must be discarded
        CreatePhaseAssignment {
            house_number: 10,
            phase_number: 2,
        },
    ];

    let outcome = PhaseAssignment::replace_all(&pool, &rows).await.unwrap();
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.discarded, 1);

    let stored = PhaseAssignment::find_all(&pool).await.unwrap();
    assert_eq!(stored.len(), 2);
    let house_10 = stored.iter().find(|a| a.house_number == 10).unwrap();
    assert_eq!(house_10.phase_number, 1);
}

#[tokio::test]
async fn mapping_reimport_replaces_previous_schedule() {
    let pool = test_pool().await;
    PhaseAssignment::replace_all(
        &pool,
        &[CreatePhaseAssignment {
            house_number: 1,
            phase_number: 1,
        }],
    )
    .await
    .unwrap();

    PhaseAssignment::replace_all(
        &pool,
        &[CreatePhaseAssignment {
            house_number: 2,
            phase_number: 3,
        }],
    )
    .await
    .unwrap();

    let stored = PhaseAssignment::find_all(&pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].house_number, 2);
    assert_eq!(stored[0].phase_number, 3);
}
