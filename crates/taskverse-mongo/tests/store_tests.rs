//! Store integration tests.
//!
//! These exercise a real MongoDB instance (`MONGODB_URI` or localhost) and
//! are ignored by default. Run with `cargo test -p taskverse-mongo -- --ignored`.

use bson::oid::ObjectId;
use bson::{doc, Document};
use serde_json::json;

use taskverse_models::{AcceptedTask, Job};
use taskverse_mongo::query::{JobFilter, Page, SortKey};
use taskverse_mongo::repos::parse_object_id;
use taskverse_mongo::{MongoStore, StoreConfig};

const TEST_DATABASE: &str = "TaskVerseDBTest";

async fn test_store() -> MongoStore {
    let mut config = StoreConfig::from_env();
    config.database = TEST_DATABASE.to_string();
    MongoStore::connect(config).await.expect("store init")
}

fn job_document(marker: &str, title: &str, price: f64, created_at_ms: i64) -> Document {
    doc! {
        "title": title,
        "description": format!("{title} description"),
        "category": marker,
        "price": price,
        "postedByEmail": format!("{marker}@example.com"),
        "created_at": bson::DateTime::from_millis(created_at_ms),
    }
}

async fn seed_jobs(store: &MongoStore, marker: &str, entries: &[(&str, f64)]) -> Vec<ObjectId> {
    let jobs = store.jobs();
    let mut ids = Vec::new();
    for (i, (title, price)) in entries.iter().enumerate() {
        let document = job_document(marker, title, *price, 1_700_000_000_000 + i as i64 * 1_000);
        let report = jobs.insert(document).await.expect("insert");
        ids.push(parse_object_id(report.inserted_id.as_str().unwrap()).unwrap());
    }
    ids
}

async fn remove_jobs(store: &MongoStore, ids: &[ObjectId]) {
    let jobs = store.jobs();
    for id in ids {
        jobs.delete(*id).await.expect("cleanup");
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn insert_then_get_round_trips() {
    let store = test_store().await;
    let jobs = store.jobs();

    let job: Job = serde_json::from_value(json!({
        "title": "Design a logo",
        "description": "Vector logo for a coffee brand",
        "category": "Design",
        "price": 150.0,
        "postedByEmail": "roundtrip@example.com",
        "deadline": "2024-07-01"
    }))
    .unwrap();

    let report = jobs.insert(job.into_document()).await.unwrap();
    assert!(report.acknowledged);
    let id = parse_object_id(report.inserted_id.as_str().unwrap()).unwrap();

    let stored = jobs.get(id).await.unwrap().expect("job present");
    assert_eq!(stored.get_object_id("_id").unwrap(), id);
    assert_eq!(stored.get_str("title").unwrap(), "Design a logo");
    assert_eq!(stored.get_str("deadline").unwrap(), "2024-07-01");
    assert!(stored.get_datetime("created_at").is_ok());

    remove_jobs(&store, &[id]).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn search_pages_and_counts_the_full_match_set() {
    let store = test_store().await;
    let marker = ObjectId::new().to_hex();
    let ids = seed_jobs(
        &store,
        &marker,
        &[("job-1", 10.0), ("job-2", 20.0), ("job-3", 30.0), ("job-4", 40.0), ("job-5", 50.0)],
    )
    .await;

    let filter = JobFilter::new().category(marker.clone());
    let jobs = store.jobs();

    let (page, total) = jobs
        .search(&filter, SortKey::Newest, Page::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(total, 5);
    assert_eq!(page[0].get_str("title").unwrap(), "job-5");

    let (last_page, total) = jobs
        .search(&filter, SortKey::Newest, Page::new(3, 2))
        .await
        .unwrap();
    assert_eq!(last_page.len(), 1);
    assert_eq!(total, 5);
    assert_eq!(last_page[0].get_str("title").unwrap(), "job-1");

    remove_jobs(&store, &ids).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn price_bounds_are_inclusive_on_both_ends() {
    let store = test_store().await;
    let marker = ObjectId::new().to_hex();
    let ids = seed_jobs(
        &store,
        &marker,
        &[("cheap", 10.0), ("mid", 20.0), ("dear", 30.0)],
    )
    .await;

    let filter = JobFilter::new()
        .category(marker.clone())
        .price_range(Some(10.0), Some(20.0));
    let (matched, total) = store
        .jobs()
        .search(&filter, SortKey::PriceAsc, Page::default())
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(matched[0].get_str("title").unwrap(), "cheap");
    assert_eq!(matched[1].get_str("title").unwrap(), "mid");

    remove_jobs(&store, &ids).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn search_matches_title_and_description_case_insensitively() {
    let store = test_store().await;
    let marker = ObjectId::new().to_hex();
    let ids = seed_jobs(&store, &marker, &[("Logo Design", 10.0), ("Backend work", 20.0)]).await;

    let filter = JobFilter::new().category(marker.clone()).search("lOgO");
    let (matched, total) = store
        .jobs()
        .search(&filter, SortKey::Newest, Page::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(matched[0].get_str("title").unwrap(), "Logo Design");

    // "description" fields contain the title text too
    let filter = JobFilter::new().category(marker.clone()).search("backend WORK desc");
    let (_, total) = store
        .jobs()
        .search(&filter, SortKey::Newest, Page::default())
        .await
        .unwrap();
    assert_eq!(total, 1);

    remove_jobs(&store, &ids).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn sort_keys_order_the_results() {
    let store = test_store().await;
    let marker = ObjectId::new().to_hex();
    let ids = seed_jobs(
        &store,
        &marker,
        &[("oldest-cheapest", 5.0), ("middle", 15.0), ("newest-dearest", 25.0)],
    )
    .await;

    let filter = JobFilter::new().category(marker.clone());
    let jobs = store.jobs();

    let (by_age, _) = jobs.search(&filter, SortKey::Oldest, Page::default()).await.unwrap();
    assert_eq!(by_age[0].get_str("title").unwrap(), "oldest-cheapest");

    let (by_price, _) = jobs
        .search(&filter, SortKey::PriceDesc, Page::default())
        .await
        .unwrap();
    assert_eq!(by_price[0].get_str("title").unwrap(), "newest-dearest");

    remove_jobs(&store, &ids).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn accepted_task_always_gets_a_fresh_id() {
    let store = test_store().await;
    let tasks = store.accepted_tasks();
    let email = format!("{}@example.com", ObjectId::new().to_hex());

    let task: AcceptedTask = serde_json::from_value(json!({
        "userEmail": email,
        "_id": "665f0e2a9b3c4d5e6f708192",
        "jobTitle": "Design a logo"
    }))
    .unwrap();

    let report = tasks.insert(task.into_document()).await.unwrap();
    let id_hex = report.inserted_id.as_str().unwrap().to_string();
    assert_ne!(id_hex, "665f0e2a9b3c4d5e6f708192");

    let listed = tasks.for_user(&email).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].get_str("jobTitle").unwrap(), "Design a logo");

    let report = tasks.delete(parse_object_id(&id_hex).unwrap()).await.unwrap();
    assert_eq!(report.deleted_count, 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn deleting_a_missing_id_reports_zero() {
    let store = test_store().await;
    let report = store.jobs().delete(ObjectId::new()).await.unwrap();
    assert!(report.acknowledged);
    assert_eq!(report.deleted_count, 0);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn per_user_counts_match_inserted_documents() {
    let store = test_store().await;
    let marker = ObjectId::new().to_hex();
    let email = format!("{marker}@example.com");
    let ids = seed_jobs(&store, &marker, &[("a", 1.0), ("b", 2.0)]).await;

    let task: AcceptedTask =
        serde_json::from_value(json!({ "userEmail": email, "jobTitle": "a" })).unwrap();
    let task_report = store.accepted_tasks().insert(task.into_document()).await.unwrap();

    assert_eq!(store.jobs().count_posted_by(&email).await.unwrap(), 2);
    assert_eq!(store.accepted_tasks().count_for_user(&email).await.unwrap(), 1);
    assert!(store.jobs().estimated_total().await.unwrap() >= 2);

    let task_id = parse_object_id(task_report.inserted_id.as_str().unwrap()).unwrap();
    store.accepted_tasks().delete(task_id).await.unwrap();
    remove_jobs(&store, &ids).await;
}
