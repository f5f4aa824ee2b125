//! Typed repositories for the jobs and accepted-tasks collections.

use std::future::Future;
use std::time::Instant;

use bson::oid::ObjectId;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::Collection;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::metrics;
use crate::query::{JobFilter, Page, SortKey};
use crate::report::{DeleteReport, InsertReport, UpdateReport};

/// Parse a 24-char hex string into an ObjectId.
pub fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::invalid_id(id))
}

/// Run a store operation, recording latency and outcome.
async fn timed<T>(operation: &str, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
    let start = Instant::now();
    let result = fut.await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    metrics::record_request(operation, outcome, start.elapsed());
    result
}

/// Repository for job documents.
#[derive(Clone)]
pub struct JobRepository {
    collection: Collection<Document>,
}

impl JobRepository {
    pub(crate) fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    /// One page of jobs matching `filter`, plus the total match count over
    /// the same filter ignoring pagination.
    pub async fn search(
        &self,
        filter: &JobFilter,
        sort: SortKey,
        page: Page,
    ) -> StoreResult<(Vec<Document>, u64)> {
        let filter = filter.to_document();
        timed("jobs.search", async {
            let mut find = self
                .collection
                .find(filter.clone())
                .skip(page.skip())
                .limit(page.limit());
            if let Some(sort) = sort.to_document() {
                find = find.sort(sort);
            }
            let jobs: Vec<Document> = find.await?.try_collect().await?;
            let total = self.collection.count_documents(filter).await?;
            Ok((jobs, total))
        })
        .await
    }

    /// The `count` most recently created jobs.
    pub async fn latest(&self, count: i64) -> StoreResult<Vec<Document>> {
        timed("jobs.latest", async {
            let cursor = self
                .collection
                .find(doc! {})
                .sort(doc! { "created_at": -1 })
                .limit(count)
                .await?;
            Ok(cursor.try_collect().await?)
        })
        .await
    }

    /// All jobs in creation-time order, or store order for
    /// [`SortKey::Unordered`].
    pub async fn by_date(&self, sort: SortKey) -> StoreResult<Vec<Document>> {
        timed("jobs.by_date", async {
            let mut find = self.collection.find(doc! {});
            if let Some(sort) = sort.to_document() {
                find = find.sort(sort);
            }
            Ok(find.await?.try_collect().await?)
        })
        .await
    }

    /// Look up a single job by id.
    pub async fn get(&self, id: ObjectId) -> StoreResult<Option<Document>> {
        timed("jobs.get", async {
            Ok(self.collection.find_one(doc! { "_id": id }).await?)
        })
        .await
    }

    /// All jobs posted by the given email, newest first.
    pub async fn posted_by(&self, email: &str) -> StoreResult<Vec<Document>> {
        timed("jobs.posted_by", async {
            let cursor = self
                .collection
                .find(doc! { "postedByEmail": email })
                .sort(doc! { "created_at": -1 })
                .await?;
            Ok(cursor.try_collect().await?)
        })
        .await
    }

    /// Insert a new job document.
    pub async fn insert(&self, document: Document) -> StoreResult<InsertReport> {
        timed("jobs.insert", async {
            let result = self.collection.insert_one(document).await?;
            info!(id = %result.inserted_id, "Inserted job");
            Ok(InsertReport::from(result))
        })
        .await
    }

    /// Apply a `$set` patch to the job matching `id`.
    pub async fn update(&self, id: ObjectId, set: Document) -> StoreResult<UpdateReport> {
        timed("jobs.update", async {
            let result = self
                .collection
                .update_one(doc! { "_id": id }, doc! { "$set": set })
                .await?;
            Ok(UpdateReport::from(result))
        })
        .await
    }

    /// Delete the job matching `id`. Missing ids report zero deletions.
    pub async fn delete(&self, id: ObjectId) -> StoreResult<DeleteReport> {
        timed("jobs.delete", async {
            let result = self.collection.delete_one(doc! { "_id": id }).await?;
            Ok(DeleteReport::from(result))
        })
        .await
    }

    /// Exact count of jobs posted by the given email.
    pub async fn count_posted_by(&self, email: &str) -> StoreResult<u64> {
        timed("jobs.count_posted_by", async {
            Ok(self
                .collection
                .count_documents(doc! { "postedByEmail": email })
                .await?)
        })
        .await
    }

    /// Estimated total job count from collection metadata.
    pub async fn estimated_total(&self) -> StoreResult<u64> {
        timed("jobs.estimated_total", async {
            Ok(self.collection.estimated_document_count().await?)
        })
        .await
    }
}

/// Repository for accepted-task documents.
#[derive(Clone)]
pub struct AcceptedTaskRepository {
    collection: Collection<Document>,
}

impl AcceptedTaskRepository {
    pub(crate) fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    /// All tasks accepted by the given email, most recent first.
    pub async fn for_user(&self, email: &str) -> StoreResult<Vec<Document>> {
        timed("tasks.for_user", async {
            let cursor = self
                .collection
                .find(doc! { "userEmail": email })
                .sort(doc! { "accepted_at": -1 })
                .await?;
            Ok(cursor.try_collect().await?)
        })
        .await
    }

    /// Insert a new accepted-task document.
    pub async fn insert(&self, document: Document) -> StoreResult<InsertReport> {
        timed("tasks.insert", async {
            let result = self.collection.insert_one(document).await?;
            info!(id = %result.inserted_id, "Inserted accepted task");
            Ok(InsertReport::from(result))
        })
        .await
    }

    /// Delete the task matching `id`. Missing ids report zero deletions.
    pub async fn delete(&self, id: ObjectId) -> StoreResult<DeleteReport> {
        timed("tasks.delete", async {
            let result = self.collection.delete_one(doc! { "_id": id }).await?;
            Ok(DeleteReport::from(result))
        })
        .await
    }

    /// Exact count of tasks accepted by the given email.
    pub async fn count_for_user(&self, email: &str) -> StoreResult<u64> {
        timed("tasks.count_for_user", async {
            Ok(self
                .collection
                .count_documents(doc! { "userEmail": email })
                .await?)
        })
        .await
    }
}
