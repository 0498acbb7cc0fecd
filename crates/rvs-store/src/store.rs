use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Local, SubsecRound};
use rvs_core::{LocationSet, Review};
use uuid::Uuid;

use crate::error::{StoreError, ValidationError};

#[derive(Debug, Default)]
struct Inner {
    reviews: Vec<Arc<Review>>,
    ids: HashSet<String>,
    seeded: bool,
}

/// Append-only review collection shared between request handlers.
///
/// Appends take the write lock for id assignment and insertion together;
/// snapshots take the read lock, so readers never see a half-inserted review
/// and never block each other.
#[derive(Debug)]
pub struct ReviewStore {
    locations: LocationSet,
    inner: RwLock<Inner>,
}

impl ReviewStore {
    #[must_use]
    pub fn new(locations: LocationSet) -> Self {
        Self {
            locations,
            inner: RwLock::new(Inner::default()),
        }
    }

    #[must_use]
    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    // Writers push last, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the store with preloaded reviews. Allowed once, before serving.
    ///
    /// Preloaded reviews may lack an id and are not checked against the
    /// allowed-location set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadySeeded`] on a second call or after an append,
    /// and [`StoreError::DuplicateId`] if two records share an id. Nothing is
    /// inserted on error.
    pub fn load_initial(&self, records: Vec<Review>) -> Result<usize, StoreError> {
        let mut inner = self.write();
        if inner.seeded || !inner.reviews.is_empty() {
            return Err(StoreError::AlreadySeeded);
        }

        let mut ids = HashSet::new();
        for id in records.iter().filter_map(|r| r.id.as_ref()) {
            if !ids.insert(id.clone()) {
                return Err(StoreError::DuplicateId(id.clone()));
            }
        }

        let count = records.len();
        inner.ids = ids;
        inner.reviews = records.into_iter().map(Arc::new).collect();
        inner.seeded = true;
        drop(inner);

        tracing::info!(count, "review store seeded");
        Ok(count)
    }

    /// Validate and append a newly submitted review, stamping a fresh id and
    /// the current local time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `location` is not allowed or `body` is empty.
    pub fn append(&self, location: &str, body: &str) -> Result<Review, ValidationError> {
        if !self.locations.contains(location) {
            return Err(ValidationError::InvalidLocation(location.to_string()));
        }
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        let timestamp = Local::now().naive_local().trunc_subsecs(0);

        let mut inner = self.write();
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !inner.ids.contains(&candidate) {
                break candidate;
            }
        };
        inner.ids.insert(id.clone());

        let review = Review {
            id: Some(id),
            body: body.to_string(),
            location: location.to_string(),
            timestamp,
        };
        inner.reviews.push(Arc::new(review.clone()));
        drop(inner);

        tracing::debug!(review_id = ?review.id, location, "review appended");
        Ok(review)
    }

    /// All reviews in insertion order, as of one point in time.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Review>> {
        self.read().reviews.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().reviews.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new(LocationSet::default())
    }
}
