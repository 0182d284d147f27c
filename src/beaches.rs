// src/beaches.rs
//! Beach repository seam. Real persistence lives outside this crate; the
//! in-memory store backs the binary and the tests.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Beach;

#[async_trait]
pub trait BeachRepository: Send + Sync {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Beach>>;
    async fn create(&self, beach: Beach) -> Result<Beach>;
}

pub type DynBeachRepository = Arc<dyn BeachRepository>;

#[derive(Debug, Default)]
pub struct InMemoryBeachRepository {
    inner: RwLock<Vec<Beach>>,
}

impl InMemoryBeachRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_beaches(beaches: Vec<Beach>) -> Self {
        Self {
            inner: RwLock::new(beaches),
        }
    }
}

#[async_trait]
impl BeachRepository for InMemoryBeachRepository {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Beach>> {
        let v = self.inner.read().expect("beach store lock poisoned");
        Ok(v.iter().filter(|b| b.owner_id == owner_id).cloned().collect())
    }

    async fn create(&self, beach: Beach) -> Result<Beach> {
        let mut v = self.inner.write().expect("beach store lock poisoned");
        v.push(beach.clone());
        Ok(beach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPosition;

    fn beach(name: &str, owner: &str) -> Beach {
        Beach {
            name: name.into(),
            lat: -33.792726,
            lng: 151.289824,
            position: GeoPosition::E,
            owner_id: owner.into(),
        }
    }

    #[tokio::test]
    async fn find_by_owner_keeps_insertion_order() {
        let repo = InMemoryBeachRepository::new();
        repo.create(beach("Manly", "u1")).await.unwrap();
        repo.create(beach("Bondi", "u2")).await.unwrap();
        repo.create(beach("Dee Why", "u1")).await.unwrap();

        let names: Vec<String> = repo
            .find_by_owner("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Manly".to_string(), "Dee Why".into()]);
        assert!(repo.find_by_owner("nobody").await.unwrap().is_empty());
    }
}
