//! Option lists for relation pickers
//!
//! Resource pages load related-resource listings and map them to label/value
//! pairs; the engine renders whatever it is given. Loaded lists never go
//! stale on their own: they are cached by query key until explicitly
//! invalidated.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use crate::error::AppResult;

use super::field::SelectOption;
use super::service::{ListQuery, ResourceService};
use super::FormValues;

/// Cache of loaded option lists, keyed by query name.
#[derive(Default)]
pub struct OptionCache {
    entries: RwLock<HashMap<String, Arc<Vec<SelectOption>>>>,
}

impl OptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list for `key`, loading it once on a miss. The
    /// loader runs without the cache lock held.
    pub async fn get_or_load<F, Fut>(&self, key: &str, loader: F) -> AppResult<Arc<Vec<SelectOption>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<SelectOption>>>,
    {
        if let Some(options) = self.get(key) {
            return Ok(options);
        }
        let options = Arc::new(loader().await?);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), options.clone());
        }
        Ok(options)
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<SelectOption>>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    /// Drop a cached list so the next use reloads it.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// Load label/value pairs from a related resource's listing endpoint,
/// labeling by the given field and keying on `id`.
pub async fn load_named_options(
    service: &dyn ResourceService,
    page_size: i64,
    label_field: &str,
) -> AppResult<Vec<SelectOption>> {
    let query = ListQuery {
        filter: FormValues::new(),
        page: 1,
        page_size,
    };
    let page = service.list(&query).await?;
    Ok(page
        .data
        .iter()
        .filter_map(|row| {
            let label = row.get(label_field)?.as_str()?.to_string();
            let value = row.get("id")?.clone();
            Some(SelectOption { label, value })
        })
        .collect())
}
