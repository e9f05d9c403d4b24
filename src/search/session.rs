use std::sync::Arc;

use tracing::info;

use crate::api::error::ApiResult;
use crate::api::models::ContentObject;
use crate::api::ContentApiClient;
use crate::cache::{CachedResult, ResultCache};
use crate::search::gate::{GateDecision, SearchGate};

/// One search screen's worth of state: the gate, the selected content
/// type, a single in-flight flag and a read-through result cache.
///
/// Overlapping automatic queries are suppressed by the flag rather than by
/// cancelling anything in flight; manual triggers are never suppressed.
pub struct SearchSession {
    client: Arc<ContentApiClient>,
    cache: ResultCache,
    gate: SearchGate,
    content_type: String,
    in_flight: bool,
}

impl SearchSession {
    pub fn new(client: Arc<ContentApiClient>, content_type: impl Into<String>) -> Self {
        Self {
            client,
            cache: ResultCache::new(),
            gate: SearchGate::new(),
            content_type: content_type.into(),
            in_flight: false,
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn gate(&self) -> &SearchGate {
        &self.gate
    }

    /// Feed a new input value through the gate; queries when it fires.
    /// `Ok(None)` means the input was accepted without a query.
    pub async fn on_input(&mut self, text: &str) -> ApiResult<Option<Vec<ContentObject>>> {
        match self.gate.offer(text, self.in_flight) {
            GateDecision::Query => Ok(Some(self.run_query().await?)),
            GateDecision::Hold => Ok(None),
        }
    }

    /// Manual confirmation: re-query when the gate armed earlier,
    /// regardless of in-flight state.
    pub async fn confirm(&mut self) -> ApiResult<Option<Vec<ContentObject>>> {
        if self.gate.confirm() {
            Ok(Some(self.run_query().await?))
        } else {
            Ok(None)
        }
    }

    /// Switch to a different content type. The switch always forces an
    /// immediate query, subject only to the minimum-length gate.
    pub async fn select_content_type(
        &mut self,
        name: &str,
    ) -> ApiResult<Option<Vec<ContentObject>>> {
        if name == self.content_type {
            return Ok(None);
        }
        self.content_type = name.to_string();
        self.gate.force();
        if self.gate.has_queryable_input() {
            Ok(Some(self.run_query().await?))
        } else {
            Ok(None)
        }
    }

    /// Most recent result for the current (content type, query) key.
    pub fn last_results(&self) -> Option<&CachedResult> {
        self.cache.get(&self.content_type, self.gate.query())
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    async fn run_query(&mut self) -> ApiResult<Vec<ContentObject>> {
        let query = self.gate.query().to_string();
        info!(target: "search", "Searching {} for '{}'", self.content_type, query);

        self.in_flight = true;
        let result = self.client.search(&self.content_type, &query).await;
        self.in_flight = false;

        let objects = result?;
        self.cache.put(&self.content_type, &query, &objects);
        Ok(objects)
    }
}
