use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::error::Result;
use crate::outline::{Heading, OutlineItem, flatten_outline};

/// Host endpoint answering document outlines.
pub const OUTLINE_PATH: &str = "/api/outline/getDocOutline";

/// Request/response channel to the host query interface.
#[async_trait]
pub trait QueryTransport: Send + Sync {
	/// Posts `body` to `path` and returns the raw response document.
	async fn post(&self, path: &str, body: Value) -> Result<Value>;
}

/// Fetches outlines, degrading every failure to "no outline".
#[derive(Debug, Clone)]
pub struct OutlineClient<T> {
	transport: T,
}

impl<T: QueryTransport> OutlineClient<T> {
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Fetches the outline of `id`, surfacing failures.
	///
	/// `preview` asks the host for the read-only preview rendering used by
	/// search and history surfaces.
	pub async fn try_doc_outline(&self, id: &str, preview: bool) -> Result<Vec<OutlineItem>> {
		let raw = self
			.transport
			.post(OUTLINE_PATH, json!({ "id": id, "preview": preview }))
			.await?;
		let envelope: Envelope<Vec<OutlineItem>> = serde_json::from_value(raw)?;
		Ok(envelope.into_result()?.unwrap_or_default())
	}

	/// Fetches the outline of `id`; any failure yields an empty outline.
	pub async fn doc_outline(&self, id: &str, preview: bool) -> Vec<OutlineItem> {
		match self.try_doc_outline(id, preview).await {
			Ok(items) => {
				debug!(id, count = items.len(), "query.outline_fetched");
				items
			}
			Err(error) => {
				warn!(id, %error, "query.outline_unavailable");
				Vec::new()
			}
		}
	}

	/// Fetches and flattens the outline of `id` for display.
	pub async fn doc_headings(&self, id: &str, preview: bool) -> Vec<Heading> {
		flatten_outline(&self.doc_outline(id, preview).await)
	}
}
