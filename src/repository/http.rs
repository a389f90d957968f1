//! HTTP Persistence
//!
//! REST client for the items API. Bodies are JSON; the whole tree travels as
//! `{ "notesTree": [...] }`.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::{Item, ItemDraft, ItemId, ItemPatch, Tree};

use super::error::{PersistResult, PersistenceError};
use super::traits::Persistence;

// Ids are opaque; anything outside the unreserved set is escaped in paths.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeEnvelope {
    notes_tree: Tree,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody<'a> {
    new_parent_id: Option<&'a ItemId>,
    new_index: usize,
}

pub struct HttpPersistence {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPersistence {
    pub fn new(config: &ApiConfig) -> PersistResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn encode(id: &ItemId) -> String {
        utf8_percent_encode(id.as_str(), PATH_SEGMENT).to_string()
    }

    pub(crate) fn items_url(&self, parent: Option<&ItemId>) -> String {
        match parent {
            Some(parent) => format!("{}/items/{}", self.base_url, Self::encode(parent)),
            None => format!("{}/items", self.base_url),
        }
    }

    pub(crate) fn item_url(&self, id: &ItemId) -> String {
        format!("{}/items/{}", self.base_url, Self::encode(id))
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> PersistResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(PersistenceError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> PersistResult<T> {
        let response = Self::check(builder.send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_empty(builder: RequestBuilder) -> PersistResult<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl Persistence for HttpPersistence {
    async fn fetch_tree(&self) -> PersistResult<Tree> {
        debug!("GET /items");
        let envelope: TreeEnvelope = Self::send_json(self.request(Method::GET, self.items_url(None))).await?;
        Ok(envelope.notes_tree)
    }

    async fn create_item(&self, parent: Option<&ItemId>, draft: &ItemDraft) -> PersistResult<Item> {
        debug!(parent = ?parent, label = %draft.label, "POST /items");
        Self::send_json(self.request(Method::POST, self.items_url(parent)).json(draft)).await
    }

    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> PersistResult<Item> {
        debug!(%id, "PATCH /items/:id");
        Self::send_json(self.request(Method::PATCH, self.item_url(id)).json(patch)).await
    }

    async fn delete_item(&self, id: &ItemId) -> PersistResult<()> {
        debug!(%id, "DELETE /items/:id");
        Self::send_empty(self.request(Method::DELETE, self.item_url(id))).await
    }

    async fn move_item(
        &self,
        id: &ItemId,
        new_parent: Option<&ItemId>,
        new_index: usize,
    ) -> PersistResult<()> {
        debug!(%id, parent = ?new_parent, new_index, "PATCH /items/:id/move");
        let body = MoveBody {
            new_parent_id: new_parent,
            new_index,
        };
        let url = format!("{}/move", self.item_url(id));
        Self::send_empty(self.request(Method::PATCH, url).json(&body)).await
    }

    async fn replace_tree(&self, tree: &Tree) -> PersistResult<Tree> {
        debug!(items = tree.item_count(), "PUT /items/tree");
        let body = TreeEnvelope {
            notes_tree: tree.clone(),
        };
        let url = format!("{}/items/tree", self.base_url);
        let envelope: TreeEnvelope = Self::send_json(self.request(Method::PUT, url).json(&body)).await?;
        Ok(envelope.notes_tree)
    }
}
