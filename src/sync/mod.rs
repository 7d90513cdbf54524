//! Entity Synchronizer: list, create, update and delete against one backend
//! collection, keeping a [`Mirror`] of the last completed fetch.
//!
//! Update and delete are addressed by name but the backend only accepts
//! identifiers, so both run in two phases:
//!
//! 1. resolve: `GET /<collection>?<filter>=<name>` and pick a match
//! 2. act: `PUT`/`DELETE /<collection>/{id}`
//!
//! Nothing holds the entity between the two phases. Another client can
//! rename or delete it in between; the server then answers 404 and the
//! caller sees `ClientRejected(404)`. Callers that already know an
//! identifier should use the `*_by_id` operations, which skip phase 1.

mod mirror;

pub use mirror::{Mirror, MirrorSnapshot};

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, ApiRequest};
use crate::models::{required, EntityId, Resource, Updatable, Validate};
use crate::session::SessionStore;

/// How a name lookup that returns several entities is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvePolicy {
    /// Take the first entity the server returned
    FirstMatch,
    /// Fail with `Ambiguous` unless exactly one entity matched
    RequireUnique,
}

impl FromStr for ResolvePolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-match" => Ok(ResolvePolicy::FirstMatch),
            "unique" | "require-unique" => Ok(ResolvePolicy::RequireUnique),
            other => Err(ClientError::Config(format!("unknown resolve policy '{}'", other))),
        }
    }
}

pub struct EntitySynchronizer<R: Resource> {
    client: ApiClient,
    mirror: Mirror<R>,
    policy: ResolvePolicy,
}

impl<R: Resource> EntitySynchronizer<R> {
    pub fn new(client: ApiClient, policy: ResolvePolicy) -> Self {
        Self {
            client,
            mirror: Mirror::new(),
            policy,
        }
    }

    pub fn mirror(&self) -> &Mirror<R> {
        &self.mirror
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.client.session()
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    async fn fetch(&self, filter: Option<&str>) -> Result<Vec<R>> {
        let mut request = ApiRequest::get(R::collection_path());
        if let Some(term) = filter {
            request = request.query(R::FILTER_PARAM, term);
        }
        self.client.fetch_json(request).await
    }

    /// Fetch the collection, optionally filtered server-side, and replace the
    /// mirror with the result. A failed fetch leaves the mirror as it was.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<R>> {
        let items = self.fetch(filter).await?;
        tracing::debug!(resource = R::LABEL, count = items.len(), filter, "collection fetched");
        self.mirror.replace(items.clone(), filter.map(str::to_string));
        Ok(items)
    }

    /// Unfiltered `list`, discarding any filtered view in the mirror
    pub async fn refresh(&self) -> Result<Vec<R>> {
        self.list(None).await
    }

    /// Create, then reload the full collection. A reload failure after the
    /// server accepted the create is `RefreshFailed`, never the create's own
    /// error.
    pub async fn create(&self, fields: &R::Create) -> Result<()> {
        let fields = fields.validated()?;
        let request = ApiRequest::post(R::collection_path()).json(&fields)?;
        self.client.send(request).await?;
        tracing::info!(resource = R::LABEL, "created");

        self.refresh().await.map_err(ClientError::refresh_failed)?;
        Ok(())
    }

    /// Phase 1 of the by-name operations: turn a name into one entity.
    /// Does not touch the mirror.
    pub async fn resolve(&self, name: &str) -> Result<R> {
        let matches = self.fetch(Some(name)).await?;
        let count = matches.len();

        match (count, self.policy) {
            (0, _) => Err(ClientError::not_found(R::LABEL, name)),
            (1, _) | (_, ResolvePolicy::FirstMatch) => {
                if count > 1 {
                    tracing::debug!(resource = R::LABEL, name, count, "several matches, taking the first");
                }
                matches
                    .into_iter()
                    .next()
                    .ok_or_else(|| ClientError::not_found(R::LABEL, name))
            }
            (count, ResolvePolicy::RequireUnique) => Err(ClientError::Ambiguous {
                resource: R::LABEL,
                name: name.to_string(),
                count,
            }),
        }
    }

    /// Delete by identifier. Admin-gated on the client; the server decides
    /// for itself whether the caller may delete.
    pub async fn delete_by_id(&self, id: &EntityId) -> Result<()> {
        self.require_admin()?;

        self.client.send(ApiRequest::delete(R::item_path(id))).await?;
        tracing::info!(resource = R::LABEL, %id, "deleted");

        self.refresh().await.map_err(ClientError::refresh_failed)?;
        Ok(())
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<()> {
        let name = required("name", name)?;
        self.require_admin()?;

        let target = self.resolve(&name).await?;
        self.delete_by_id(target.id()).await
    }

    fn require_admin(&self) -> Result<()> {
        if self.session().is_admin() {
            Ok(())
        } else {
            tracing::warn!(resource = R::LABEL, "delete refused, session is not admin");
            Err(ClientError::NotAuthorized)
        }
    }
}

impl<R: Updatable> EntitySynchronizer<R> {
    pub async fn update_by_id(&self, id: &EntityId, fields: &R::Update) -> Result<()> {
        let fields = fields.validated()?;
        let request = ApiRequest::put(R::item_path(id)).json(&fields)?;
        self.client.send(request).await?;
        tracing::info!(resource = R::LABEL, %id, "updated");

        self.refresh().await.map_err(ClientError::refresh_failed)?;
        Ok(())
    }

    pub async fn update_by_name(&self, name: &str, fields: &R::Update) -> Result<()> {
        let name = required("name", name)?;
        let fields = fields.validated()?;

        let target = self.resolve(&name).await?;
        self.update_by_id(target.id(), &fields).await
    }
}
