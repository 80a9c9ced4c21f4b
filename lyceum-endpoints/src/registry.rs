//! The endpoint registry core.
//!
//! Builds transport requests from descriptors, executes them through the
//! gateway and reports results into the cache registry. Queries go through
//! the lookup / leader-follower path so identical concurrent reads share
//! one wire request; mutations invalidate their tag set the moment the
//! backend acknowledges the write.

use crate::bulk::{collect_bulk, BulkItem};
use crate::descriptor::EndpointDescriptor;
use lyceum_cache::{CacheRegistry, FetchRole, QueryKey};
use lyceum_core::{ApiEnvelope, ClientConfig, EndpointError, Service, Tag};
use lyceum_transport::{ApiRequest, Gateway, HttpSend, LoginRedirect, SessionStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Shared registry every entity module is built on.
pub struct EndpointRegistry<H, S, R> {
    gateway: Gateway<H, S, R>,
    cache: Arc<CacheRegistry>,
    config: ClientConfig,
    session: Arc<S>,
}

impl<H, S, R> EndpointRegistry<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(
        gateway: Gateway<H, S, R>,
        cache: Arc<CacheRegistry>,
        config: ClientConfig,
        session: Arc<S>,
    ) -> Self {
        Self {
            gateway,
            cache,
            config,
            session,
        }
    }

    pub fn cache(&self) -> &Arc<CacheRegistry> {
        &self.cache
    }

    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a query through the cache.
    ///
    /// A fresh entry is served directly. Otherwise the caller either leads
    /// the fetch or joins the in-flight one for the same key; the leader's
    /// normalized response is applied to the cache with the query's
    /// provided tags before anyone observes it.
    pub async fn run_query<A, T>(
        &self,
        descriptor: &EndpointDescriptor,
        service: Service,
        args: &A,
        provides: Vec<Tag>,
    ) -> Result<T, EndpointError>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let key = QueryKey::new(&descriptor.id, args)?;

        if let Some(snapshot) = self.cache.lookup(&key).await {
            if snapshot.fresh {
                debug!(key = %key, "query served from cache");
                return decode(snapshot.value);
            }
        }

        match self.cache.begin_fetch(&key).await {
            FetchRole::Leader => match self.fetch(descriptor, service, args).await {
                Ok(value) => {
                    self.cache
                        .apply_response(&key, &provides, value.clone())
                        .await;
                    self.cache.complete_fetch(&key, Ok(value.clone())).await;
                    decode(value)
                }
                Err(err) => {
                    self.cache
                        .complete_fetch(&key, Err(err.surface_message()))
                        .await;
                    Err(err)
                }
            },
            FetchRole::Follower(rx) => {
                debug!(key = %key, "joining in-flight query");
                match CacheRegistry::wait_for_leader(rx, &key).await? {
                    Ok(value) => decode(value),
                    Err(message) => Err(EndpointError::Api { message }),
                }
            }
        }
    }

    /// Run a mutation and invalidate its tag set on success.
    ///
    /// Invalidation completes before this returns, so every overlapping
    /// entry is stale before any subsequent read.
    pub async fn run_mutation<A, T>(
        &self,
        descriptor: &EndpointDescriptor,
        service: Service,
        args: &A,
        invalidates: Vec<Tag>,
    ) -> Result<T, EndpointError>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let value = self.fetch(descriptor, service, args).await?;
        self.cache.invalidate(&invalidates).await;
        decode(value)
    }

    /// Run a bulk mutation with a per-item status array response.
    ///
    /// Any failing item fails the whole mutation with one aggregated
    /// message, and nothing is invalidated: no cache entry gets refreshed
    /// off the back of a rejected batch.
    pub async fn run_bulk_mutation<A, T>(
        &self,
        descriptor: &EndpointDescriptor,
        service: Service,
        args: &A,
        invalidates: Vec<Tag>,
    ) -> Result<Vec<T>, EndpointError>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let value = self.fetch(descriptor, service, args).await?;
        let items: Vec<BulkItem<T>> = decode(value)?;
        let values = collect_bulk(items)?;
        self.cache.invalidate(&invalidates).await;
        Ok(values)
    }

    /// One gateway round-trip, unwrapped to the envelope's `data`.
    async fn fetch<A: Serialize>(
        &self,
        descriptor: &EndpointDescriptor,
        service: Service,
        args: &A,
    ) -> Result<Value, EndpointError> {
        let body = serde_json::to_value(args).map_err(|err| EndpointError::Decode {
            reason: format!("failed to serialize request: {}", err),
        })?;
        let request = ApiRequest::new(
            descriptor.method,
            self.config.root_for(service),
            descriptor.path.clone(),
        )
        .with_body(body);

        let response = self.gateway.execute(&request).await?;
        let envelope: ApiEnvelope<Value> =
            serde_json::from_value(response.body).map_err(|err| EndpointError::Decode {
                reason: format!("malformed response envelope: {}", err),
            })?;

        if !envelope.success {
            return Err(EndpointError::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }
        Ok(envelope.data)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, EndpointError> {
    serde_json::from_value(value).map_err(|err| EndpointError::Decode {
        reason: format!("malformed response payload: {}", err),
    })
}
