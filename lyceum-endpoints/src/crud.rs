//! Generic CRUD endpoint builder.
//!
//! The per-entity modules all need the same query/mutation skeleton: a
//! list read providing the collection tag, and create/update/delete
//! mutations invalidating the collection plus the touched item. Building
//! them here keeps the entity modules down to their genuinely specialized
//! operations and cross-entity invalidation sets.

use crate::descriptor::EndpointDescriptor;
use lyceum_core::{EntityType, Service, Tag};
use lyceum_transport::HttpMethod;
use uuid::Uuid;

/// The standard endpoint set of one entity.
#[derive(Debug, Clone)]
pub struct CrudEndpoints {
    entity: EntityType,
    service: Service,
    pub list: EndpointDescriptor,
    pub get: EndpointDescriptor,
    pub create: EndpointDescriptor,
    pub update: EndpointDescriptor,
    pub delete: EndpointDescriptor,
}

impl CrudEndpoints {
    /// Build the standard descriptors for one entity.
    ///
    /// `segment` is the service path segment, `noun` the entity name used
    /// in operation paths (`/classroom/get-classrooms` etc.).
    pub fn new(entity: EntityType, service: Service, segment: &str, noun: &str) -> Self {
        Self {
            entity,
            service,
            list: EndpointDescriptor::query(
                format!("{}.list", segment),
                HttpMethod::Post,
                format!("/{}/get-{}s", segment, noun),
            ),
            get: EndpointDescriptor::query(
                format!("{}.get", segment),
                HttpMethod::Post,
                format!("/{}/get-{}", segment, noun),
            ),
            create: EndpointDescriptor::mutation(
                format!("{}.create", segment),
                HttpMethod::Post,
                format!("/{}/create-{}", segment, noun),
            ),
            update: EndpointDescriptor::mutation(
                format!("{}.update", segment),
                HttpMethod::Post,
                format!("/{}/update-{}", segment, noun),
            ),
            delete: EndpointDescriptor::mutation(
                format!("{}.delete", segment),
                HttpMethod::Delete,
                format!("/{}/delete-{}", segment, noun),
            ),
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn service(&self) -> Service {
        self.service
    }

    /// Tags a list read depends on.
    pub fn provides_list(&self) -> Vec<Tag> {
        vec![Tag::list(self.entity)]
    }

    /// Tags a single-item read depends on.
    pub fn provides_item(&self, id: Uuid) -> Vec<Tag> {
        vec![Tag::id(self.entity, id)]
    }

    /// Invalidation set of a create: the collection.
    pub fn invalidates_create(&self) -> Vec<Tag> {
        vec![Tag::list(self.entity)]
    }

    /// Invalidation set of an update or delete: collection plus item.
    pub fn invalidates_item(&self, id: Uuid) -> Vec<Tag> {
        vec![Tag::list(self.entity), Tag::id(self.entity, id)]
    }
}
