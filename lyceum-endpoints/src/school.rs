//! School endpoints.

use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use lyceum_core::{EndpointError, EntityType, School, SchoolId, Service, Tag};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct GetSchoolRequest {
    pub school_id: SchoolId,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateSchoolRequest {
    pub school_id: SchoolId,
    pub name: Option<String>,
    pub address: Option<String>,
    pub settings: Option<serde_json::Value>,
}

pub struct SchoolEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    get: EndpointDescriptor,
    update: EndpointDescriptor,
}

impl<H, S, R> SchoolEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            get: EndpointDescriptor::query("school.get", HttpMethod::Post, "/school/get-school"),
            update: EndpointDescriptor::mutation(
                "school.update",
                HttpMethod::Post,
                "/school/update-school",
            ),
        }
    }

    pub async fn get_school(&self, request: &GetSchoolRequest) -> Result<School, EndpointError> {
        self.registry
            .run_query(
                &self.get,
                Service::School,
                request,
                vec![Tag::id(EntityType::School, request.school_id.as_uuid())],
            )
            .await
    }

    pub async fn update_school(
        &self,
        request: &UpdateSchoolRequest,
    ) -> Result<School, EndpointError> {
        self.registry
            .run_mutation(
                &self.update,
                Service::School,
                request,
                vec![
                    Tag::list(EntityType::School),
                    Tag::id(EntityType::School, request.school_id.as_uuid()),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{harness, ok_envelope};
    use serde_json::json;
    use uuid::Uuid;

    fn school_json(id: Uuid, name: &str) -> serde_json::Value {
        json!({
            "school_id": id,
            "name": name,
            "address": null,
            "settings": null,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_update_school_invalidates_get() {
        let id = SchoolId::new(Uuid::new_v4());
        let h = harness(vec![
            ok_envelope(school_json(id.as_uuid(), "North Lyceum")),
            ok_envelope(school_json(id.as_uuid(), "North Lyceum Annex")),
            ok_envelope(school_json(id.as_uuid(), "North Lyceum Annex")),
        ]);
        let sender = Arc::clone(&h.sender);
        let endpoints = SchoolEndpoints::new(Arc::new(h.registry));

        let request = GetSchoolRequest { school_id: id };
        let school = endpoints.get_school(&request).await.unwrap();
        assert_eq!(school.name, "North Lyceum");

        endpoints
            .update_school(&UpdateSchoolRequest {
                school_id: id,
                name: Some("North Lyceum Annex".to_string()),
                address: None,
                settings: None,
            })
            .await
            .unwrap();

        let school = endpoints.get_school(&request).await.unwrap();
        assert_eq!(school.name, "North Lyceum Annex");
        assert_eq!(sender.sent().await.len(), 3);
    }
}
