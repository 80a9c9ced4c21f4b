//! Student endpoints, built almost entirely from the CRUD skeleton.

use crate::crud::CrudEndpoints;
use crate::registry::EndpointRegistry;
use lyceum_core::{
    ClassroomId, EndpointError, EntityType, GroupId, SchoolId, Service, Student, StudentId,
};
use lyceum_transport::{HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentFilter {
    pub school_id: Option<SchoolId>,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetStudentRequest {
    pub student_id: StudentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStudentRequest {
    pub student_id: StudentId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

pub struct StudentEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    crud: CrudEndpoints,
}

impl<H, S, R> StudentEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            crud: CrudEndpoints::new(EntityType::Student, Service::Student, "student", "student"),
        }
    }

    pub async fn get_students(
        &self,
        filter: &StudentFilter,
    ) -> Result<Vec<Student>, EndpointError> {
        self.registry
            .run_query(
                &self.crud.list,
                Service::Student,
                filter,
                self.crud.provides_list(),
            )
            .await
    }

    pub async fn get_student(&self, request: &GetStudentRequest) -> Result<Student, EndpointError> {
        self.registry
            .run_query(
                &self.crud.get,
                Service::Student,
                request,
                self.crud.provides_item(request.student_id.as_uuid()),
            )
            .await
    }

    pub async fn update_student(
        &self,
        request: &UpdateStudentRequest,
    ) -> Result<Student, EndpointError> {
        self.registry
            .run_mutation(
                &self.crud.update,
                Service::Student,
                request,
                self.crud.invalidates_item(request.student_id.as_uuid()),
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

    fn student_json(id: Uuid) -> serde_json::Value {
        json!({
            "student_id": id,
            "school_id": Uuid::nil(),
            "user_id": null,
            "first_name": "Nadia",
            "last_name": "Osei",
            "email": null,
            "classroom_ids": [],
            "group_ids": [],
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_get_student_is_cached_until_update() {
        let id = StudentId::new(Uuid::new_v4());
        let h = harness(vec![
            ok_envelope(student_json(id.as_uuid())),
            ok_envelope(student_json(id.as_uuid())),
            ok_envelope(student_json(id.as_uuid())),
        ]);
        let sender = Arc::clone(&h.sender);
        let endpoints = StudentEndpoints::new(Arc::new(h.registry));

        let request = GetStudentRequest { student_id: id };
        endpoints.get_student(&request).await.unwrap();
        endpoints.get_student(&request).await.unwrap();
        assert_eq!(sender.sent().await.len(), 1);

        endpoints
            .update_student(&UpdateStudentRequest {
                student_id: id,
                first_name: Some("Nadia".to_string()),
                last_name: None,
                email: None,
            })
            .await
            .unwrap();

        endpoints.get_student(&request).await.unwrap();
        assert_eq!(sender.sent().await.len(), 3);
    }
}
