//! Teacher endpoints.

use crate::crud::CrudEndpoints;
use crate::registry::EndpointRegistry;
use lyceum_core::{EndpointError, EntityType, SchoolId, Service, Teacher, TeacherId};
use lyceum_transport::{HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeacherFilter {
    pub school_id: Option<SchoolId>,
    pub subject: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetTeacherRequest {
    pub teacher_id: TeacherId,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateTeacherRequest {
    pub teacher_id: TeacherId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subjects: Option<Vec<String>>,
}

pub struct TeacherEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    crud: CrudEndpoints,
}

impl<H, S, R> TeacherEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            crud: CrudEndpoints::new(EntityType::Teacher, Service::Teacher, "teacher", "teacher"),
        }
    }

    pub async fn get_teachers(
        &self,
        filter: &TeacherFilter,
    ) -> Result<Vec<Teacher>, EndpointError> {
        self.registry
            .run_query(
                &self.crud.list,
                Service::Teacher,
                filter,
                self.crud.provides_list(),
            )
            .await
    }

    pub async fn get_teacher(&self, request: &GetTeacherRequest) -> Result<Teacher, EndpointError> {
        self.registry
            .run_query(
                &self.crud.get,
                Service::Teacher,
                request,
                self.crud.provides_item(request.teacher_id.as_uuid()),
            )
            .await
    }

    pub async fn update_teacher(
        &self,
        request: &UpdateTeacherRequest,
    ) -> Result<Teacher, EndpointError> {
        self.registry
            .run_mutation(
                &self.crud.update,
                Service::Teacher,
                request,
                self.crud.invalidates_item(request.teacher_id.as_uuid()),
            )
            .await
    }
}
