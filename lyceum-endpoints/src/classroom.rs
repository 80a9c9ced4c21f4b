//! Classroom endpoints.

use crate::crud::CrudEndpoints;
use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use lyceum_core::{
    Classroom, ClassroomId, EndpointError, EntityType, SchoolId, Service, StudentId, Tag,
    TeacherId,
};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassroomFilter {
    pub school_id: Option<SchoolId>,
    pub teacher_id: Option<TeacherId>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateClassroomRequest {
    pub name: String,
    pub subject: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateClassroomRequest {
    pub classroom_id: ClassroomId,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteClassroomRequest {
    pub classroom_id: ClassroomId,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddClassroomStudentRequest {
    pub classroom_id: ClassroomId,
    pub student_id: StudentId,
}

pub struct ClassroomEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    crud: CrudEndpoints,
    add_student: EndpointDescriptor,
}

impl<H, S, R> ClassroomEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            crud: CrudEndpoints::new(
                EntityType::Classroom,
                Service::Classroom,
                "classroom",
                "classroom",
            ),
            add_student: EndpointDescriptor::mutation(
                "classroom.add_student",
                HttpMethod::Post,
                "/classroom/add-classroom-student",
            ),
        }
    }

    pub async fn get_classrooms(
        &self,
        filter: &ClassroomFilter,
    ) -> Result<Vec<Classroom>, EndpointError> {
        self.registry
            .run_query(
                &self.crud.list,
                Service::Classroom,
                filter,
                self.crud.provides_list(),
            )
            .await
    }

    pub async fn create_classroom(
        &self,
        request: &CreateClassroomRequest,
    ) -> Result<Classroom, EndpointError> {
        self.registry
            .run_mutation(
                &self.crud.create,
                Service::Classroom,
                request,
                self.crud.invalidates_create(),
            )
            .await
    }

    /// Create several classrooms at once; all-or-nothing.
    pub async fn create_classrooms(
        &self,
        requests: &[CreateClassroomRequest],
    ) -> Result<Vec<Classroom>, EndpointError> {
        self.registry
            .run_bulk_mutation(
                &self.crud.create,
                Service::Classroom,
                &requests,
                self.crud.invalidates_create(),
            )
            .await
    }

    pub async fn update_classroom(
        &self,
        request: &UpdateClassroomRequest,
    ) -> Result<Classroom, EndpointError> {
        let mut invalidates = self.crud.invalidates_item(request.classroom_id.as_uuid());
        invalidates.push(Tag::classroom_stats(request.classroom_id.as_uuid()));
        self.registry
            .run_mutation(&self.crud.update, Service::Classroom, request, invalidates)
            .await
    }

    pub async fn delete_classroom(
        &self,
        request: &DeleteClassroomRequest,
    ) -> Result<(), EndpointError> {
        let mut invalidates = self.crud.invalidates_item(request.classroom_id.as_uuid());
        invalidates.push(Tag::classroom_stats(request.classroom_id.as_uuid()));
        let _: serde_json::Value = self
            .registry
            .run_mutation(&self.crud.delete, Service::Classroom, request, invalidates)
            .await?;
        Ok(())
    }

    /// Enrolling a student touches the classroom and the student's record.
    pub async fn add_classroom_student(
        &self,
        request: &AddClassroomStudentRequest,
    ) -> Result<Classroom, EndpointError> {
        let mut invalidates = self.crud.invalidates_item(request.classroom_id.as_uuid());
        invalidates.push(Tag::id(EntityType::Student, request.student_id.as_uuid()));
        self.registry
            .run_mutation(&self.add_student, Service::Classroom, request, invalidates)
            .await
    }
}
