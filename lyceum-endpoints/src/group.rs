//! Group endpoints.

use crate::crud::CrudEndpoints;
use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use lyceum_core::{
    ClassroomId, EndpointError, EntityType, Group, GroupId, SchoolId, Service, StudentId, Tag,
};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupFilter {
    pub school_id: Option<SchoolId>,
    pub classroom_id: Option<ClassroomId>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub student_ids: Vec<StudentId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateGroupRequest {
    pub group_id: GroupId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteGroupRequest {
    pub group_id: GroupId,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddGroupStudentRequest {
    pub group_id: GroupId,
    pub student_id: StudentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddGroupClassroomRequest {
    pub group_id: GroupId,
    pub classroom_id: ClassroomId,
}

pub struct GroupEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    crud: CrudEndpoints,
    add_student: EndpointDescriptor,
    add_classroom: EndpointDescriptor,
}

impl<H, S, R> GroupEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            crud: CrudEndpoints::new(EntityType::Group, Service::Group, "group", "group"),
            add_student: EndpointDescriptor::mutation(
                "group.add_student",
                HttpMethod::Post,
                "/group/add-group-student",
            ),
            add_classroom: EndpointDescriptor::mutation(
                "group.add_classroom",
                HttpMethod::Post,
                "/group/add-group-classroom",
            ),
        }
    }

    pub async fn get_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>, EndpointError> {
        self.registry
            .run_query(
                &self.crud.list,
                Service::Group,
                filter,
                self.crud.provides_list(),
            )
            .await
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group, EndpointError> {
        let mut invalidates = self.crud.invalidates_create();
        for student_id in &request.student_ids {
            invalidates.push(Tag::id(EntityType::Student, student_id.as_uuid()));
        }
        self.registry
            .run_mutation(&self.crud.create, Service::Group, request, invalidates)
            .await
    }

    /// Create several groups at once; all-or-nothing.
    pub async fn create_groups(
        &self,
        requests: &[CreateGroupRequest],
    ) -> Result<Vec<Group>, EndpointError> {
        let mut invalidates = self.crud.invalidates_create();
        for request in requests {
            for student_id in &request.student_ids {
                invalidates.push(Tag::id(EntityType::Student, student_id.as_uuid()));
            }
        }
        self.registry
            .run_bulk_mutation(&self.crud.create, Service::Group, &requests, invalidates)
            .await
    }

    pub async fn update_group(&self, request: &UpdateGroupRequest) -> Result<Group, EndpointError> {
        self.registry
            .run_mutation(
                &self.crud.update,
                Service::Group,
                request,
                self.crud.invalidates_item(request.group_id.as_uuid()),
            )
            .await
    }

    pub async fn delete_group(&self, request: &DeleteGroupRequest) -> Result<(), EndpointError> {
        let _: serde_json::Value = self
            .registry
            .run_mutation(
                &self.crud.delete,
                Service::Group,
                request,
                self.crud.invalidates_item(request.group_id.as_uuid()),
            )
            .await?;
        Ok(())
    }

    pub async fn add_group_student(
        &self,
        request: &AddGroupStudentRequest,
    ) -> Result<Group, EndpointError> {
        let mut invalidates = self.crud.invalidates_item(request.group_id.as_uuid());
        invalidates.push(Tag::id(EntityType::Student, request.student_id.as_uuid()));
        self.registry
            .run_mutation(&self.add_student, Service::Group, request, invalidates)
            .await
    }

    pub async fn add_group_classroom(
        &self,
        request: &AddGroupClassroomRequest,
    ) -> Result<Group, EndpointError> {
        let mut invalidates = self.crud.invalidates_item(request.group_id.as_uuid());
        invalidates.push(Tag::id(
            EntityType::Classroom,
            request.classroom_id.as_uuid(),
        ));
        self.registry
            .run_mutation(&self.add_classroom, Service::Group, request, invalidates)
            .await
    }
}
