//! Mark endpoints.
//!
//! Mark mutations carry the widest invalidation sets in the registry: a
//! write always touches the mark collection and the student it belongs
//! to, and conditionally the classroom or group it is attributed to.

use crate::crud::CrudEndpoints;
use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use lyceum_core::{
    ClassroomId, EndpointError, EntityType, GroupId, Mark, MarkId, MarkType, Service, StudentId,
    Tag,
};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CreateMarkRequest {
    pub student_id: StudentId,
    pub value: f64,
    pub max_value: f64,
    pub mark_type: MarkType,
    pub subject: String,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMarkRequest {
    pub mark_id: MarkId,
    pub student_id: StudentId,
    pub value: Option<f64>,
    pub max_value: Option<f64>,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteMarkRequest {
    pub mark_id: MarkId,
    pub student_id: StudentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentMarksRequest {
    pub student_id: StudentId,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupMarksRequest {
    pub group_id: GroupId,
    pub subject: Option<String>,
}

/// Composite scope for all marks of one group.
fn group_scope(group_id: Uuid) -> Tag {
    Tag::composite(EntityType::Mark, format!("GROUP_{}", group_id))
}

pub struct MarkEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    crud: CrudEndpoints,
    student_marks: EndpointDescriptor,
    group_marks: EndpointDescriptor,
}

impl<H, S, R> MarkEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            crud: CrudEndpoints::new(EntityType::Mark, Service::Mark, "mark", "mark"),
            student_marks: EndpointDescriptor::query(
                "mark.student_marks",
                HttpMethod::Post,
                "/mark/get-student-marks",
            ),
            group_marks: EndpointDescriptor::query(
                "mark.group_marks",
                HttpMethod::Post,
                "/mark/get-group-marks",
            ),
        }
    }

    pub async fn create_mark(&self, request: &CreateMarkRequest) -> Result<Mark, EndpointError> {
        let invalidates = write_set(
            None,
            request.student_id,
            request.classroom_id,
            request.group_id,
        );
        self.registry
            .run_mutation(&self.crud.create, Service::Mark, request, invalidates)
            .await
    }

    pub async fn update_mark(&self, request: &UpdateMarkRequest) -> Result<Mark, EndpointError> {
        let invalidates = write_set(
            Some(request.mark_id),
            request.student_id,
            request.classroom_id,
            request.group_id,
        );
        self.registry
            .run_mutation(&self.crud.update, Service::Mark, request, invalidates)
            .await
    }

    pub async fn delete_mark(&self, request: &DeleteMarkRequest) -> Result<(), EndpointError> {
        let invalidates = write_set(Some(request.mark_id), request.student_id, None, None);
        let _: serde_json::Value = self
            .registry
            .run_mutation(&self.crud.delete, Service::Mark, request, invalidates)
            .await?;
        Ok(())
    }

    pub async fn get_student_marks(
        &self,
        request: &StudentMarksRequest,
    ) -> Result<Vec<Mark>, EndpointError> {
        let provides = vec![
            Tag::list(EntityType::Mark),
            Tag::student_scope(EntityType::Mark, request.student_id.as_uuid()),
        ];
        self.registry
            .run_query(&self.student_marks, Service::Mark, request, provides)
            .await
    }

    pub async fn get_group_marks(
        &self,
        request: &GroupMarksRequest,
    ) -> Result<Vec<Mark>, EndpointError> {
        let provides = vec![
            Tag::list(EntityType::Mark),
            group_scope(request.group_id.as_uuid()),
        ];
        self.registry
            .run_query(&self.group_marks, Service::Mark, request, provides)
            .await
    }
}

/// Invalidation set of any mark write.
fn write_set(
    mark_id: Option<MarkId>,
    student_id: StudentId,
    classroom_id: Option<ClassroomId>,
    group_id: Option<GroupId>,
) -> Vec<Tag> {
    let mut tags = vec![
        Tag::list(EntityType::Mark),
        Tag::id(EntityType::Student, student_id.as_uuid()),
        Tag::student_scope(EntityType::Mark, student_id.as_uuid()),
    ];
    if let Some(mark_id) = mark_id {
        tags.push(Tag::id(EntityType::Mark, mark_id.as_uuid()));
    }
    if let Some(classroom_id) = classroom_id {
        tags.push(Tag::id(EntityType::Classroom, classroom_id.as_uuid()));
        tags.push(Tag::classroom_stats(classroom_id.as_uuid()));
    }
    if let Some(group_id) = group_id {
        tags.push(Tag::id(EntityType::Group, group_id.as_uuid()));
        tags.push(group_scope(group_id.as_uuid()));
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{harness, ok_envelope};
    use serde_json::json;

    fn mark_json(student_id: Uuid) -> serde_json::Value {
        json!({
            "mark_id": Uuid::new_v4(),
            "student_id": student_id,
            "value": 18.0,
            "max_value": 20.0,
            "mark_type": "exam",
            "subject": "maths",
            "classroom_id": null,
            "group_id": null,
            "recorded_at": "2025-09-01T09:00:00Z"
        })
    }

    #[test]
    fn test_write_set_is_superset_of_affected_tags() {
        let student = StudentId::new(Uuid::new_v4());
        let classroom = ClassroomId::new(Uuid::new_v4());
        let group = GroupId::new(Uuid::new_v4());

        let tags = write_set(None, student, Some(classroom), Some(group));
        assert!(tags.contains(&Tag::list(EntityType::Mark)));
        assert!(tags.contains(&Tag::id(EntityType::Student, student.as_uuid())));
        assert!(tags.contains(&Tag::id(EntityType::Classroom, classroom.as_uuid())));
        assert!(tags.contains(&Tag::id(EntityType::Group, group.as_uuid())));

        // Without attribution, classroom and group tags are absent.
        let bare = write_set(None, student, None, None);
        assert!(!bare
            .iter()
            .any(|t| t.entity_type == EntityType::Classroom));
        assert!(!bare.iter().any(|t| t.entity_type == EntityType::Group));
    }

    #[tokio::test]
    async fn test_create_mark_stales_student_marks_query() {
        let student_id = StudentId::new(Uuid::new_v4());
        let h = harness(vec![
            ok_envelope(json!([mark_json(student_id.as_uuid())])),
            ok_envelope(mark_json(student_id.as_uuid())),
            ok_envelope(json!([
                mark_json(student_id.as_uuid()),
                mark_json(student_id.as_uuid())
            ])),
        ]);
        let sender = Arc::clone(&h.sender);
        let endpoints = MarkEndpoints::new(Arc::new(h.registry));

        let query = StudentMarksRequest {
            student_id,
            subject: None,
        };
        let before = endpoints.get_student_marks(&query).await.unwrap();
        assert_eq!(before.len(), 1);

        endpoints
            .create_mark(&CreateMarkRequest {
                student_id,
                value: 15.0,
                max_value: 20.0,
                mark_type: MarkType::Quiz,
                subject: "maths".to_string(),
                classroom_id: None,
                group_id: None,
            })
            .await
            .unwrap();

        let after = endpoints.get_student_marks(&query).await.unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(sender.sent().await.len(), 3);
    }

    #[tokio::test]
    async fn test_group_marks_stale_only_for_referenced_group() {
        let student_id = StudentId::new(Uuid::new_v4());
        let group_a = GroupId::new(Uuid::new_v4());
        let group_b = GroupId::new(Uuid::new_v4());
        let h = harness(vec![ok_envelope(mark_json(student_id.as_uuid()))]);
        let endpoints = MarkEndpoints::new(Arc::new(h.registry));
        let cache = Arc::clone(endpoints.registry.cache());

        let key_a = lyceum_cache::QueryKey::new("mark.group_marks", &group_a).unwrap();
        let key_b = lyceum_cache::QueryKey::new("mark.group_marks", &group_b).unwrap();
        cache
            .apply_response(&key_a, &[group_scope(group_a.as_uuid())], json!([]))
            .await;
        cache
            .apply_response(&key_b, &[group_scope(group_b.as_uuid())], json!([]))
            .await;

        endpoints
            .create_mark(&CreateMarkRequest {
                student_id,
                value: 10.0,
                max_value: 20.0,
                mark_type: MarkType::Exam,
                subject: "maths".to_string(),
                classroom_id: None,
                group_id: Some(group_a),
            })
            .await
            .unwrap();

        assert!(!cache.lookup(&key_a).await.unwrap().fresh);
        assert!(cache.lookup(&key_b).await.unwrap().fresh);
    }
}
