//! Attendance endpoints.

use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use chrono::NaiveDate;
use lyceum_core::{
    Attendance, AttendanceId, AttendanceStatus, ClassroomId, EndpointError, EntityType, PostId,
    Service, StudentId, Tag,
};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AddAttendanceRequest {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
    pub classroom_id: Option<ClassroomId>,
    pub event_id: Option<PostId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAttendanceRequest {
    pub attendance_id: AttendanceId,
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    pub classroom_id: Option<ClassroomId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendanceRequest {
    pub student_id: StudentId,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// One classroom on one date.
#[derive(Debug, Clone, Serialize)]
pub struct ClassroomAttendanceRequest {
    pub classroom_id: ClassroomId,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventAttendanceRequest {
    pub event_id: PostId,
}

/// Composite scope for all attendance of one classroom.
fn classroom_scope(classroom_id: Uuid) -> Tag {
    Tag::composite(EntityType::Attendance, format!("CLASSROOM_{}", classroom_id))
}

/// Composite scope for all attendance of one event.
fn event_scope(event_id: Uuid) -> Tag {
    Tag::composite(EntityType::Attendance, format!("EVENT_{}", event_id))
}

pub struct AttendanceEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    add: EndpointDescriptor,
    update: EndpointDescriptor,
    by_student: EndpointDescriptor,
    by_classroom: EndpointDescriptor,
    by_event: EndpointDescriptor,
}

impl<H, S, R> AttendanceEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            add: EndpointDescriptor::mutation(
                "attendance.add",
                HttpMethod::Post,
                "/attendance/add-student-attendance",
            ),
            update: EndpointDescriptor::mutation(
                "attendance.update",
                HttpMethod::Post,
                "/attendance/update-student-attendance",
            ),
            by_student: EndpointDescriptor::query(
                "attendance.student",
                HttpMethod::Post,
                "/attendance/get-attendance-student",
            ),
            by_classroom: EndpointDescriptor::query(
                "attendance.classroom",
                HttpMethod::Post,
                "/attendance/get-attendance-classroom",
            ),
            by_event: EndpointDescriptor::query(
                "attendance.event",
                HttpMethod::Post,
                "/attendance/get-attendance-event",
            ),
        }
    }

    pub async fn add_student_attendance(
        &self,
        request: &AddAttendanceRequest,
    ) -> Result<Attendance, EndpointError> {
        let invalidates = write_set(
            None,
            request.student_id,
            request.classroom_id,
            request.event_id,
        );
        self.registry
            .run_mutation(&self.add, Service::Attendance, request, invalidates)
            .await
    }

    pub async fn update_student_attendance(
        &self,
        request: &UpdateAttendanceRequest,
    ) -> Result<Attendance, EndpointError> {
        let invalidates = write_set(
            Some(request.attendance_id),
            request.student_id,
            request.classroom_id,
            None,
        );
        self.registry
            .run_mutation(&self.update, Service::Attendance, request, invalidates)
            .await
    }

    pub async fn get_attendance_student(
        &self,
        request: &StudentAttendanceRequest,
    ) -> Result<Vec<Attendance>, EndpointError> {
        let provides = vec![
            Tag::list(EntityType::Attendance),
            Tag::student_scope(EntityType::Attendance, request.student_id.as_uuid()),
        ];
        self.registry
            .run_query(&self.by_student, Service::Attendance, request, provides)
            .await
    }

    pub async fn get_attendance_classroom(
        &self,
        request: &ClassroomAttendanceRequest,
    ) -> Result<Vec<Attendance>, EndpointError> {
        let provides = vec![
            Tag::list(EntityType::Attendance),
            classroom_scope(request.classroom_id.as_uuid()),
        ];
        self.registry
            .run_query(&self.by_classroom, Service::Attendance, request, provides)
            .await
    }

    pub async fn get_attendance_event(
        &self,
        request: &EventAttendanceRequest,
    ) -> Result<Vec<Attendance>, EndpointError> {
        let provides = vec![
            Tag::list(EntityType::Attendance),
            event_scope(request.event_id.as_uuid()),
        ];
        self.registry
            .run_query(&self.by_event, Service::Attendance, request, provides)
            .await
    }
}

/// Invalidation set of any attendance write: the collection, the student's
/// record, and conditionally the attached classroom or event.
fn write_set(
    attendance_id: Option<AttendanceId>,
    student_id: StudentId,
    classroom_id: Option<ClassroomId>,
    event_id: Option<PostId>,
) -> Vec<Tag> {
    let mut tags = vec![
        Tag::list(EntityType::Attendance),
        Tag::id(EntityType::Student, student_id.as_uuid()),
        Tag::student_scope(EntityType::Attendance, student_id.as_uuid()),
    ];
    if let Some(attendance_id) = attendance_id {
        tags.push(Tag::id(EntityType::Attendance, attendance_id.as_uuid()));
    }
    if let Some(classroom_id) = classroom_id {
        tags.push(Tag::id(EntityType::Classroom, classroom_id.as_uuid()));
        tags.push(classroom_scope(classroom_id.as_uuid()));
        tags.push(Tag::classroom_stats(classroom_id.as_uuid()));
    }
    if let Some(event_id) = event_id {
        tags.push(event_scope(event_id.as_uuid()));
    }
    tags
}
