//! Post endpoints: announcements, homework, quizzes, polls and
//! submissions/interactions against them.

use crate::crud::CrudEndpoints;
use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use lyceum_core::{
    ClassroomId, EndpointError, EntityType, GroupId, Post, PostId, PostStatus, PostType, Service,
    StudentId, Tag,
};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Filters of the post list read; any combination may be set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFilter {
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
    pub student_id: Option<StudentId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePostRequest {
    pub post_type: PostType,
    pub status: PostStatus,
    pub title: String,
    pub content: Option<String>,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
    pub student_id: Option<StudentId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePostRequest {
    pub post_id: PostId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePostRequest {
    pub post_id: PostId,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitHomeworkRequest {
    pub post_id: PostId,
    pub student_id: StudentId,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitQuizRequest {
    pub post_id: PostId,
    pub student_id: StudentId,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitPollRequest {
    pub post_id: PostId,
    pub student_id: StudentId,
    pub option_index: u32,
}

/// Like or comment on a post.
#[derive(Debug, Clone, Serialize)]
pub struct InteractPostRequest {
    pub post_id: PostId,
    pub like: bool,
    pub comment: Option<String>,
}

/// Composite scope for posts targeted at one classroom.
fn classroom_scope(classroom_id: Uuid) -> Tag {
    Tag::composite(EntityType::Post, format!("CLASSROOM_{}", classroom_id))
}

/// Composite scope for posts targeted at one group.
fn group_scope(group_id: Uuid) -> Tag {
    Tag::composite(EntityType::Post, format!("GROUP_{}", group_id))
}

pub struct PostEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    crud: CrudEndpoints,
    list: EndpointDescriptor,
    submit_homework: EndpointDescriptor,
    submit_quiz: EndpointDescriptor,
    submit_poll: EndpointDescriptor,
    interact: EndpointDescriptor,
}

impl<H, S, R> PostEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            crud: CrudEndpoints::new(EntityType::Post, Service::Post, "post", "post"),
            list: EndpointDescriptor::query("post.list", HttpMethod::Post, "/post/get-posts"),
            submit_homework: EndpointDescriptor::mutation(
                "post.submit_homework",
                HttpMethod::Post,
                "/post/submit-homework",
            ),
            submit_quiz: EndpointDescriptor::mutation(
                "post.submit_quiz",
                HttpMethod::Post,
                "/post/submit-quiz",
            ),
            submit_poll: EndpointDescriptor::mutation(
                "post.submit_poll",
                HttpMethod::Post,
                "/post/submit-poll",
            ),
            interact: EndpointDescriptor::mutation(
                "post.interact",
                HttpMethod::Post,
                "/post/interact-post",
            ),
        }
    }

    pub async fn get_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, EndpointError> {
        let mut provides = vec![Tag::list(EntityType::Post)];
        if let Some(classroom_id) = filter.classroom_id {
            provides.push(classroom_scope(classroom_id.as_uuid()));
        }
        if let Some(group_id) = filter.group_id {
            provides.push(group_scope(group_id.as_uuid()));
        }
        if let Some(student_id) = filter.student_id {
            provides.push(Tag::student_scope(EntityType::Post, student_id.as_uuid()));
        }
        self.registry
            .run_query(&self.list, Service::Post, filter, provides)
            .await
    }

    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, EndpointError> {
        let mut invalidates = vec![Tag::list(EntityType::Post)];
        if let Some(classroom_id) = request.classroom_id {
            invalidates.push(classroom_scope(classroom_id.as_uuid()));
        }
        if let Some(group_id) = request.group_id {
            invalidates.push(group_scope(group_id.as_uuid()));
        }
        if let Some(student_id) = request.student_id {
            invalidates.push(Tag::student_scope(EntityType::Post, student_id.as_uuid()));
        }
        self.registry
            .run_mutation(&self.crud.create, Service::Post, request, invalidates)
            .await
    }

    pub async fn update_post(&self, request: &UpdatePostRequest) -> Result<Post, EndpointError> {
        self.registry
            .run_mutation(
                &self.crud.update,
                Service::Post,
                request,
                self.crud.invalidates_item(request.post_id.as_uuid()),
            )
            .await
    }

    pub async fn delete_post(&self, request: &DeletePostRequest) -> Result<(), EndpointError> {
        let _: serde_json::Value = self
            .registry
            .run_mutation(
                &self.crud.delete,
                Service::Post,
                request,
                self.crud.invalidates_item(request.post_id.as_uuid()),
            )
            .await?;
        Ok(())
    }

    pub async fn submit_homework(
        &self,
        request: &SubmitHomeworkRequest,
    ) -> Result<Post, EndpointError> {
        self.registry
            .run_mutation(
                &self.submit_homework,
                Service::Post,
                request,
                submission_set(request.post_id, request.student_id),
            )
            .await
    }

    pub async fn submit_quiz(&self, request: &SubmitQuizRequest) -> Result<Post, EndpointError> {
        self.registry
            .run_mutation(
                &self.submit_quiz,
                Service::Post,
                request,
                submission_set(request.post_id, request.student_id),
            )
            .await
    }

    pub async fn submit_poll(&self, request: &SubmitPollRequest) -> Result<Post, EndpointError> {
        self.registry
            .run_mutation(
                &self.submit_poll,
                Service::Post,
                request,
                submission_set(request.post_id, request.student_id),
            )
            .await
    }

    pub async fn interact_post(&self, request: &InteractPostRequest) -> Result<Post, EndpointError> {
        self.registry
            .run_mutation(
                &self.interact,
                Service::Post,
                request,
                self.crud.invalidates_item(request.post_id.as_uuid()),
            )
            .await
    }
}

/// A submission touches the post and the submitting student's scope.
fn submission_set(post_id: PostId, student_id: StudentId) -> Vec<Tag> {
    vec![
        Tag::list(EntityType::Post),
        Tag::id(EntityType::Post, post_id.as_uuid()),
        Tag::student_scope(EntityType::Post, student_id.as_uuid()),
    ]
}
