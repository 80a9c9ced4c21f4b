//! Session endpoints: login, register, refresh, logout and OTP.
//!
//! These are the only operations allowed to write the session store
//! besides the gateway's internal refresh flow.

use crate::descriptor::EndpointDescriptor;
use crate::registry::EndpointRegistry;
use lyceum_core::{EndpointError, EntityType, Service, Tag, Timestamp, User};
use lyceum_transport::{HttpMethod, HttpSend, LoginRedirect, SessionStore, SessionTokens};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// Token-bearing payload of login, register and verify-otp responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: Timestamp,
    pub user: User,
}

pub struct SessionEndpoints<H, S, R> {
    registry: Arc<EndpointRegistry<H, S, R>>,
    login: EndpointDescriptor,
    register: EndpointDescriptor,
    logout: EndpointDescriptor,
    send_otp: EndpointDescriptor,
    verify_otp: EndpointDescriptor,
}

impl<H, S, R> SessionEndpoints<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(registry: Arc<EndpointRegistry<H, S, R>>) -> Self {
        Self {
            registry,
            login: EndpointDescriptor::mutation("auth.login", HttpMethod::Post, "/auth/login"),
            register: EndpointDescriptor::mutation(
                "auth.register",
                HttpMethod::Post,
                "/auth/register",
            ),
            logout: EndpointDescriptor::mutation("auth.logout", HttpMethod::Post, "/auth/logout"),
            send_otp: EndpointDescriptor::mutation(
                "auth.send_otp",
                HttpMethod::Post,
                "/auth/send-otp",
            ),
            verify_otp: EndpointDescriptor::mutation(
                "auth.verify_otp",
                HttpMethod::Post,
                "/auth/verify-otp",
            ),
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User, EndpointError> {
        let response: SessionResponse = self
            .registry
            .run_mutation(
                &self.login,
                Service::Auth,
                request,
                vec![Tag::list(EntityType::User)],
            )
            .await?;
        self.store_session(&response).await;
        Ok(response.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, EndpointError> {
        let response: SessionResponse = self
            .registry
            .run_mutation(
                &self.register,
                Service::Auth,
                request,
                vec![Tag::list(EntityType::User)],
            )
            .await?;
        self.store_session(&response).await;
        Ok(response.user)
    }

    /// Log out and drop every cached collection of the departing session.
    pub async fn logout(&self) -> Result<(), EndpointError> {
        let invalidates = all_list_tags();
        let _: serde_json::Value = self
            .registry
            .run_mutation(&self.logout, Service::Auth, &serde_json::json!({}), invalidates)
            .await?;
        self.registry.session().clear().await;
        Ok(())
    }

    pub async fn send_otp(&self, request: &SendOtpRequest) -> Result<(), EndpointError> {
        let _: serde_json::Value = self
            .registry
            .run_mutation(&self.send_otp, Service::Auth, request, Vec::new())
            .await?;
        Ok(())
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<User, EndpointError> {
        let response: SessionResponse = self
            .registry
            .run_mutation(
                &self.verify_otp,
                Service::Auth,
                request,
                vec![Tag::list(EntityType::User)],
            )
            .await?;
        self.store_session(&response).await;
        Ok(response.user)
    }

    async fn store_session(&self, response: &SessionResponse) {
        self.registry
            .session()
            .set_from_refresh(SessionTokens {
                token: response.token.clone(),
                refresh_token: response.refresh_token.clone(),
                expires_at: response.expires_at,
            })
            .await;
    }
}

/// Collection tags of every entity type, invalidated wholesale on logout.
fn all_list_tags() -> Vec<Tag> {
    [
        EntityType::Classroom,
        EntityType::Group,
        EntityType::Student,
        EntityType::Teacher,
        EntityType::Mark,
        EntityType::Attendance,
        EntityType::Post,
        EntityType::User,
        EntityType::School,
    ]
    .into_iter()
    .map(Tag::list)
    .collect()
}
