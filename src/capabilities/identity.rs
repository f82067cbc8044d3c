//! Identity service capability: the external account/session platform
//! exposed as typed request/response operations. Multi-step auth flows
//! (sign-in, sign-up, sign-out, startup bootstrap) are chained here and
//! reported back to the app as a single completion event.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{AuthSession, Identity, RemoteSession};
use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityOperation {
    GetCurrentSession,
    GetIdentity,
    CreateSession {
        email: String,
        password: String,
    },
    CreateIdentity {
        unique_id: String,
        email: String,
        password: String,
        name: Option<String>,
    },
    DeleteCurrentSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityOutput {
    Session(RemoteSession),
    Identity(Identity),
    SessionDeleted,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("no active session")]
    SessionNotFound,
    #[error("network error: {message}")]
    Network { message: String },
    #[error("identity service error: {message}")]
    Service { message: String },
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        let kind = match &e {
            IdentityError::InvalidCredentials | IdentityError::EmailTaken => {
                ErrorKind::Authentication
            }
            IdentityError::SessionNotFound => ErrorKind::NotFound,
            IdentityError::Network { .. } => ErrorKind::Network,
            IdentityError::Service { .. } => ErrorKind::Internal,
        };
        Self::new(kind, e.to_string())
    }
}

pub type IdentityResult = Result<IdentityOutput, IdentityError>;

impl Operation for IdentityOperation {
    type Output = IdentityResult;
}

fn unexpected(output: &IdentityOutput) -> IdentityError {
    IdentityError::Service {
        message: format!("unexpected identity output: {output:?}"),
    }
}

pub struct IdentityService<Ev> {
    context: CapabilityContext<IdentityOperation, Ev>,
}

impl<Ev> Capability<Ev> for IdentityService<Ev> {
    type Operation = IdentityOperation;
    type MappedSelf<MappedEv> = IdentityService<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        IdentityService::new(self.context.map_event(f))
    }
}

impl<Ev> IdentityService<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<IdentityOperation, Ev>) -> Self {
        Self { context }
    }

    /// Startup session read. Any failure means "not authenticated"; the
    /// caller decides whether to surface it (at startup it is swallowed).
    pub fn bootstrap<F>(&self, make_event: F)
    where
        F: FnOnce(Result<AuthSession, IdentityError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let session = match context
                .request_from_shell(IdentityOperation::GetCurrentSession)
                .await
            {
                Ok(IdentityOutput::Session(s)) => s,
                Ok(other) => {
                    context.update_app(make_event(Err(unexpected(&other))));
                    return;
                }
                Err(e) => {
                    context.update_app(make_event(Err(e)));
                    return;
                }
            };

            let result = match context
                .request_from_shell(IdentityOperation::GetIdentity)
                .await
            {
                Ok(IdentityOutput::Identity(identity)) => Ok(AuthSession { session, identity }),
                Ok(other) => Err(unexpected(&other)),
                Err(e) => Err(e),
            };
            context.update_app(make_event(result));
        });
    }

    /// Best-effort teardown of any stale remote session, then session
    /// creation and identity fetch. A missing prior session is not an
    /// error; credential failures propagate to the completion event.
    pub fn sign_in<F>(&self, email: String, password: String, make_event: F)
    where
        F: FnOnce(Result<AuthSession, IdentityError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let _ = context
                .request_from_shell(IdentityOperation::DeleteCurrentSession)
                .await;

            let result = Self::create_session_and_fetch(&context, email, password).await;
            context.update_app(make_event(result));
        });
    }

    /// Pre-cleanup, identity creation, then auto sign-in with the same
    /// credentials.
    pub fn sign_up<F>(&self, email: String, password: String, name: Option<String>, make_event: F)
    where
        F: FnOnce(Result<AuthSession, IdentityError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let _ = context
                .request_from_shell(IdentityOperation::DeleteCurrentSession)
                .await;

            let created = context
                .request_from_shell(IdentityOperation::CreateIdentity {
                    unique_id: Uuid::new_v4().to_string(),
                    email: email.clone(),
                    password: password.clone(),
                    name,
                })
                .await;

            let result = match created {
                Ok(IdentityOutput::Identity(_)) => {
                    Self::create_session_and_fetch(&context, email, password).await
                }
                Ok(other) => Err(unexpected(&other)),
                Err(e) => Err(e),
            };
            context.update_app(make_event(result));
        });
    }

    /// Remote session deletion. The outcome is reported as-is; the app
    /// clears local state regardless of it.
    pub fn sign_out<F>(&self, make_event: F)
    where
        F: FnOnce(Result<(), IdentityError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(IdentityOperation::DeleteCurrentSession)
                .await
                .map(|_| ());
            context.update_app(make_event(result));
        });
    }

    async fn create_session_and_fetch(
        context: &CapabilityContext<IdentityOperation, Ev>,
        email: String,
        password: String,
    ) -> Result<AuthSession, IdentityError> {
        let session = match context
            .request_from_shell(IdentityOperation::CreateSession { email, password })
            .await
        {
            Ok(IdentityOutput::Session(s)) => s,
            Ok(other) => return Err(unexpected(&other)),
            Err(e) => return Err(e),
        };

        match context
            .request_from_shell(IdentityOperation::GetIdentity)
            .await
        {
            Ok(IdentityOutput::Identity(identity)) => Ok(AuthSession { session, identity }),
            Ok(other) => Err(unexpected(&other)),
            Err(e) => Err(e),
        }
    }
}
