use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::RegistrationDesk;
use crate::error::{ApiError, ModalError};
use crate::models::{Registration, RegistrationRequest};
use crate::notify::{Notification, Notifier};

pub const SUCCESS_TITLE: &str = "報名成功！";
pub const SUCCESS_DESCRIPTION: &str = "我們會盡快寄送確認信到您的信箱";
pub const FAILURE_TITLE: &str = "報名失敗";
pub const FAILURE_FALLBACK: &str = "請稍後再試";

/// How long the confirmation stays up before the modal resets and closes.
pub const CLOSE_DELAY: Duration = Duration::from_secs(2);
pub const MAX_PARTICIPANTS: u8 = 5;

/// What the modal shows about the course being registered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Email,
    Participants,
}

/// Raw form values, kept as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub participants: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            participants: "1".to_string(),
        }
    }
}

impl RegistrationForm {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Participants => &mut self.participants,
        };
        *slot = value.into();
    }

    /// Same gate as the browser's `required` attributes (present, not
    /// necessarily non-blank), plus the 1–5 head count the select offers.
    pub fn to_request(&self, course_id: i64) -> Result<RegistrationRequest, ModalError> {
        for (label, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
        ] {
            if value.is_empty() {
                return Err(ModalError::MissingField(label));
            }
        }

        let participants = self
            .participants
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=MAX_PARTICIPANTS).contains(n))
            .ok_or_else(|| ModalError::InvalidParticipants(self.participants.clone()))?;

        Ok(RegistrationRequest {
            course_id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            participants,
            notes: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed { message: String },
}

/// Published on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalStatus {
    Closed,
    Open {
        session: SessionId,
        status: SubmissionStatus,
    },
}

impl ModalStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, ModalStatus::Closed)
    }

    pub fn submission(&self) -> Option<&SubmissionStatus> {
        match self {
            ModalStatus::Closed => None,
            ModalStatus::Open { status, .. } => Some(status),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModalSession {
    pub id: SessionId,
    pub course: CourseSummary,
    pub form: RegistrationForm,
    pub status: SubmissionStatus,
}

/// A create-registration call detached from the modal, so the modal can be
/// reopened while it is in flight.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub session: SessionId,
    pub request: RegistrationRequest,
}

impl PendingSubmission {
    pub async fn send(&self, desk: &dyn RegistrationDesk) -> Result<Registration, ApiError> {
        desk.create_registration(&self.request).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(Registration),
    Failed(ApiError),
    /// The session that started the call is gone; the result was dropped.
    Stale,
}

pub struct RegistrationModal {
    desk: Arc<dyn RegistrationDesk>,
    notifier: Arc<dyn Notifier>,
    session: Option<ModalSession>,
    status_tx: watch::Sender<ModalStatus>,
    close_delay: Duration,
}

impl RegistrationModal {
    pub fn new(desk: Arc<dyn RegistrationDesk>, notifier: Arc<dyn Notifier>) -> Self {
        let (status_tx, _) = watch::channel(ModalStatus::Closed);
        Self {
            desk,
            notifier,
            session: None,
            status_tx,
            close_delay: CLOSE_DELAY,
        }
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<ModalStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> ModalStatus {
        match &self.session {
            None => ModalStatus::Closed,
            Some(s) => ModalStatus::Open {
                session: s.id,
                status: s.status.clone(),
            },
        }
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    pub fn form(&self) -> Option<&RegistrationForm> {
        self.session.as_ref().map(|s| &s.form)
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.status());
    }

    /// Starts a fresh session for `course`, replacing any existing one.
    pub fn open(&mut self, course: CourseSummary) -> SessionId {
        if let Some(previous) = &self.session {
            debug!("replacing registration session {}", previous.id);
        }

        let id = SessionId::new();
        info!("opening registration for course {} ({})", course.id, course.title);
        self.session = Some(ModalSession {
            id,
            course,
            form: RegistrationForm::default(),
            status: SubmissionStatus::Idle,
        });
        self.publish();
        id
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), ModalError> {
        let session = self.session.as_mut().ok_or(ModalError::NotOpen)?;
        match session.status {
            SubmissionStatus::Idle | SubmissionStatus::Failed { .. } => {
                session.form.set(field, value);
            }
            SubmissionStatus::Submitting | SubmissionStatus::Succeeded => {
                return Err(ModalError::NotEditable);
            }
        }
        self.clear_failure();
        Ok(())
    }

    /// A failed session stays `Failed` until the user acts on it again.
    fn clear_failure(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if matches!(session.status, SubmissionStatus::Failed { .. }) {
            session.status = SubmissionStatus::Idle;
            self.publish();
        }
    }

    /// Closing is refused only while a submission is in flight; the call
    /// itself is never aborted.
    pub fn close(&mut self) -> Result<(), ModalError> {
        match &self.session {
            None => Ok(()),
            Some(s) if s.status == SubmissionStatus::Submitting => {
                Err(ModalError::SubmissionInFlight)
            }
            Some(s) => {
                debug!("closing registration session {}", s.id);
                self.session = None;
                self.publish();
                Ok(())
            }
        }
    }

    /// Validates locally and moves to `Submitting`. Nothing is sent when
    /// this fails.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, ModalError> {
        let session = self.session.as_mut().ok_or(ModalError::NotOpen)?;
        match session.status {
            SubmissionStatus::Submitting => return Err(ModalError::SubmissionInFlight),
            SubmissionStatus::Succeeded => return Err(ModalError::NotEditable),
            SubmissionStatus::Idle | SubmissionStatus::Failed { .. } => {}
        }
        self.clear_failure();

        let session = self.session.as_mut().ok_or(ModalError::NotOpen)?;
        let request = session.form.to_request(session.course.id)?;
        session.status = SubmissionStatus::Submitting;
        let pending = PendingSubmission {
            session: session.id,
            request,
        };
        self.publish();
        Ok(pending)
    }

    /// Applies the result of a call started by [`begin_submit`].
    ///
    /// [`begin_submit`]: Self::begin_submit
    pub fn complete_submit(
        &mut self,
        session_id: SessionId,
        result: Result<Registration, ApiError>,
    ) -> SubmitOutcome {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.id == session_id && s.status == SubmissionStatus::Submitting)
        else {
            debug!("ignoring result for stale registration session {}", session_id);
            return SubmitOutcome::Stale;
        };

        match result {
            Ok(registration) => {
                info!(
                    "registration {} created for course {}",
                    registration.id, registration.course_id
                );
                session.status = SubmissionStatus::Succeeded;
                self.publish();
                self.notifier
                    .notify(Notification::info(SUCCESS_TITLE, SUCCESS_DESCRIPTION));
                SubmitOutcome::Succeeded(registration)
            }
            Err(err) => {
                warn!("registration failed for session {}: {:?}", session_id, err);
                let message = Some(err.user_message())
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| FAILURE_FALLBACK.to_string());

                session.status = SubmissionStatus::Failed {
                    message: message.clone(),
                };
                self.publish();
                self.notifier
                    .notify(Notification::destructive(FAILURE_TITLE, message));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Resets and closes after the confirmation delay. Does nothing if the
    /// session was closed or replaced in the meantime.
    pub fn finish_success(&mut self, session_id: SessionId) -> bool {
        let still_showing = self
            .session
            .as_ref()
            .is_some_and(|s| s.id == session_id && s.status == SubmissionStatus::Succeeded);
        if !still_showing {
            return false;
        }

        // dropping the session discards the entered values
        self.session = None;
        self.publish();
        true
    }

    /// Full submit: validate, call the API, report, and on success wait out
    /// the confirmation before closing.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ModalError> {
        let pending = self.begin_submit()?;
        let result = pending.send(self.desk.as_ref()).await;
        let outcome = self.complete_submit(pending.session, result);

        if matches!(outcome, SubmitOutcome::Succeeded(_)) {
            tokio::time::sleep(self.close_delay).await;
            self.finish_success(pending.session);
        }

        Ok(outcome)
    }
}
