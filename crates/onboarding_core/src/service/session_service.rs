//! Session lifecycle and UI preference service.
//!
//! # Responsibility
//! - Log users in and out (demo mode: the password is never verified).
//! - Persist the theme preference.
//!
//! # Invariants
//! - At most one session is stored; login overwrites it.
//! - Every login and every logout of an active session appends one activity.

use crate::clock::Clock;
use crate::model::activity::{ActivityKind, NewActivity};
use crate::model::session::{derive_display_name, Role, Session, Theme};
use crate::repo::onboarding_repo::{OnboardingRepository, RepoError, RepoResult};
use crate::store::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum SessionServiceError {
    /// A required credential was blank.
    MissingCredential(&'static str),
    Repo(RepoError),
}

impl Display for SessionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential(field) => write!(f, "`{field}` must not be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingCredential(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct SessionService<S: KeyValueStore, C: Clock> {
    repo: OnboardingRepository<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> SessionService<S, C> {
    pub fn new(repo: OnboardingRepository<S>, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Starts a session for `email` acting as `role`.
    ///
    /// Any non-empty password is accepted; the email needs a local part
    /// that yields a display name.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Session, SessionServiceError> {
        let email = email.trim();
        for (field, value) in [("email", email), ("password", password)] {
            if value.trim().is_empty() {
                warn!("event=login module=service status=rejected reason=missing_{field}");
                return Err(SessionServiceError::MissingCredential(field));
            }
        }

        let name = derive_display_name(email);
        if name.is_empty() {
            warn!("event=login module=service status=rejected reason=empty_local_part");
            return Err(SessionServiceError::MissingCredential("email"));
        }

        let now = self.clock.now();
        let session = Session {
            id: format!("user-{}", Uuid::new_v4()),
            email: email.to_string(),
            role,
            name,
            login_at: now,
        };
        self.repo.save_session(&session)?;
        self.repo.append_activity(
            NewActivity::new(
                ActivityKind::Login,
                session.name.clone(),
                format!("{} logged in as {}", session.name, role),
            )
            .into_activity(now),
        )?;

        info!("event=login module=service status=ok role={role}");
        Ok(session)
    }

    /// Ends the current session, returning it when one was active.
    pub fn logout(&self) -> RepoResult<Option<Session>> {
        let session = self.repo.load_session()?;
        if let Some(active) = &session {
            self.repo.append_activity(
                NewActivity::new(
                    ActivityKind::Logout,
                    active.name.clone(),
                    format!("{} logged out", active.name),
                )
                .into_activity(self.clock.now()),
            )?;
        }
        self.repo.clear_session()?;
        info!(
            "event=logout module=service status=ok had_session={}",
            session.is_some()
        );
        Ok(session)
    }

    pub fn current_session(&self) -> RepoResult<Option<Session>> {
        self.repo.load_session()
    }

    pub fn theme(&self) -> RepoResult<Theme> {
        self.repo.load_theme()
    }

    pub fn set_theme(&self, theme: Theme) -> RepoResult<()> {
        self.repo.save_theme(theme)
    }

    /// Flips light/dark and returns the new theme.
    pub fn toggle_theme(&self) -> RepoResult<Theme> {
        let next = self.repo.load_theme()?.toggled();
        self.repo.save_theme(next)?;
        Ok(next)
    }
}
