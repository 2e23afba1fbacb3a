//! "My account" edit form.
//!
//! The draft is a local copy of the profile. Nothing typed into it reaches the
//! profile until the service accepts the update and the controller re-reads it.

use thiserror::Error;

use wework_auth::Sex;

use crate::controller::{AuthController, AuthError};
use crate::notify::{Notification, Notifier};
use crate::types::{ChangePasswordRequest, Profile, UpdateProfileRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter your birthday.")]
    MissingBirthday,
    #[error("Please enter your email.")]
    MissingEmail,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("not editing")]
    NotEditing,
    #[error(transparent)]
    Invalid(#[from] DraftError),
    #[error("profile update rejected: {0}")]
    Rejected(#[source] AuthError),
}

/// Editable fields as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    /// `YYYY-MM-DD`, or empty.
    pub birthday: String,
    pub email: String,
    pub sex: Sex,
}

impl ProfileDraft {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            birthday: profile
                .birthday
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
            sex: profile.sex,
        }
    }

    /// Emptiness checks only; the service validates formats.
    pub fn validate(&self) -> Result<UpdateProfileRequest, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.birthday.is_empty() {
            return Err(DraftError::MissingBirthday);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DraftError::MissingEmail);
        }

        Ok(UpdateProfileRequest {
            name: name.to_string(),
            birthday: self.birthday.clone(),
            email: email.to_string(),
            sex: self.sex,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Viewing,
    Editing,
    Saving,
}

#[derive(Debug, Clone)]
pub struct ProfileEditor {
    mode: EditMode,
    draft: ProfileDraft,
}

impl ProfileEditor {
    pub fn new(profile: &Profile) -> Self {
        Self {
            mode: EditMode::Viewing,
            draft: ProfileDraft::from_profile(profile),
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn begin_edit(&mut self, profile: &Profile) {
        self.draft = ProfileDraft::from_profile(profile);
        self.mode = EditMode::Editing;
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        if self.mode == EditMode::Editing {
            self.draft.name = value.into();
        }
    }

    pub fn set_birthday(&mut self, value: impl Into<String>) {
        if self.mode == EditMode::Editing {
            self.draft.birthday = value.into();
        }
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        if self.mode == EditMode::Editing {
            self.draft.email = value.into();
        }
    }

    pub fn set_sex(&mut self, value: Sex) {
        if self.mode == EditMode::Editing {
            self.draft.sex = value;
        }
    }

    pub fn cancel(&mut self, profile: &Profile) {
        self.draft = ProfileDraft::from_profile(profile);
        self.mode = EditMode::Viewing;
    }

    /// Re-mirror a refreshed profile. Ignored while the user is editing.
    pub fn sync(&mut self, profile: &Profile) {
        if self.mode == EditMode::Viewing {
            self.draft = ProfileDraft::from_profile(profile);
        }
    }

    /// Validate, submit and refresh. Emits nothing; see [`save_notification`].
    pub async fn save(&mut self, controller: &AuthController) -> Result<(), SaveError> {
        if self.mode != EditMode::Editing {
            return Err(SaveError::NotEditing);
        }
        let request = self.draft.validate()?;

        self.mode = EditMode::Saving;
        match controller.update_profile(&request).await {
            Ok(profile) => {
                self.draft = ProfileDraft::from_profile(&profile);
                self.mode = EditMode::Viewing;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile save failed");
                self.mode = EditMode::Editing;
                Err(SaveError::Rejected(err))
            }
        }
    }

    pub async fn save_and_notify(
        &mut self,
        controller: &AuthController,
        notifier: &dyn Notifier,
    ) -> Result<(), SaveError> {
        let outcome = self.save(controller).await;
        notifier.notify(save_notification(&outcome));
        outcome
    }
}

/// What the user is told about a save attempt.
pub fn save_notification(outcome: &Result<(), SaveError>) -> Notification {
    match outcome {
        Ok(()) => Notification::success("Profile updated."),
        Err(SaveError::NotEditing) => Notification::info("Nothing to save."),
        Err(SaveError::Invalid(err)) => Notification::warn(err.to_string()),
        Err(SaveError::Rejected(_)) => Notification::error("Failed to update profile."),
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<ChangePasswordRequest, AuthError> {
        Ok(ChangePasswordRequest::new(
            self.old_password.clone(),
            self.new_password.clone(),
        )?)
    }

    pub async fn submit(&self, controller: &AuthController) -> Result<(), AuthError> {
        let request = self.validate()?;
        controller.change_password(&request).await
    }
}
