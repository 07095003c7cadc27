//! The manager's state container and its transitions.
//!
//! Every method here is synchronous and free of I/O: a transition either
//! mutates the state directly or hands back the [`RemoteCall`] the actor
//! should run. Completions of those calls come back through [`apply`].
//!
//! [`apply`]: UserManagerState::apply

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::domain::{FormField, FormState, User, UserId};
use crate::error::{ApiError, RemoteOperation, SubmitRejected};

/// Whether the form stands for a new user or an existing one being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Creating,
    Editing,
}

/// Remote calls that have been issued but not yet completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlight {
    /// Fetches can overlap (mount plus refresh), so they are counted.
    pub fetching: usize,
    pub submitting: bool,
    pub deleting: HashSet<UserId>,
}

impl InFlight {
    pub fn is_idle(&self) -> bool {
        self.fetching == 0 && !self.submitting && self.deleting.is_empty()
    }
}

/// A remote call requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Fetch,
    Create(User),
    Update(User),
    Delete(UserId),
}

/// Outcome of a remote call, fed back into the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Fetched(Result<Vec<User>, ApiError>),
    Created { user: User, result: Result<(), ApiError> },
    Updated { user: User, result: Result<(), ApiError> },
    Deleted { id: UserId, result: Result<(), ApiError> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserManagerState {
    pub users: Vec<User>,
    pub form: FormState,
    pub mode: FormMode,
    /// Banner text; empty means no banner.
    pub error: String,
    pub in_flight: InFlight,
}

impl UserManagerState {
    pub fn is_editing(&self) -> bool {
        self.mode == FormMode::Editing
    }

    pub fn find_user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Mount (or refresh): request the whole collection.
    pub fn mount(&mut self) -> RemoteCall {
        self.in_flight.fetching += 1;
        RemoteCall::Fetch
    }

    pub fn change_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn start_edit(&mut self, user: &User) {
        self.form = FormState::from_user(user);
        self.mode = FormMode::Editing;
    }

    /// Empties the form and leaves edit mode.
    pub fn clear_form(&mut self) {
        self.form = FormState::default();
        self.mode = FormMode::Creating;
    }

    /// Turns the current form into a create or update call, depending on mode.
    ///
    /// New users get the placeholder id `users.len() + 1`; the server's own id
    /// is never read back.
    pub fn submit(&mut self) -> Result<RemoteCall, SubmitRejected> {
        if self.in_flight.submitting {
            return Err(SubmitRejected::InFlight);
        }
        let invalid = self.form.invalid_fields();
        if !invalid.is_empty() {
            return Err(SubmitRejected::InvalidFields(invalid));
        }

        let call = match self.mode {
            FormMode::Creating => {
                let id = self.users.len() as UserId + 1;
                RemoteCall::Create(User::from_form(id, &self.form))
            }
            FormMode::Editing => {
                let id = self.form.id.ok_or(SubmitRejected::MissingId)?;
                RemoteCall::Update(User::from_form(id, &self.form))
            }
        };
        self.in_flight.submitting = true;
        Ok(call)
    }

    /// Starts a delete unless one for the same id is already running.
    pub fn delete(&mut self, id: UserId) -> Option<RemoteCall> {
        if self.in_flight.deleting.insert(id) {
            Some(RemoteCall::Delete(id))
        } else {
            warn!(user_id = id, "Delete already in flight, ignoring");
            None
        }
    }

    /// Applies the outcome of a remote call. Failures set the fixed banner for
    /// the operation and leave the list alone; successes never clear the banner.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched(result) => {
                self.in_flight.fetching = self.in_flight.fetching.saturating_sub(1);
                match result {
                    Ok(users) => {
                        info!(user_count = users.len(), "Users fetched");
                        self.users = users;
                    }
                    Err(e) => self.fail(RemoteOperation::Fetch, &e),
                }
            }
            Completion::Created { user, result } => {
                self.in_flight.submitting = false;
                match result {
                    Ok(()) => {
                        info!(user_id = user.id, "User added");
                        self.users.push(user);
                        self.clear_form();
                    }
                    Err(e) => self.fail(RemoteOperation::Add, &e),
                }
            }
            Completion::Updated { user, result } => {
                self.in_flight.submitting = false;
                match result {
                    Ok(()) => {
                        info!(user_id = user.id, "User updated");
                        for entry in self.users.iter_mut().filter(|entry| entry.id == user.id) {
                            *entry = user.clone();
                        }
                        self.clear_form();
                    }
                    Err(e) => self.fail(RemoteOperation::Update, &e),
                }
            }
            Completion::Deleted { id, result } => {
                self.in_flight.deleting.remove(&id);
                match result {
                    Ok(()) => {
                        info!(user_id = id, "User deleted");
                        self.users.retain(|user| user.id != id);
                    }
                    Err(e) => self.fail(RemoteOperation::Delete, &e),
                }
            }
        }
    }

    fn fail(&mut self, operation: RemoteOperation, cause: &ApiError) {
        error!(?operation, error = %cause, "Remote call failed");
        self.error = operation.failure_message().to_string();
    }
}
