use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

use crate::domain::{FormField, UserId};
use crate::error::ManagerError;
use crate::manager::UserManagerState;
use crate::messages::ManagerRequest;

/// Handle for dispatching UI events to the [`crate::manager::UserManager`]
/// actor and observing its state.
///
/// Each method returns once the actor has applied the event; remote calls the
/// event triggers keep running in the background.
#[derive(Clone)]
pub struct UserManagerClient {
    sender: mpsc::Sender<ManagerRequest>,
    updates: watch::Receiver<UserManagerState>,
}

impl UserManagerClient {
    pub fn new(sender: mpsc::Sender<ManagerRequest>, updates: watch::Receiver<UserManagerState>) -> Self {
        Self { sender, updates }
    }

    /// A receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<UserManagerState> {
        self.updates.clone()
    }

    /// Submits the form as a create or an update, depending on the mode.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<(), ManagerError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ManagerRequest::Submit { respond_to })
            .await
            .map_err(|_| ManagerError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| ManagerError::ActorCommunicationError("Actor dropped".to_string()))?
            .map_err(ManagerError::from)
    }

    /// Waits until the published state satisfies `predicate` and returns it.
    #[cfg(test)]
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&UserManagerState) -> bool,
    ) -> Result<UserManagerState, ManagerError> {
        let mut updates = self.subscribe();
        let state = updates
            .wait_for(predicate)
            .await
            .map_err(|_| ManagerError::ActorCommunicationError("Actor stopped".to_string()))?;
        Ok(state.clone())
    }
}

client_method!(UserManagerClient => fn mount() -> () as ManagerRequest::Mount);
client_method!(UserManagerClient => fn change_field(field: FormField, value: String) -> () as ManagerRequest::ChangeField);
client_method!(UserManagerClient => fn start_edit(id: UserId) -> bool as ManagerRequest::StartEdit);
client_method!(UserManagerClient => fn clear() -> () as ManagerRequest::Clear);
client_method!(UserManagerClient => fn delete(id: UserId) -> () as ManagerRequest::Delete);
client_method!(UserManagerClient => fn get_state() -> UserManagerState as ManagerRequest::GetState);
