use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, info_span, instrument, warn, Instrument};

use super::state::{Completion, RemoteCall, UserManagerState};
use crate::api::UserApi;
use crate::clients::UserManagerClient;
use crate::domain::{FormField, UserId};
use crate::error::SubmitRejected;
use crate::messages::{ManagerRequest, Response};

/// Owns the [`UserManagerState`] and is the only place it changes.
///
/// UI events arrive on the mailbox; remote calls run as spawned tasks that
/// report back on a separate completion channel, so the mailbox keeps
/// draining while a call is pending. Every applied change is published on a
/// watch channel for renderers.
pub struct UserManager {
    receiver: mpsc::Receiver<ManagerRequest>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    api: Arc<dyn UserApi>,
    state: UserManagerState,
    published: watch::Sender<UserManagerState>,
}

impl UserManager {
    pub fn new(buffer_size: usize, api: Arc<dyn UserApi>) -> (Self, UserManagerClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let state = UserManagerState::default();
        let (published, updates) = watch::channel(state.clone());
        let actor = Self {
            receiver,
            completion_tx,
            completion_rx,
            api,
            state,
            published,
        };
        (actor, UserManagerClient::new(sender, updates))
    }

    /// Runs until every client handle is dropped. Completions still pending at
    /// that point are discarded.
    #[instrument(name = "user_manager", skip(self))]
    pub async fn run(mut self) {
        info!("UserManager starting");
        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle_request(msg),
                    None => break,
                },
                Some(completion) = self.completion_rx.recv() => {
                    self.state.apply(completion);
                    self.publish();
                }
            }
        }
        if !self.state.in_flight.is_idle() {
            warn!(in_flight = ?self.state.in_flight, "Discarding pending remote calls");
        }
        info!("UserManager stopped");
    }

    fn handle_request(&mut self, msg: ManagerRequest) {
        match msg {
            ManagerRequest::Mount { respond_to } => {
                let call = self.state.mount();
                self.dispatch(call);
                self.publish_and_ack(respond_to, ());
            }
            ManagerRequest::ChangeField { field, value, respond_to } => {
                self.handle_change_field(field, value);
                self.publish_and_ack(respond_to, ());
            }
            ManagerRequest::Submit { respond_to } => {
                let result = self.handle_submit();
                self.publish_and_ack(respond_to, result);
            }
            ManagerRequest::StartEdit { id, respond_to } => {
                let found = self.handle_start_edit(id);
                self.publish_and_ack(respond_to, found);
            }
            ManagerRequest::Clear { respond_to } => {
                debug!("Clearing form");
                self.state.clear_form();
                self.publish_and_ack(respond_to, ());
            }
            ManagerRequest::Delete { id, respond_to } => {
                self.handle_delete(id);
                self.publish_and_ack(respond_to, ());
            }
            ManagerRequest::GetState { respond_to } => {
                let _ = respond_to.send(self.state.clone());
            }
        }
    }

    #[instrument(skip(self, value))]
    fn handle_change_field(&mut self, field: FormField, value: String) {
        debug!("Processing change_field request");
        self.state.change_field(field, value);
    }

    #[instrument(skip(self))]
    fn handle_submit(&mut self) -> Result<(), SubmitRejected> {
        debug!(mode = ?self.state.mode, "Processing submit request");
        match self.state.submit() {
            Ok(call) => {
                self.dispatch(call);
                Ok(())
            }
            Err(rejected) => {
                warn!(reason = %rejected, "Submit rejected");
                Err(rejected)
            }
        }
    }

    /// Looks the user up in the current list, so a delete that landed just
    /// before cannot be loaded into the form.
    #[instrument(fields(user_id = id), skip(self))]
    fn handle_start_edit(&mut self, id: UserId) -> bool {
        match self.state.find_user(id).cloned() {
            Some(user) => {
                debug!("Loading user into form");
                self.state.start_edit(&user);
                true
            }
            None => {
                warn!("Edit requested for unknown user");
                false
            }
        }
    }

    #[instrument(fields(user_id = id), skip(self))]
    fn handle_delete(&mut self, id: UserId) {
        debug!("Processing delete request");
        if let Some(call) = self.state.delete(id) {
            self.dispatch(call);
        }
    }

    /// Background handler: the spawned task owns the call and reports its
    /// outcome on the completion channel.
    fn dispatch(&self, call: RemoteCall) {
        let api = Arc::clone(&self.api);
        let completions = self.completion_tx.clone();
        let span = info_span!("remote_call", call = call_name(&call));
        tokio::spawn(
            async move {
                debug!("Sending request");
                let completion = perform(api.as_ref(), call).await;
                if completions.send(completion).is_err() {
                    debug!("Manager stopped before completion arrived");
                }
            }
            .instrument(span),
        );
    }

    fn publish(&self) {
        let state = &self.state;
        self.published.send_if_modified(|current| {
            if current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }

    fn publish_and_ack<T>(&self, respond_to: Response<T>, value: T) {
        self.publish();
        let _ = respond_to.send(value);
    }
}

fn call_name(call: &RemoteCall) -> &'static str {
    match call {
        RemoteCall::Fetch => "fetch",
        RemoteCall::Create(_) => "create",
        RemoteCall::Update(_) => "update",
        RemoteCall::Delete(_) => "delete",
    }
}

async fn perform(api: &dyn UserApi, call: RemoteCall) -> Completion {
    match call {
        RemoteCall::Fetch => Completion::Fetched(api.list_users().await),
        RemoteCall::Create(user) => {
            let result = api.create_user(&user).await;
            Completion::Created { user, result }
        }
        RemoteCall::Update(user) => {
            let result = api.update_user(&user).await;
            Completion::Updated { user, result }
        }
        RemoteCall::Delete(id) => {
            let result = api.delete_user(id).await;
            Completion::Deleted { id, result }
        }
    }
}
