use tokio::sync::oneshot;

use crate::domain::{FormField, UserId};
use crate::error::SubmitRejected;
use crate::manager::UserManagerState;

/// Responder carried by every request; answered once the transition is applied.
pub type Response<T> = oneshot::Sender<T>;

/// Typed messages for the manager actor. Each variant mirrors one UI event.
#[derive(Debug)]
pub enum ManagerRequest {
    Mount {
        respond_to: Response<()>,
    },
    ChangeField {
        field: FormField,
        value: String,
        respond_to: Response<()>,
    },
    Submit {
        respond_to: Response<Result<(), SubmitRejected>>,
    },
    /// Answers `false` when no listed user has `id`.
    StartEdit {
        id: UserId,
        respond_to: Response<bool>,
    },
    Clear {
        respond_to: Response<()>,
    },
    Delete {
        id: UserId,
        respond_to: Response<()>,
    },
    GetState {
        respond_to: Response<UserManagerState>,
    },
}
