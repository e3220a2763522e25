use crate::domain::models::actor::Role;

/// Role-gated actions. Ownership checks (an organizer editing their own
/// event, a buyer cancelling their own registration) stay with the
/// handlers; this table only answers "may this role ever do that".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateEvent,
    EditEvent,
    DeleteEvent,
    ModerateEvent,
    ViewModerationQueue,
    ViewEventStats,
    Register,
    CancelRegistration,
    ReconcileCounters,
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    match action {
        Action::ModerateEvent | Action::ViewModerationQueue | Action::ReconcileCounters => {
            role == Role::Admin
        }
        Action::CreateEvent
        | Action::EditEvent
        | Action::DeleteEvent
        | Action::ViewEventStats
        | Action::Register
        | Action::CancelRegistration => true,
    }
}
