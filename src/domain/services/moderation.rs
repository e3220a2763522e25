use crate::domain::models::event::EventStatus;
use crate::error::AppError;

/// Result of applying an admin moderation decision.
#[derive(Debug, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Status changes to the target.
    Apply,
    /// Event already carries the target status; nothing to write.
    Noop,
}

/// Admin decision on a pending event. Approval and rejection are one-way:
/// only `pending` events can move, and repeating a decision is a no-op.
/// An event re-enters `pending` solely through an organizer edit.
pub fn moderate(current: EventStatus, target: EventStatus) -> Result<ModerationOutcome, AppError> {
    match target {
        EventStatus::Approved | EventStatus::Rejected => {}
        _ => {
            return Err(AppError::Conflict(format!(
                "{} is not a moderation target",
                target.as_str()
            )));
        }
    }

    if current == target {
        return Ok(ModerationOutcome::Noop);
    }

    match current {
        EventStatus::Pending => Ok(ModerationOutcome::Apply),
        _ => Err(AppError::Conflict(format!(
            "Cannot move event from {} to {}",
            current.as_str(),
            target.as_str()
        ))),
    }
}

/// Status an organizer edit always lands the event in, whatever it was
/// before. Full re-verification policy.
pub fn status_after_edit() -> EventStatus {
    EventStatus::Pending
}

/// Only approved events are eligible for registration.
pub fn accepts_registrations(status: EventStatus) -> bool {
    status == EventStatus::Approved
}
