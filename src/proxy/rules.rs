//! Response-transform rules applied after the backend call.

use crate::proxy::forwarder::{BackendReply, ForwardError};
use crate::routing::{ResponseRule, Transform, Trigger};

/// Result of the single outbound call.
pub type Outcome = Result<BackendReply, ForwardError>;

/// What the handler sends back once rules have been applied.
#[derive(Debug)]
pub enum Resolution {
    /// Backend answer, untouched.
    Relay(BackendReply),
    /// A rule replaced the answer.
    Rewritten(BackendReply),
    /// No rule covered an unreachable backend.
    Failed(ForwardError),
}

fn triggered(trigger: &Trigger, outcome: &Outcome, token_presented: bool) -> bool {
    match (trigger, outcome) {
        (Trigger::Always, _) => true,
        (Trigger::Unreachable, Err(_)) => true,
        (Trigger::Success, Ok(reply)) => reply.status.is_success(),
        (Trigger::Status(status), Ok(reply)) => reply.status == *status,
        (Trigger::StatusWithToken(status), Ok(reply)) => {
            token_presented && reply.status == *status
        }
        _ => false,
    }
}

/// Apply the first matching rule in declaration order.
///
/// `token_presented` tells whether the inbound request carried a bearer token.
pub fn resolve(rules: &[ResponseRule], outcome: Outcome, token_presented: bool) -> Resolution {
    for rule in rules
        .iter()
        .filter(|rule| triggered(&rule.trigger, &outcome, token_presented))
    {
        match (&rule.transform, &outcome) {
            (Transform::Reply(status, body), _) => {
                return Resolution::Rewritten(BackendReply {
                    status: *status,
                    body: body.clone(),
                });
            }
            (Transform::Body(body), Ok(reply)) => {
                return Resolution::Rewritten(BackendReply {
                    status: reply.status,
                    body: body.clone(),
                });
            }
            // Keeping a status needs a backend answer.
            (Transform::Body(_), Err(_)) => continue,
        }
    }

    match outcome {
        Ok(reply) => Resolution::Relay(reply),
        Err(err) => Resolution::Failed(err),
    }
}
