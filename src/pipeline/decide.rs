//! Downstream action selection from a category label.

pub const SEND_INTERVIEW_INVITE: &str = "Send Interview Invite";
pub const SEND_TO_HR: &str = "Send to HR for Manual Review";
pub const SEND_REJECTION: &str = "Send Rejection Email";

/// Pick the action for a category label.
///
/// Matching is substring containment, checked in priority order; the final
/// branch also absorbs the `Underfit` and `Invalid Score Format` labels.
pub fn decide(category: &str) -> &'static str {
    if category.contains("High Fit") {
        SEND_INTERVIEW_INVITE
    } else if category.contains("Medium Fit") {
        SEND_TO_HR
    } else {
        SEND_REJECTION
    }
}
