use crate::event::{IdentityBlock, IdentityKind};

pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Human-readable "initiated by" identity for the notification footer.
///
/// Assumed-role principals look like `AROAEXAMPLE:alice@example.com`; the
/// session name after the first colon is what operators recognise.
pub fn resolve_actor(identity: Option<&IdentityBlock>) -> String {
    let Some(identity) = identity else {
        return UNKNOWN_ACTOR.to_string();
    };

    let actor = match identity.identity_kind() {
        IdentityKind::IamUser => identity.user_name.as_deref(),
        // An empty session name ("AROA...:") carries no identity.
        IdentityKind::AssumedRole => identity
            .principal_id
            .as_deref()
            .and_then(|principal| principal.split(':').nth(1))
            .filter(|session| !session.is_empty()),
        IdentityKind::Other => None,
    };

    actor.unwrap_or(UNKNOWN_ACTOR).to_string()
}
