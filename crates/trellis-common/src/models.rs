//! Membership request models — the client-server boundary of a membership change.
//!
//! A membership request may carry either a native target (`user_id`) or the
//! 3PID triple (`id_server`, `medium`, `address`) identifying an invitee by an
//! out-of-band address such as an email. The identity layer resolves the
//! latter into the former before any member event is built.

use serde::{Deserialize, Serialize};

// ─── Membership request ──────────────────────────────────────────────────────

/// Body of `PUT /rooms/{roomId}/(join|kick|ban|unban|leave|invite)`.
///
/// Empty strings are treated the same as absent fields, matching what
/// permissive clients send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipRequest {
    /// Native target user ID (`@user:server`). Filled in by the invite
    /// resolver when a 3PID lookup succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Optional human-readable reason for kicks and bans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Identity server to consult for a 3PID invite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_server: Option<String>,
    /// 3PID medium, e.g. `email` or `msisdn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// 3PID address; interpretation depends on `medium`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// ─── Membership kinds ────────────────────────────────────────────────────────

/// The membership change being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipKind {
    Join,
    Leave,
    Invite,
    Ban,
    Unban,
    Kick,
}

impl MembershipKind {
    /// `unban` and `kick` aren't valid membership values on the wire; both
    /// materialize as `leave` in the resulting member event.
    pub fn normalize(self) -> Self {
        match self {
            Self::Unban | Self::Kick => Self::Leave,
            other => other,
        }
    }

    /// Whether this change targets a user named in the request body rather
    /// than the sender themselves.
    pub fn is_targeted(self) -> bool {
        matches!(self, Self::Ban | Self::Unban | Self::Kick | Self::Invite)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Invite => "invite",
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::Kick => "kick",
        }
    }
}

/// The request named a targeted membership change but no `user_id`.
#[derive(Debug, thiserror::Error)]
#[error("'user_id' must be supplied.")]
pub struct MissingTargetUser;

/// Extract the target user (state key) of a membership change, plus the
/// optional reason.
///
/// For `join` and `leave` the target is the sender. For `ban`, `unban`,
/// `kick` and `invite` the target comes from the request body.
pub fn target_state_key(
    kind: MembershipKind,
    request: &MembershipRequest,
    sender: &str,
) -> Result<(String, Option<String>), MissingTargetUser> {
    if kind.is_targeted() {
        let target = request
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(MissingTargetUser)?;
        Ok((target.to_owned(), request.reason.clone()))
    } else {
        Ok((sender.to_owned(), None))
    }
}
