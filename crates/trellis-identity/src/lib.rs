//! # trellis-identity
//!
//! Identity-server trust layer for Trellis: resolves third-party-identifier
//! (3PID) invites — invites addressed by email or phone number rather than a
//! native user ID — by consulting a remote identity server and verifying its
//! answer before trusting it.
//!
//! ## Architecture
//!
//! ```text
//!  membership request ──► resolver ──► lookup ──► verify ──► keys
//!                                         │                   │
//!                                         └──── client (HTTP) ┘
//! ```
//!
//! ## Key concepts
//!
//! - **Binding assertions** (`types.rs`): an identity server's signed,
//!   time-windowed claim that `(medium, address)` maps to a user ID.
//! - **Canonical JSON** (`canonical.rs`): the deterministic byte payload the
//!   signatures cover — sorted keys, `signatures` object excluded.
//! - **Verification** (`verify.rs`, `keys.rs`): every listed `(domain, key)`
//!   signature must check out against the key fetched from that domain; one
//!   failure rejects the whole assertion.
//! - **Lookup** (`lookup.rs`): the query / validity-window / signature state
//!   machine, with a bounded retry when the remote returns a stale window.
//! - **Resolution** (`resolver.rs`): turns a membership request's 3PID fields
//!   into a native target, a "nobody owns this yet" outcome, or a failure.
//!
//! The whole resolution runs on the caller's task; dropping the future
//! abandons any in-flight identity-server request.

pub mod cache;
pub mod canonical;
pub mod client;
pub mod clock;
pub mod error;
pub mod keys;
pub mod lookup;
pub mod resolver;
pub mod types;
pub mod verify;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::IdentityClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::IdentityError;
pub use resolver::Resolution;
pub use types::ThreePidAssertion;
pub use verify::{KeyFetcher, verify_assertion};
