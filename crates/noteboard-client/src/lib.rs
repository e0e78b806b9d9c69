//! # noteboard-client
//!
//! Client-side controllers for noteboard.
//!
//! - [`client`]: the [`ActionClient`] seam, implemented in-process by
//!   [`Actions`](noteboard_api::Actions) and over HTTP by [`HttpActionClient`]
//! - [`identity`]: where the current user comes from
//! - [`debounce`]: cancellable quiet-period timers
//! - [`board`]: the board of categories and their notes
//! - [`detail`]: the single-note editor with title editing and save-on-exit

pub mod board;
pub mod client;
pub mod debounce;
pub mod detail;
pub mod identity;

pub use board::{BoardController, BoardStatus, CategoryError, Navigation};
pub use client::{action_data, ActionClient, ClientError, ClientResult, HttpActionClient};
pub use debounce::Debouncer;
pub use detail::{
    DetailController, DetailStatus, ExitOutcome, SaveOutcome, SavePolicy, SaveState, TitleEdit,
};
pub use identity::{IdentityProvider, SharedIdentity, StaticIdentity};
