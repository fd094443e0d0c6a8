//! Filter-command handling and marker projection for the investment map.
//!
//! Assistant replies come in as raw text, get decoded into commands,
//! mutate the canonical filter state, and drive cancellable property
//! fetches whose results are projected into markers. Stale fetches are
//! detected by generation and discarded; the map never shows results
//! for a filter state the user has already moved past.

pub mod error;
pub mod filter_store;
pub mod interpreter;
pub mod projector;
pub mod reply;
pub mod session;

pub use error::{CommandError, MapError};
pub use filter_store::FilterStore;
pub use interpreter::Command;
pub use projector::MarkerProjector;
pub use reply::{decode_reply, AgentReply};
pub use session::{FetchTicket, MapSession, ReplyOutcome};
