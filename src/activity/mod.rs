//! Administrator activity feed: who did what, delivered both as immediate
//! per-action alerts and as debounced aggregate summaries.

pub mod actor;
pub mod alert;
pub mod event;
pub mod feed;
pub mod notifier;
pub mod timer;

pub use actor::{Actor, RawInteraction, RawUser, UNKNOWN, resolve_actor};
pub use alert::AlertEmitter;
pub use event::{ActionEvent, ActionKind};
pub use feed::ActivityFeed;
pub use notifier::AdminNotifier;
