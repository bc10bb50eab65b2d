//! Per-session conversation: states, inputs, replies and the machine that
//! ties them to the profile source and the activity feed.

pub mod input;
pub mod locale;
pub mod machine;
pub mod reply;
pub mod session;
pub mod state;

pub use input::{Callback, Inbound, Input};
pub use locale::Language;
pub use machine::{ConversationMachine, MachineSettings, Outcome};
pub use reply::{Button, Keyboard, ProfileDelivery, Reply, ShownProfile};
pub use session::{Session, SessionManager};
pub use state::ConversationState;
