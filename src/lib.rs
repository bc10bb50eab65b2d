#![warn(clippy::pedantic)]
// Noisy doc/signature lints
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference: format!("{}", x) over format!("{x}")
#![allow(clippy::uninlined_format_args)]
// Intentional casts between Telegram ids, page indices and counts
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
// Conversation dispatch is one long match; splitting would be artificial
#![allow(clippy::too_many_lines)]
// Module structure: feed::ActivityFeed, source::HttpProfileSource and friends
#![allow(clippy::module_name_repetitions)]

pub mod activity;
pub mod channels;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod pager;
pub mod source;
pub mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
