//! Session teardown adapters

pub mod navigator;
pub mod terminator;

pub use navigator::{BroadcastNavigator, NavigationEvent};
pub use terminator::LoginRedirectTerminator;
