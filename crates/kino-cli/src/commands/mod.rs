pub mod artifacts;
pub mod chat;
pub mod tree;
pub mod utils;
pub mod watch;
