//! Describing how the Groovy language server is started and what it is sent.

mod launch;
mod payload;
mod vmargs;

pub use launch::{
    find_server_jar, server_launch, LaunchError, LaunchParams, ServerLaunch, DEBUG_AGENT,
    SERVER_JAR_NAME,
};
pub use payload::{did_change_configuration, initialize_root};
pub use vmargs::tokenize_vmargs;
