//! Library wrapper around the `grove` CLI so `cargo test -p grove-cli --lib`
//! typechecks the binary without building the integration suite.

#[allow(dead_code)]
#[path = "main.rs"]
mod main_bin;
