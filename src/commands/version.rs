//! Command: print version information.

/// Version string, overridable at build time through `PORYSYNC_VERSION`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PORYSYNC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the porysync version to stdout.
pub fn run() {
    println!("porysync {}", version());
}
