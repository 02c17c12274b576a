use std::env;

/// Environment variable naming the serial port used when none is given.
pub const PORT_ENV: &str = "TETHER_PORT";

/// Resolves the default serial port from the environment.
pub fn default_port() -> Option<String> {
    env::var(PORT_ENV).ok().filter(|value| !value.trim().is_empty())
}
