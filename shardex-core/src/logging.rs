/// Setup structured tracing for binaries; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout).json())
        .try_init()
    {
        Ok(()) => tracing::info!("shardex logging initialized"),
        Err(e) => tracing::warn!(error = %e, "Global subscriber already set, keeping it"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_keeps_first_subscriber() {
        init_logging();
        init_logging();
        tracing::info!("still logging");
    }
}
