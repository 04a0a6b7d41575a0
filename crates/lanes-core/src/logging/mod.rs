use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize JSON logging on stderr.
///
/// When `quiet` is true, only error-level events are emitted.
/// `RUST_LOG` directives are honoured on top of the default.
pub fn init_logging(quiet: bool) {
    let directive = if quiet { "lanes=error" } else { "lanes=info" };

    let filter = match directive.parse() {
        Ok(parsed) => EnvFilter::from_default_env().add_directive(parsed),
        Err(_) => EnvFilter::from_default_env(),
    };

    // try_init: hosts embedding the library may already own a subscriber
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging(true);
        init_logging(false);
    }
}
