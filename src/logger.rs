use crate::{Res, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

impl Verbosity {
    /// Default filter directive; `RUST_LOG` replaces it when set.
    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::Normal => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

fn env_filter(verbosity: Verbosity, from_env: Option<&str>) -> EnvFilter {
    from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directive()))
}

pub fn init(verbosity: Verbosity) -> Res<()> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(env_filter(verbosity, from_env.as_deref()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(atty::Stream::Stderr))
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {}", e))?;

    Ok(())
}
