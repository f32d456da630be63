use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Subscriber writing pretty events through the test harness capture, so
/// output only shows for failing tests. `RUST_LOG` overrides `env_filter`.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let stderr = fmt::Layer::new()
        .with_test_writer()
        .pretty();
    Registry::default().with(env_filter).with(stderr)
}
