use std::sync::Arc;
use std::time::Duration;

use scout::{
    AdapterDescriptor, AdapterKey, BackendAdapter, PlaceholderFallback, Scout, ScoutBuilder,
};
use scout_mock::MockAdapter;

/// Two fixture-backed adapters: a paced primary and an unthrottled secondary
/// trusted a little less.
#[must_use]
pub fn builder() -> ScoutBuilder {
    let primary: Arc<dyn BackendAdapter> = Arc::new(MockAdapter::named("browser"));
    let secondary: Arc<dyn BackendAdapter> = Arc::new(MockAdapter::named("search-engine"));
    Scout::builder()
        .with_adapter(
            AdapterDescriptor::new(AdapterKey::new("browser"), "Headless browser")
                .priority(1)
                .daily_quota(20)
                .cooldown(Duration::from_millis(250)),
            primary,
        )
        .with_adapter(
            AdapterDescriptor::new(AdapterKey::new("search-engine"), "Search engine")
                .priority(2)
                .trust(80),
            secondary,
        )
        .adapter_timeout(Duration::from_secs(2))
        .fallback(Arc::new(PlaceholderFallback::default()))
}
