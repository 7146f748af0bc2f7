//! Short-lived cache over the user's alerts, groups and targets.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::FrontendClientError;
use notifi_core::TimeProvider;
use notifi_graphql::NotifiService;
use notifi_graphql::models::{
    Alert, ConnectedWallet, DiscordTarget, EmailTarget, Filter, SmsTarget, Source, SourceGroup,
    TargetGroup, TelegramTarget, WebhookTarget,
};

/// How long a successful fetch is served from cache.
pub const DEFAULT_CACHE_TTL_MS: i64 = 1000;

/// Everything the subscription UI needs, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedData {
    /// Alerts.
    pub alerts: Vec<Alert>,
    /// Connected wallets.
    pub connected_wallets: Vec<ConnectedWallet>,
    /// Sources.
    pub sources: Vec<Source>,
    /// Source groups.
    pub source_groups: Vec<SourceGroup>,
    /// Target groups.
    pub target_groups: Vec<TargetGroup>,
    /// Email targets.
    pub email_targets: Vec<EmailTarget>,
    /// SMS targets.
    pub sms_targets: Vec<SmsTarget>,
    /// Telegram targets.
    pub telegram_targets: Vec<TelegramTarget>,
    /// Webhook targets.
    pub webhook_targets: Vec<WebhookTarget>,
    /// Discord targets.
    pub discord_targets: Vec<DiscordTarget>,
    /// Filters applicable to any source, each once.
    pub filters: Vec<Filter>,
}

#[derive(Default)]
struct CacheState {
    data: Option<Arc<FetchedData>>,
    last_success: Option<DateTime<Utc>>,
}

/// Fetches [`FetchedData`] and caches it for a short time.
///
/// Callers arriving while a fetch is running wait for it and share its
/// result. A failed fetch leaves the previous cache in place.
pub struct DataFetcher {
    service: NotifiService,
    clock: Arc<dyn TimeProvider>,
    ttl: chrono::Duration,
    state: Mutex<CacheState>,
    generation: AtomicU64,
}

impl std::fmt::Debug for DataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFetcher")
            .field("ttl", &self.ttl)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl DataFetcher {
    /// Create a fetcher with the default TTL.
    #[must_use]
    pub fn new(service: NotifiService, clock: Arc<dyn TimeProvider>) -> Self {
        Self::with_ttl(service, clock, chrono::Duration::milliseconds(DEFAULT_CACHE_TTL_MS))
    }

    /// Create a fetcher with a custom TTL.
    #[must_use]
    pub fn with_ttl(
        service: NotifiService,
        clock: Arc<dyn TimeProvider>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            service,
            clock,
            ttl,
            state: Mutex::new(CacheState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Cached data, refreshed when stale or when `force` is set.
    ///
    /// # Errors
    ///
    /// Returns error if any of the underlying requests fails.
    pub async fn fetch(&self, force: bool) -> Result<Arc<FetchedData>, FrontendClientError> {
        let seen = self.generation.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        // Another caller finished a fetch while we waited.
        if self.generation.load(Ordering::Acquire) != seen {
            if let Some(data) = &state.data {
                return Ok(Arc::clone(data));
            }
        }

        if !force {
            if let (Some(data), Some(last)) = (&state.data, state.last_success) {
                if self.clock.now() <= last + self.ttl {
                    return Ok(Arc::clone(data));
                }
            }
        }

        debug!("Fetching subscription data");
        let data = Arc::new(fetch_all(&self.service).await?);
        state.data = Some(Arc::clone(&data));
        state.last_success = Some(self.clock.now());
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(data)
    }

    /// Drop the cached data.
    pub async fn invalidate(&self) {
        *self.state.lock().await = CacheState::default();
    }
}

async fn fetch_all(service: &NotifiService) -> Result<FetchedData, FrontendClientError> {
    let (
        alerts,
        connected_wallets,
        sources,
        source_groups,
        target_groups,
        email_targets,
        sms_targets,
        telegram_targets,
        webhook_targets,
        discord_targets,
    ) = tokio::try_join!(
        service.get_alerts(),
        service.get_connected_wallets(),
        service.get_sources(),
        service.get_source_groups(),
        service.get_target_groups(),
        service.get_email_targets(),
        service.get_sms_targets(),
        service.get_telegram_targets(),
        service.get_webhook_targets(),
        service.get_discord_targets(),
    )?;

    let mut seen = HashSet::new();
    let filters = sources
        .iter()
        .flat_map(|s| s.applicable_filters.iter())
        .filter(|f| seen.insert(f.id.clone()))
        .cloned()
        .collect();

    Ok(FetchedData {
        alerts,
        connected_wallets,
        sources,
        source_groups,
        target_groups,
        email_targets,
        sms_targets,
        telegram_targets,
        webhook_targets,
        discord_targets,
        filters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use notifi_core::time::ManualClock;
    use notifi_graphql::GraphQlTransport;
    use notifi_graphql::testing::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    const LISTS: [(&str, &str); 10] = [
        ("getAlerts", "alert"),
        ("getConnectedWallets", "connectedWallet"),
        ("getSources", "source"),
        ("getSourceGroups", "sourceGroup"),
        ("getTargetGroups", "targetGroup"),
        ("getEmailTargets", "emailTarget"),
        ("getSmsTargets", "smsTarget"),
        ("getTelegramTargets", "telegramTarget"),
        ("getWebhookTargets", "webhookTarget"),
        ("getDiscordTargets", "discordTarget"),
    ];

    fn mock_with_empty_lists(except: &[&str]) -> Arc<MockTransport> {
        let mock = Arc::new(MockTransport::new());
        for (operation, root) in LISTS {
            if except.contains(&operation) {
                continue;
            }
            let mut data = serde_json::Map::new();
            data.insert(root.to_string(), json!([]));
            mock.respond(operation, serde_json::Value::Object(data));
        }
        mock
    }

    fn fetcher(mock: &Arc<MockTransport>) -> (DataFetcher, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let service = NotifiService::new(Arc::clone(mock) as Arc<dyn GraphQlTransport>);
        (
            DataFetcher::new(service, Arc::clone(&clock) as Arc<dyn TimeProvider>),
            clock,
        )
    }

    #[tokio::test]
    async fn test_filters_deduplicated_across_sources() {
        let mock = mock_with_empty_lists(&["getSources"]);
        mock.respond(
            "getSources",
            json!({ "source": [
                { "id": "s1", "type": "BROADCAST", "applicableFilters": [
                    { "id": "f1", "filterType": "BROADCAST_MESSAGES" },
                    { "id": "f2", "filterType": "BALANCE" }
                ] },
                { "id": "s2", "type": "SOLANA_WALLET", "applicableFilters": [
                    { "id": "f2", "filterType": "BALANCE" }
                ] }
            ] }),
        );
        let (fetcher, _) = fetcher(&mock);

        let data = fetcher.fetch(false).await.unwrap();
        let ids: Vec<&str> = data.filters.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
        assert_eq!(data.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_cache_served_within_ttl() {
        let mock = mock_with_empty_lists(&[]);
        let (fetcher, clock) = fetcher(&mock);

        fetcher.fetch(false).await.unwrap();
        clock.advance(chrono::Duration::milliseconds(1000));
        fetcher.fetch(false).await.unwrap();
        assert_eq!(mock.call_count("getAlerts"), 1);

        clock.advance(chrono::Duration::milliseconds(1));
        fetcher.fetch(false).await.unwrap();
        assert_eq!(mock.call_count("getAlerts"), 2);
    }

    #[tokio::test]
    async fn test_force_bypasses_cache() {
        let mock = mock_with_empty_lists(&[]);
        let (fetcher, _) = fetcher(&mock);

        fetcher.fetch(false).await.unwrap();
        fetcher.fetch(true).await.unwrap();
        assert_eq!(mock.call_count("getAlerts"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let mock = mock_with_empty_lists(&[]);
        mock.set_delay(Duration::from_millis(20));
        let (fetcher, _) = fetcher(&mock);

        let (a, b, c) = tokio::join!(fetcher.fetch(true), fetcher.fetch(true), fetcher.fetch(false));
        let a = a.unwrap();
        assert!(Arc::ptr_eq(&a, &b.unwrap()));
        assert!(Arc::ptr_eq(&a, &c.unwrap()));
        assert_eq!(mock.call_count("getTargetGroups"), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_data() {
        let mock = mock_with_empty_lists(&["getTargetGroups"]);
        mock.respond(
            "getTargetGroups",
            json!({ "targetGroup": [{ "id": "tg1", "name": "Default" }] }),
        );
        mock.fail("getTargetGroups", 500);
        let (fetcher, clock) = fetcher(&mock);

        let first = fetcher.fetch(false).await.unwrap();
        assert_eq!(first.target_groups.len(), 1);

        clock.advance(chrono::Duration::seconds(5));
        assert!(fetcher.fetch(false).await.is_err());

        // Still stale, so the next call retries; the old data is untouched.
        let cached = fetcher.state.lock().await.data.clone().unwrap();
        assert!(Arc::ptr_eq(&first, &cached));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let mock = mock_with_empty_lists(&[]);
        let (fetcher, _) = fetcher(&mock);

        fetcher.fetch(false).await.unwrap();
        fetcher.invalidate().await;
        fetcher.fetch(false).await.unwrap();
        assert_eq!(mock.call_count("getAlerts"), 2);
    }
}
