//! Sources, source groups and the filter an event type subscribes with.

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::error::FrontendClientError;
use crate::models::{
    CustomUiType, EventInputs, EventTypeItem, health_direction_input, health_ratio_input,
    trading_pair_above_input, trading_pair_input, trading_pair_price_input,
};
use notifi_core::types::{AlertFrequency, FilterOptions, ThresholdDirection};
use notifi_core::validation::normalize_hex_string;
use notifi_graphql::NotifiService;
use notifi_graphql::models::{Filter, Source, SourceGroup};
use notifi_graphql::operations::sources::{
    CreateSourceGroupVariables, CreateSourceVariables, UpdateSourceGroupVariables,
};

/// Source type of tenant broadcast topics.
pub const BROADCAST_SOURCE_TYPE: &str = "BROADCAST";
/// Filter type of tenant broadcast topics.
pub const BROADCAST_FILTER_TYPE: &str = "BROADCAST_MESSAGES";
/// Source type of direct push messages.
pub const DIRECT_PUSH_SOURCE_TYPE: &str = "DIRECT_PUSH";
/// Filter type of direct push messages.
pub const DIRECT_PUSH_FILTER_TYPE: &str = "DIRECT_TENANT_MESSAGES";
/// Filter type of wallet balance changes.
pub const BALANCE_FILTER_TYPE: &str = "BALANCE";
/// Address of the tenant-wide direct push source trading pair alerts use.
pub const TRADING_PAIR_SOURCE_ADDRESS: &str = "*";

/// What an alert for an event type is built from.
#[derive(Debug, Clone)]
pub struct SourceAndFilters {
    /// Group holding the event's sources.
    pub source_group: SourceGroup,
    /// Filter the alert applies.
    pub filter: Filter,
    /// Options for the filter, if any.
    pub filter_options: Option<FilterOptions>,
}

/// Source type watching wallets of a chain, e.g. `ETHEREUM_WALLET`.
#[must_use]
pub fn wallet_source_type(chain: notifi_core::WalletBlockchain) -> String {
    format!("{}_WALLET", chain.as_str())
}

fn source_input(source_type: &str, address: String) -> CreateSourceVariables {
    CreateSourceVariables {
        name: address.clone(),
        source_type: source_type.to_string(),
        blockchain_address: address,
        fusion_event_type_id: None,
    }
}

fn matches_input(source: &Source, input: &CreateSourceVariables) -> bool {
    source.source_type == input.source_type
        && source.blockchain_address.as_deref() == Some(input.blockchain_address.as_str())
}

/// Ensure every source exists, matching by type and address.
///
/// Sources are created one at a time so duplicate inputs resolve to one
/// source.
///
/// # Errors
///
/// Returns error if a request fails or creation returns nothing.
pub async fn ensure_sources(
    service: &NotifiService,
    inputs: &[CreateSourceVariables],
) -> Result<Vec<Source>, FrontendClientError> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }

    let mut known = service.get_sources().await?;
    let mut ensured = Vec::with_capacity(inputs.len());
    for input in inputs {
        if let Some(existing) = known.iter().find(|s| matches_input(s, input)) {
            ensured.push(existing.clone());
            continue;
        }
        debug!(source_type = %input.source_type, "Creating source");
        let source = service
            .create_source(input)
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to create source"))?;
        known.push(source.clone());
        ensured.push(source);
    }
    Ok(ensured)
}

fn same_ids<'a>(
    left: impl IntoIterator<Item = &'a str>,
    right: impl IntoIterator<Item = &'a str>,
) -> bool {
    left.into_iter().collect::<HashSet<_>>() == right.into_iter().collect::<HashSet<_>>()
}

/// Ensure a source group named `name` holds exactly `sources`.
///
/// # Errors
///
/// Returns error if a request fails or the backend returns nothing.
pub async fn ensure_source_group(
    service: &NotifiService,
    name: &str,
    sources: &[Source],
) -> Result<SourceGroup, FrontendClientError> {
    let source_ids: Vec<String> = sources.iter().map(|s| s.id.clone()).collect();
    let groups = service.get_source_groups().await?;

    match groups.into_iter().find(|g| g.name.as_deref() == Some(name)) {
        Some(existing) => {
            if same_ids(
                existing.sources.iter().map(|s| s.id.as_str()),
                source_ids.iter().map(String::as_str),
            ) {
                return Ok(existing);
            }
            service
                .update_source_group(&UpdateSourceGroupVariables {
                    id: existing.id,
                    name: name.to_string(),
                    source_ids,
                })
                .await?
                .ok_or_else(|| FrontendClientError::failed("Failed to update source group"))
        }
        None => service
            .create_source_group(&CreateSourceGroupVariables {
                name: name.to_string(),
                source_ids,
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to create source group")),
    }
}

fn number_input(inputs: &EventInputs, key: &str) -> Result<f64, FrontendClientError> {
    match inputs.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| FrontendClientError::InvalidInput(format!("Missing numeric input {key}")))
}

fn direction_input(inputs: &EventInputs, key: &str) -> ThresholdDirection {
    inputs
        .get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or(ThresholdDirection::Below)
}

fn threshold_options(
    name: &str,
    inputs: &EventInputs,
    alert_frequency: AlertFrequency,
) -> Result<FilterOptions, FrontendClientError> {
    Ok(FilterOptions {
        alert_frequency: Some(alert_frequency),
        threshold: Some(number_input(inputs, &health_ratio_input(name))?),
        threshold_direction: Some(direction_input(inputs, &health_direction_input(name))),
        ..FilterOptions::default()
    })
}

struct EventPlan {
    sources: Vec<CreateSourceVariables>,
    filter_type: String,
    filter_options: Option<FilterOptions>,
}

async fn plan(
    service: &NotifiService,
    event_type: &EventTypeItem,
    inputs: &EventInputs,
) -> Result<EventPlan, FrontendClientError> {
    let plan = match event_type {
        EventTypeItem::Broadcast { broadcast_id, .. } => {
            let id = broadcast_id.resolve(inputs)?;
            EventPlan {
                sources: vec![source_input(BROADCAST_SOURCE_TYPE, id)],
                filter_type: BROADCAST_FILTER_TYPE.to_string(),
                filter_options: None,
            }
        }
        EventTypeItem::DirectPush { direct_push_id, .. } => {
            let id = direct_push_id.resolve(inputs)?;
            EventPlan {
                sources: vec![source_input(DIRECT_PUSH_SOURCE_TYPE, id.clone())],
                filter_type: DIRECT_PUSH_FILTER_TYPE.to_string(),
                filter_options: Some(FilterOptions {
                    direct_message_type: Some(id),
                    ..FilterOptions::default()
                }),
            }
        }
        EventTypeItem::WalletBalance { .. } => {
            let wallets = service.get_connected_wallets().await?;
            let sources = wallets
                .into_iter()
                .map(|w| {
                    let address = if w.wallet_blockchain.is_evm() {
                        normalize_hex_string(&w.address)
                    } else {
                        w.address
                    };
                    source_input(&wallet_source_type(w.wallet_blockchain), address)
                })
                .collect();
            EventPlan {
                sources,
                filter_type: BALANCE_FILTER_TYPE.to_string(),
                filter_options: None,
            }
        }
        EventTypeItem::TradingPair {
            name,
            trading_pairs,
        } => {
            let pairs = trading_pairs.resolve(inputs)?;
            let pair = inputs
                .get(&trading_pair_input(name))
                .and_then(Value::as_str)
                .filter(|p| pairs.iter().any(|known| known == p))
                .ok_or_else(|| {
                    FrontendClientError::InvalidInput(format!("Unknown trading pair for {name}"))
                })?;
            let above = inputs
                .get(&trading_pair_above_input(name))
                .and_then(Value::as_bool)
                .unwrap_or(true);
            let price = number_input(inputs, &trading_pair_price_input(name))?;
            EventPlan {
                sources: vec![source_input(
                    DIRECT_PUSH_SOURCE_TYPE,
                    TRADING_PAIR_SOURCE_ADDRESS.to_string(),
                )],
                filter_type: DIRECT_PUSH_FILTER_TYPE.to_string(),
                filter_options: Some(FilterOptions {
                    trading_pair: Some(pair.to_string()),
                    threshold: Some(price),
                    threshold_direction: Some(if above {
                        ThresholdDirection::Above
                    } else {
                        ThresholdDirection::Below
                    }),
                    ..FilterOptions::default()
                }),
            }
        }
        EventTypeItem::HealthCheck {
            name,
            source_type,
            source_address,
            filter_type,
            alert_frequency,
        } => EventPlan {
            sources: vec![source_input(source_type, source_address.resolve(inputs)?)],
            filter_type: filter_type.clone(),
            filter_options: Some(threshold_options(name, inputs, *alert_frequency)?),
        },
        EventTypeItem::Custom {
            name,
            source_type,
            source_address,
            filter_type,
            alert_frequency,
            selected_ui_type,
        } => {
            let filter_options = match selected_ui_type {
                CustomUiType::Toggle => FilterOptions {
                    alert_frequency: Some(*alert_frequency),
                    ..FilterOptions::default()
                },
                CustomUiType::HealthCheck => threshold_options(name, inputs, *alert_frequency)?,
            };
            EventPlan {
                sources: vec![source_input(source_type, source_address.resolve(inputs)?)],
                filter_type: filter_type.clone(),
                filter_options: Some(filter_options),
            }
        }
        EventTypeItem::Label { name } => {
            return Err(FrontendClientError::InvalidInput(format!(
                "{name} is a label and cannot be subscribed to"
            )));
        }
    };
    Ok(plan)
}

/// Ensure the sources and source group of an event type and pick its filter.
///
/// The source group is named after the event type. The filter comes from
/// the sources' applicable filters, or from all filters when the event has
/// no sources.
///
/// # Errors
///
/// Returns error if inputs are missing, a request fails, or no filter of
/// the event's filter type exists.
pub async fn ensure_source_and_filters(
    service: &NotifiService,
    event_type: &EventTypeItem,
    inputs: &EventInputs,
) -> Result<SourceAndFilters, FrontendClientError> {
    let plan = plan(service, event_type, inputs).await?;
    let sources = ensure_sources(service, &plan.sources).await?;

    let filter = if sources.is_empty() {
        service
            .get_filters()
            .await?
            .into_iter()
            .find(|f| f.filter_type == plan.filter_type)
    } else {
        sources
            .iter()
            .flat_map(|s| s.applicable_filters.iter())
            .find(|f| f.filter_type == plan.filter_type)
            .cloned()
    }
    .ok_or_else(|| FrontendClientError::failed("Failed to retrieve filter"))?;

    let source_group = ensure_source_group(service, event_type.name(), &sources).await?;

    Ok(SourceAndFilters {
        source_group,
        filter,
        filter_options: plan.filter_options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValueOrRef;
    use notifi_graphql::GraphQlTransport;
    use notifi_graphql::testing::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn service(mock: &Arc<MockTransport>) -> NotifiService {
        NotifiService::new(Arc::clone(mock) as Arc<dyn GraphQlTransport>)
    }

    fn direct_push_source() -> Value {
        json!({
            "id": "s1",
            "type": "DIRECT_PUSH",
            "blockchainAddress": "liquidations",
            "applicableFilters": [
                { "id": "f0", "filterType": "BALANCE" },
                { "id": "f1", "filterType": "DIRECT_TENANT_MESSAGES" }
            ]
        })
    }

    #[tokio::test]
    async fn test_direct_push_reuses_source_and_group() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("getSources", json!({ "source": [direct_push_source()] }));
        mock.respond(
            "getSourceGroups",
            json!({ "sourceGroup": [{ "id": "g1", "name": "Liquidations", "sources": [direct_push_source()] }] }),
        );

        let event = EventTypeItem::DirectPush {
            name: "Liquidations".to_string(),
            direct_push_id: ValueOrRef::Value {
                value: "liquidations".to_string(),
            },
        };
        let result = ensure_source_and_filters(&service(&mock), &event, &EventInputs::new())
            .await
            .unwrap();

        assert_eq!(result.source_group.id, "g1");
        assert_eq!(result.filter.id, "f1");
        assert_eq!(
            result.filter_options.unwrap().direct_message_type.as_deref(),
            Some("liquidations")
        );
        assert_eq!(mock.call_count("createSource"), 0);
        assert_eq!(mock.call_count("updateSourceGroup"), 0);
        assert_eq!(mock.call_count("createSourceGroup"), 0);
    }

    #[tokio::test]
    async fn test_broadcast_creates_missing_source_and_group() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("getSources", json!({ "source": [] }));
        mock.respond(
            "createSource",
            json!({ "createSource": {
                "id": "s9",
                "type": "BROADCAST",
                "blockchainAddress": "acme__news",
                "applicableFilters": [{ "id": "fb", "filterType": "BROADCAST_MESSAGES" }]
            } }),
        );
        mock.respond("getSourceGroups", json!({ "sourceGroup": [] }));
        mock.respond(
            "createSourceGroup",
            json!({ "createSourceGroup": { "id": "g9", "name": "News", "sources": [] } }),
        );

        let event = EventTypeItem::Broadcast {
            name: "News".to_string(),
            broadcast_id: ValueOrRef::Ref {
                reference: "topic".to_string(),
            },
        };
        let mut inputs = EventInputs::new();
        inputs.insert("topic".to_string(), json!("acme__news"));

        let result = ensure_source_and_filters(&service(&mock), &event, &inputs)
            .await
            .unwrap();

        assert_eq!(result.filter.id, "fb");
        assert!(result.filter_options.is_none());
        assert_eq!(
            mock.calls_for("createSource")[0].variables,
            json!({ "name": "acme__news", "type": "BROADCAST", "blockchainAddress": "acme__news" })
        );
        assert_eq!(
            mock.calls_for("createSourceGroup")[0].variables,
            json!({ "name": "News", "sourceIds": ["s9"] })
        );
    }

    #[tokio::test]
    async fn test_source_group_updated_when_ids_differ() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(
            "getSourceGroups",
            json!({ "sourceGroup": [{ "id": "g1", "name": "Watch", "sources": [] }] }),
        );
        mock.respond(
            "updateSourceGroup",
            json!({ "updateSourceGroup": { "id": "g1", "name": "Watch", "sources": [direct_push_source()] } }),
        );

        let source: Source = serde_json::from_value(direct_push_source()).unwrap();
        let group = ensure_source_group(&service(&mock), "Watch", &[source])
            .await
            .unwrap();

        assert_eq!(group.sources.len(), 1);
        assert_eq!(
            mock.calls_for("updateSourceGroup")[0].variables,
            json!({ "id": "g1", "name": "Watch", "sourceIds": ["s1"] })
        );
    }

    #[tokio::test]
    async fn test_wallet_balance_without_wallets_uses_all_filters() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("getConnectedWallets", json!({ "connectedWallet": [] }));
        mock.respond("getFilters", json!({ "filter": [{ "id": "fb", "filterType": "BALANCE" }] }));
        mock.respond(
            "getSourceGroups",
            json!({ "sourceGroup": [{ "id": "g1", "name": "User Wallets", "sources": [] }] }),
        );

        let result = ensure_source_and_filters(
            &service(&mock),
            &EventTypeItem::user_wallets(),
            &EventInputs::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.filter.id, "fb");
        assert_eq!(result.source_group.id, "g1");
        assert_eq!(mock.call_count("getSources"), 0);
    }

    #[tokio::test]
    async fn test_wallet_balance_normalizes_evm_addresses() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(
            "getConnectedWallets",
            json!({ "connectedWallet": [{ "address": "ABCDEF", "walletBlockchain": "ETHEREUM" }] }),
        );
        mock.respond("getSources", json!({ "source": [{
            "id": "s1",
            "type": "ETHEREUM_WALLET",
            "blockchainAddress": "0xabcdef",
            "applicableFilters": [{ "id": "fb", "filterType": "BALANCE" }]
        }] }));
        mock.respond("getSourceGroups", json!({ "sourceGroup": [] }));
        mock.respond(
            "createSourceGroup",
            json!({ "createSourceGroup": { "id": "g2", "name": "User Wallets", "sources": [] } }),
        );

        let result = ensure_source_and_filters(
            &service(&mock),
            &EventTypeItem::user_wallets(),
            &EventInputs::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.source_group.id, "g2");
        assert_eq!(mock.call_count("createSource"), 0);
    }

    #[tokio::test]
    async fn test_health_check_needs_ratio_input() {
        let mock = Arc::new(MockTransport::new());
        let event = EventTypeItem::HealthCheck {
            name: "Health".to_string(),
            source_type: "FUSION_SOURCE".to_string(),
            source_address: ValueOrRef::Value {
                value: "pool".to_string(),
            },
            filter_type: "HEALTH".to_string(),
            alert_frequency: AlertFrequency::Daily,
        };

        let err = ensure_source_and_filters(&service(&mock), &event, &EventInputs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FrontendClientError::InvalidInput(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_trading_pair_options() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("getSources", json!({ "source": [{
            "id": "s1",
            "type": "DIRECT_PUSH",
            "blockchainAddress": "*",
            "applicableFilters": [{ "id": "f1", "filterType": "DIRECT_TENANT_MESSAGES" }]
        }] }));
        mock.respond(
            "getSourceGroups",
            json!({ "sourceGroup": [{ "id": "g1", "name": "Prices", "sources": [{ "id": "s1", "type": "DIRECT_PUSH" }] }] }),
        );

        let event = EventTypeItem::TradingPair {
            name: "Prices".to_string(),
            trading_pairs: ValueOrRef::Value {
                value: vec!["BTC-USD".to_string()],
            },
        };
        let mut inputs = EventInputs::new();
        inputs.insert("Prices__pair".to_string(), json!("BTC-USD"));
        inputs.insert("Prices__above".to_string(), json!(false));
        inputs.insert("Prices__price".to_string(), json!("30000"));

        let result = ensure_source_and_filters(&service(&mock), &event, &inputs)
            .await
            .unwrap();
        let options = result.filter_options.unwrap();
        assert_eq!(options.trading_pair.as_deref(), Some("BTC-USD"));
        assert_eq!(options.threshold, Some(30000.0));
        assert_eq!(options.threshold_direction, Some(ThresholdDirection::Below));
    }

    #[tokio::test]
    async fn test_label_is_not_subscribable() {
        let mock = Arc::new(MockTransport::new());
        let event = EventTypeItem::Label {
            name: "Heading".to_string(),
        };
        let err = ensure_source_and_filters(&service(&mock), &event, &EventInputs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FrontendClientError::InvalidInput(_)));
    }
}
