use shared_config::AppConfig;

use crate::postgrest::{StoreClient, StoreError};

/// Logical grouping of entities for store routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityGroup {
    /// Records the reception desk creates and edits. Reads and writes both
    /// resolve to the `default` store.
    OperatorManaged,
    /// Reference and report data served from the read-only `client`
    /// connection. Writes are never routed here.
    ReferenceReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreName {
    Default,
    Client,
}

/// Static routing table: which store serves reads and writes for an
/// entity group, and where schema changes may be applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingPolicy;

impl RoutingPolicy {
    pub fn store_for_read(&self, group: EntityGroup) -> StoreName {
        match group {
            EntityGroup::OperatorManaged => StoreName::Default,
            EntityGroup::ReferenceReadOnly => StoreName::Client,
        }
    }

    pub fn store_for_write(&self, group: EntityGroup) -> Result<StoreName, StoreError> {
        match group {
            EntityGroup::OperatorManaged => Ok(StoreName::Default),
            EntityGroup::ReferenceReadOnly => Err(StoreError::ReadOnlyStore),
        }
    }

    pub fn allows_migrate(&self, store: StoreName) -> bool {
        store == StoreName::Default
    }
}

/// The two store handles plus the policy that picks between them.
/// Constructed from config and handed to services, never global.
pub struct StoreRouter {
    policy: RoutingPolicy,
    default_store: StoreClient,
    client_store: StoreClient,
}

impl StoreRouter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            policy: RoutingPolicy,
            default_store: StoreClient::new(
                &config.default_store_url,
                &config.default_store_key,
            ),
            client_store: StoreClient::new(
                &config.client_store_url,
                &config.client_store_key,
            ),
        }
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    pub fn read(&self, group: EntityGroup) -> &StoreClient {
        match self.policy.store_for_read(group) {
            StoreName::Default => &self.default_store,
            StoreName::Client => &self.client_store,
        }
    }

    pub fn write(&self, group: EntityGroup) -> Result<&StoreClient, StoreError> {
        match self.policy.store_for_write(group)? {
            StoreName::Default => Ok(&self.default_store),
            StoreName::Client => Ok(&self.client_store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_managed_routes_to_default_both_ways() {
        let policy = RoutingPolicy;
        assert_eq!(
            policy.store_for_read(EntityGroup::OperatorManaged),
            StoreName::Default
        );
        assert_eq!(
            policy.store_for_write(EntityGroup::OperatorManaged).unwrap(),
            StoreName::Default
        );
    }

    #[test]
    fn reference_reads_route_to_client() {
        let policy = RoutingPolicy;
        assert_eq!(
            policy.store_for_read(EntityGroup::ReferenceReadOnly),
            StoreName::Client
        );
    }

    #[test]
    fn reference_writes_are_refused() {
        let policy = RoutingPolicy;
        assert!(matches!(
            policy.store_for_write(EntityGroup::ReferenceReadOnly),
            Err(StoreError::ReadOnlyStore)
        ));
    }

    #[test]
    fn migrations_only_on_default() {
        let policy = RoutingPolicy;
        assert!(policy.allows_migrate(StoreName::Default));
        assert!(!policy.allows_migrate(StoreName::Client));
    }
}
