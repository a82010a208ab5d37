use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use credentials_core::{Group, GroupId, GroupRegistry, GroupRegistryError};

#[derive(Default, Clone)]
pub struct HashMapGroupRegistry {
    groups: Arc<RwLock<HashMap<GroupId, Group>>>,
}

impl HashMapGroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        let groups = groups.into_iter().map(|g| (g.id(), g)).collect();
        Self {
            groups: Arc::new(RwLock::new(groups)),
        }
    }

    pub async fn register(&self, group: Group) {
        self.groups.write().await.insert(group.id(), group);
    }
}

#[async_trait::async_trait]
impl GroupRegistry for HashMapGroupRegistry {
    async fn all(&self) -> Result<Vec<Group>, GroupRegistryError> {
        let groups = self.groups.read().await;
        let mut all: Vec<Group> = groups.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(all)
    }

    async fn find_many(&self, ids: &BTreeSet<GroupId>) -> Result<Vec<Group>, GroupRegistryError> {
        let groups = self.groups.read().await;
        Ok(ids.iter().filter_map(|id| groups.get(id).cloned()).collect())
    }
}
