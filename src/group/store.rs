use crate::core::expense::{Expense, GroupId};
use crate::core::member::Member;
use crate::group::snapshot::GroupSnapshot;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the external persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse group data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read side of the external store that owns members and expenses.
pub trait GroupStore: Send + Sync {
    fn fetch_members(&self, group: &GroupId) -> Result<Vec<Member>, StoreError>;

    fn fetch_expenses(&self, group: &GroupId) -> Result<Vec<Expense>, StoreError>;

    /// Fetch members then expenses. The two reads are not atomic; the
    /// result is a best-effort view of the group.
    fn fetch_snapshot(&self, group: &GroupId) -> Result<GroupSnapshot, StoreError> {
        let members = self.fetch_members(group)?;
        let expenses = self.fetch_expenses(group)?;
        Ok(GroupSnapshot::new(group.clone(), members, expenses))
    }
}

/// A store backed by in-memory snapshots, typically loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupStore {
    groups: HashMap<GroupId, GroupSnapshot>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a group.
    pub fn insert(&mut self, snapshot: GroupSnapshot) {
        self.groups.insert(snapshot.group_id.clone(), snapshot);
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let snapshot: GroupSnapshot = serde_json::from_str(json)?;
        let mut store = Self::new();
        store.insert(snapshot);
        Ok(store)
    }

    /// Load a single-group JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.keys()
    }

    fn group(&self, group: &GroupId) -> Result<&GroupSnapshot, StoreError> {
        self.groups
            .get(group)
            .ok_or_else(|| StoreError::GroupNotFound(group.clone()))
    }
}

impl GroupStore for InMemoryGroupStore {
    fn fetch_members(&self, group: &GroupId) -> Result<Vec<Member>, StoreError> {
        Ok(self.group(group)?.members.clone())
    }

    fn fetch_expenses(&self, group: &GroupId) -> Result<Vec<Expense>, StoreError> {
        let snapshot = self.group(group)?;
        let expenses: Vec<Expense> = snapshot
            .expenses
            .iter()
            .filter(|e| e.group_id() == group)
            .cloned()
            .collect();
        if expenses.len() != snapshot.expenses.len() {
            debug!(
                "skipped {} expenses filed under other groups",
                snapshot.expenses.len() - expenses.len()
            );
        }
        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::member::MemberId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn store() -> InMemoryGroupStore {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut store = InMemoryGroupStore::new();
        store.insert(GroupSnapshot::new(
            GroupId::new("flat"),
            vec![Member::new("a", "Ana"), Member::new("b", "Ben")],
            vec![
                Expense::equal(GroupId::new("flat"), MemberId::new("a"), dec!(40), day),
                Expense::equal(GroupId::new("other"), MemberId::new("b"), dec!(10), day),
            ],
        ));
        store
    }

    #[test]
    fn test_fetch_members() {
        let members = store().fetch_members(&GroupId::new("flat")).unwrap();
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_fetch_expenses_only_for_group() {
        let expenses = store().fetch_expenses(&GroupId::new("flat")).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount(), dec!(40));
    }

    #[test]
    fn test_missing_group() {
        let err = store().fetch_members(&GroupId::new("nope")).unwrap_err();
        assert!(matches!(err, StoreError::GroupNotFound(_)));
    }

    #[test]
    fn test_bad_json() {
        let err = InMemoryGroupStore::from_json_str("{ \"members\": 3 }").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = InMemoryGroupStore::from_file("/nonexistent/group.json").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
