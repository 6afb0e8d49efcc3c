use crate::core::expense::{Expense, ExpenseSet, GroupId};
use crate::core::member::{Member, MemberId};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to know about one group at one point in time.
///
/// Callers fetch members and expenses, package them here, and hand the
/// snapshot to the computation. Nothing in the engine reads session or
/// store state on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group_id: GroupId,
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl GroupSnapshot {
    pub fn new(group_id: GroupId, members: Vec<Member>, expenses: Vec<Expense>) -> Self {
        Self {
            group_id,
            members,
            expenses,
        }
    }

    /// Display name for a member, if they belong to the group.
    pub fn display_name(&self, member: &MemberId) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.id() == member)
            .map(Member::name)
    }

    /// Display name, falling back to the raw ID.
    pub fn label<'a>(&'a self, member: &'a MemberId) -> &'a str {
        self.display_name(member).unwrap_or(member.as_str())
    }

    pub fn expense_set(&self) -> ExpenseSet {
        self.expenses.iter().cloned().collect()
    }
}
