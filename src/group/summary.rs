use crate::balance::calculator::BalanceCalculator;
use crate::core::error::SplitError;
use crate::core::expense::GroupId;
use crate::core::ledger::Balance;
use crate::core::money::SplitConfig;
use crate::group::snapshot::GroupSnapshot;
use crate::group::store::GroupStore;
use crate::settlement::minimizer::SettlementMinimizer;
use crate::settlement::plan::SettlementPlan;
use rust_decimal::Decimal;
use serde::Serialize;

/// One row of the balance table, with the member's display name.
#[derive(Debug, Clone, Serialize)]
pub struct MemberBalance {
    pub member: String,
    pub name: String,
    /// Net position rounded to minor units.
    pub amount: Decimal,
}

/// Balances and settlement plan for one group view.
///
/// Recomputed from a fresh snapshot on every request; nothing is cached
/// between calls.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    group_id: GroupId,
    total_spent: Decimal,
    expense_count: usize,
    balances: Vec<MemberBalance>,
    #[serde(skip)]
    raw_balances: Vec<Balance>,
    plan: SettlementPlan,
}

impl GroupSummary {
    /// Fetch the group from `store` and run both computations.
    pub fn compute<S: GroupStore + ?Sized>(
        store: &S,
        group_id: &GroupId,
        config: SplitConfig,
    ) -> Result<Self, SplitError> {
        let snapshot = store.fetch_snapshot(group_id)?;
        Self::from_snapshot(&snapshot, config)
    }

    pub fn from_snapshot(snapshot: &GroupSnapshot, config: SplitConfig) -> Result<Self, SplitError> {
        config.validate()?;
        let raw_balances = BalanceCalculator::new(config)
            .compute_balances(&snapshot.members, &snapshot.expenses)?;
        let plan = SettlementMinimizer::new(config).minimize(&raw_balances)?;

        let balances = raw_balances
            .iter()
            .map(|b| MemberBalance {
                member: b.member.to_string(),
                name: snapshot.label(&b.member).to_string(),
                amount: config.round(b.amount),
            })
            .collect();

        Ok(Self {
            group_id: snapshot.group_id.clone(),
            total_spent: snapshot.expense_set().total_spent(),
            expense_count: snapshot.expenses.len(),
            balances,
            raw_balances,
            plan,
        })
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn total_spent(&self) -> Decimal {
        self.total_spent
    }

    pub fn balances(&self) -> &[MemberBalance] {
        &self.balances
    }

    /// Unrounded balances as produced by the calculator.
    pub fn raw_balances(&self) -> &[Balance] {
        &self.raw_balances
    }

    pub fn plan(&self) -> &SettlementPlan {
        &self.plan
    }
}

impl std::fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Group {} ===", self.group_id)?;
        writeln!(f, "Expenses:    {}", self.expense_count)?;
        writeln!(f, "Total spent: {}", self.total_spent)?;
        writeln!(f, "\n--- Balances ---")?;
        for b in &self.balances {
            let status = if b.amount > Decimal::ZERO {
                "is owed"
            } else if b.amount < Decimal::ZERO {
                "owes"
            } else {
                "settled"
            };
            writeln!(f, "  {:<20} {:>12}  [{}]", b.name, b.amount, status)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::Expense;
    use crate::core::member::{Member, MemberId};
    use crate::group::store::InMemoryGroupStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn snapshot() -> GroupSnapshot {
        let day = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let g = GroupId::new("bbq");
        GroupSnapshot::new(
            g.clone(),
            vec![
                Member::new("a", "Ana"),
                Member::new("b", "Ben"),
                Member::new("c", "Cai"),
            ],
            vec![Expense::equal(g, MemberId::new("a"), dec!(100), day)],
        )
    }

    #[test]
    fn test_summary_from_store() {
        let mut store = InMemoryGroupStore::new();
        store.insert(snapshot());
        let summary =
            GroupSummary::compute(&store, &GroupId::new("bbq"), SplitConfig::default()).unwrap();

        assert_eq!(summary.total_spent(), dec!(100));
        let amounts: Vec<_> = summary.balances().iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![dec!(66.67), dec!(-33.33), dec!(-33.33)]);
        assert_eq!(summary.plan().len(), 2);
        assert_eq!(summary.balances()[1].name, "Ben");
    }

    #[test]
    fn test_summary_missing_group() {
        let store = InMemoryGroupStore::new();
        let err = GroupSummary::compute(&store, &GroupId::new("bbq"), SplitConfig::default())
            .unwrap_err();
        assert!(matches!(err, SplitError::Store(_)));
    }

    #[test]
    fn test_summary_rejects_bad_config() {
        let config = SplitConfig {
            epsilon: dec!(-1),
            ..Default::default()
        };
        let err = GroupSummary::from_snapshot(&snapshot(), config).unwrap_err();
        assert!(matches!(err, SplitError::InvalidConfig { .. }));
    }

    #[test]
    fn test_summary_display_names_members() {
        let summary = GroupSummary::from_snapshot(&snapshot(), SplitConfig::default()).unwrap();
        let text = summary.to_string();
        assert!(text.contains("Ana"));
        assert!(text.contains("b pays a 33.33"));
    }
}
