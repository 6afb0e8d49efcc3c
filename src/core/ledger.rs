use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A member's signed net position in a group.
///
/// Positive means the member is owed money, negative means the member owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub member: MemberId,
    pub amount: Decimal,
}

impl Balance {
    pub fn new(member: MemberId, amount: Decimal) -> Self {
        Self { member, amount }
    }
}

/// Running net positions for the members of one group.
///
/// Entries are fixed at construction. Crediting or debiting a member the
/// ledger does not know about is refused and creates no entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Member order as supplied, used for stable output.
    order: Vec<MemberId>,
    positions: HashMap<MemberId, Decimal>,
}

impl Ledger {
    /// Open a ledger with a zero position for each member.
    ///
    /// Duplicate IDs collapse into one entry; callers that care check
    /// [`Ledger::len`] against their input.
    pub fn open<'a>(members: impl IntoIterator<Item = &'a MemberId>) -> Self {
        let mut ledger = Self::default();
        for member in members {
            if ledger.positions.insert(member.clone(), Decimal::ZERO).is_none() {
                ledger.order.push(member.clone());
            }
        }
        ledger
    }

    /// Build a ledger from existing balances. Repeated members accumulate.
    pub fn from_balances(balances: &[Balance]) -> Self {
        let mut ledger = Self::open(balances.iter().map(|b| &b.member));
        for b in balances {
            ledger.adjust(&b.member, b.amount);
        }
        ledger
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.positions.contains_key(member)
    }

    /// Increase a member's position. Returns false for unknown members.
    pub fn credit(&mut self, member: &MemberId, amount: Decimal) -> bool {
        self.adjust(member, amount)
    }

    /// Decrease a member's position. Returns false for unknown members.
    pub fn debit(&mut self, member: &MemberId, amount: Decimal) -> bool {
        self.adjust(member, -amount)
    }

    fn adjust(&mut self, member: &MemberId, delta: Decimal) -> bool {
        match self.positions.get_mut(member) {
            Some(position) => {
                *position += delta;
                true
            }
            None => false,
        }
    }

    /// Net position of a member; zero for members not in the ledger.
    pub fn position(&self, member: &MemberId) -> Decimal {
        self.positions.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all positions. Zero for a conservation-consistent group.
    pub fn total(&self) -> Decimal {
        self.positions.values().sum()
    }

    /// True when positions sum to zero within `epsilon`.
    pub fn is_balanced(&self, epsilon: Decimal) -> bool {
        self.total().abs() <= epsilon
    }

    /// Largest absolute position, i.e. how far the ledger is from settled.
    pub fn max_abs_position(&self) -> Decimal {
        self.positions
            .values()
            .map(|v| v.abs())
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of positive positions (equal to the sum of |negative| when balanced).
    pub fn total_owed(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }

    /// Positions in member order.
    pub fn to_balances(&self) -> Vec<Balance> {
        self.order
            .iter()
            .map(|m| Balance::new(m.clone(), self.position(m)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().map(|n| MemberId::new(*n)).collect()
    }

    #[test]
    fn test_ledger_credit_debit() {
        let members = ids(&["a", "b"]);
        let mut ledger = Ledger::open(&members);
        assert!(ledger.credit(&members[0], dec!(100)));
        assert!(ledger.debit(&members[1], dec!(100)));

        assert_eq!(ledger.position(&members[0]), dec!(100));
        assert_eq!(ledger.position(&members[1]), dec!(-100));
        assert!(ledger.is_balanced(Decimal::ZERO));
        assert_eq!(ledger.total_owed(), dec!(100));
    }

    #[test]
    fn test_ledger_refuses_unknown_member() {
        let members = ids(&["a"]);
        let mut ledger = Ledger::open(&members);
        assert!(!ledger.credit(&MemberId::new("ghost"), dec!(5)));
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.contains(&MemberId::new("ghost")));
    }

    #[test]
    fn test_ledger_keeps_member_order() {
        let members = ids(&["c", "a", "b", "a"]);
        let ledger = Ledger::open(&members);
        let order: Vec<_> = ledger
            .to_balances()
            .into_iter()
            .map(|b| b.member.to_string())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ledger_from_balances() {
        let ledger = Ledger::from_balances(&[
            Balance::new(MemberId::new("a"), dec!(200)),
            Balance::new(MemberId::new("b"), dec!(-100)),
            Balance::new(MemberId::new("c"), dec!(-100)),
        ]);
        assert!(ledger.is_balanced(Decimal::ZERO));
        assert_eq!(ledger.max_abs_position(), dec!(200));
    }
}
