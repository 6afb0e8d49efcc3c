use crate::core::ledger::{Balance, Ledger};
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single suggested payment: `from` pays `to` a positive `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

/// Ordered settlement list plus the figures needed to judge it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementPlan {
    settlements: Vec<Settlement>,
    /// Sum of |negative balances| the plan settles.
    gross_debt: Decimal,
}

impl SettlementPlan {
    pub fn new(settlements: Vec<Settlement>, gross_debt: Decimal) -> Self {
        Self {
            settlements,
            gross_debt,
        }
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn into_settlements(self) -> Vec<Settlement> {
        self.settlements
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    /// Total debt owed by net debtors before settling.
    pub fn gross_debt(&self) -> Decimal {
        self.gross_debt
    }

    /// Sum of all reported payment amounts.
    pub fn total_transferred(&self) -> Decimal {
        self.settlements.iter().map(|s| s.amount).sum()
    }

    /// Payments in which `member` pays or is paid.
    pub fn settlements_for<'a>(
        &'a self,
        member: &'a MemberId,
    ) -> impl Iterator<Item = &'a Settlement> + 'a {
        self.settlements
            .iter()
            .filter(move |s| &s.from == member || &s.to == member)
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Plan ===")?;
        writeln!(f, "Payments:          {}", self.len())?;
        writeln!(f, "Total transferred: {}", self.total_transferred())?;
        if self.is_empty() {
            writeln!(f, "\nEveryone is settled up.")?;
        }
        for s in &self.settlements {
            writeln!(f, "  {} pays {} {}", s.from, s.to, s.amount)?;
        }
        Ok(())
    }
}

/// Apply `settlements` to `balances` and return what is left.
///
/// Paying raises the payer's balance toward zero and lowers the payee's.
/// A correct plan leaves every position within epsilon of zero.
pub fn apply_settlements(balances: &[Balance], settlements: &[Settlement]) -> Ledger {
    let mut ledger = Ledger::from_balances(balances);
    for s in settlements {
        ledger.credit(&s.from, s.amount);
        ledger.debit(&s.to, s.amount);
    }
    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn settlement(from: &str, to: &str, amount: Decimal) -> Settlement {
        Settlement {
            from: MemberId::new(from),
            to: MemberId::new(to),
            amount,
        }
    }

    #[test]
    fn test_plan_totals() {
        let plan = SettlementPlan::new(
            vec![settlement("b", "a", dec!(100)), settlement("c", "a", dec!(50))],
            dec!(150),
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.total_transferred(), dec!(150));
        assert_eq!(plan.settlements_for(&MemberId::new("a")).count(), 2);
        assert_eq!(plan.settlements_for(&MemberId::new("c")).count(), 1);
    }

    #[test]
    fn test_apply_settlements_zeroes_balances() {
        let balances = vec![
            Balance::new(MemberId::new("a"), dec!(150)),
            Balance::new(MemberId::new("b"), dec!(-100)),
            Balance::new(MemberId::new("c"), dec!(-50)),
        ];
        let after = apply_settlements(
            &balances,
            &[settlement("b", "a", dec!(100)), settlement("c", "a", dec!(50))],
        );
        assert_eq!(after.max_abs_position(), Decimal::ZERO);
    }

    #[test]
    fn test_display_empty_plan() {
        let text = SettlementPlan::default().to_string();
        assert!(text.contains("settled up"));
    }

    #[test]
    fn test_plan_serializes() {
        let plan = SettlementPlan::new(vec![settlement("b", "a", dec!(12.5))], dec!(12.5));
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["settlements"][0]["from"], "b");
        assert_eq!(json["settlements"][0]["amount"], "12.5");
    }
}
