use crate::core::member::MemberId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a group, as assigned by the external store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for expenses created outside the store.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How an expense's cost is divided among the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Divided evenly across every current group member.
    Equal,
    /// Divided according to explicit per-member split rows.
    Manual,
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPolicy::Equal => write!(f, "equal"),
            SplitPolicy::Manual => write!(f, "manual"),
        }
    }
}

/// One member's owed share of a manually split expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default)]
    expense_id: Option<ExpenseId>,
    member: MemberId,
    amount: Decimal,
}

impl ExpenseSplit {
    /// Create a split row.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative.
    pub fn new(member: MemberId, amount: Decimal) -> Self {
        assert!(
            amount >= Decimal::ZERO,
            "Split amount must not be negative, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            expense_id: None,
            member,
            amount,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn expense_id(&self) -> Option<&ExpenseId> {
        self.expense_id.as_ref()
    }

    pub fn member(&self) -> &MemberId {
        &self.member
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// A shared expense fronted by one member of a group.
///
/// Expenses are immutable once created. Equal-split expenses carry no split
/// rows; manual-split expenses carry one row per member who owes a share.
///
/// # Examples
///
/// ```
/// use split_engine::core::expense::{Expense, GroupId, SplitPolicy};
/// use split_engine::core::member::MemberId;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::equal(
///     GroupId::new("trip"),
///     MemberId::new("alice"),
///     dec!(90),
///     NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
/// );
///
/// assert_eq!(dinner.policy(), SplitPolicy::Equal);
/// assert!(dinner.splits().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    group_id: GroupId,
    amount: Decimal,
    paid_by: MemberId,
    date: NaiveDate,
    #[serde(rename = "split_type")]
    policy: SplitPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    splits: Vec<ExpenseSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Expense {
    /// Create an equal-split expense.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn equal(group_id: GroupId, paid_by: MemberId, amount: Decimal, date: NaiveDate) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Expense amount must be positive, got {}",
            amount
        );
        Self {
            id: ExpenseId::generate(),
            group_id,
            amount,
            paid_by,
            date,
            policy: SplitPolicy::Equal,
            splits: Vec::new(),
            description: None,
        }
    }

    /// Create a manual-split expense from `(member, owed amount)` pairs.
    ///
    /// The splits are not checked against the total here; see
    /// [`crate::balance::validation::validate_manual_expense`].
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or any share is negative.
    pub fn manual(
        group_id: GroupId,
        paid_by: MemberId,
        amount: Decimal,
        date: NaiveDate,
        shares: impl IntoIterator<Item = (MemberId, Decimal)>,
    ) -> Self {
        let mut expense = Self::equal(group_id, paid_by, amount, date);
        expense.policy = SplitPolicy::Manual;
        expense.splits = shares
            .into_iter()
            .map(|(member, owed)| ExpenseSplit::new(member, owed))
            .collect();
        expense.link_splits();
        expense
    }

    /// Replace the generated ID with a store-assigned one.
    pub fn with_id(mut self, id: impl Into<ExpenseId>) -> Self {
        self.id = id.into();
        self.link_splits();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn link_splits(&mut self) {
        for split in &mut self.splits {
            split.expense_id = Some(self.id.clone());
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn paid_by(&self) -> &MemberId {
        &self.paid_by
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    pub fn splits(&self) -> &[ExpenseSplit] {
        &self.splits
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Sum of all split rows.
    pub fn allocated(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount()).sum()
    }
}

/// The expenses of one group, in the order the store returned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total spent by the group across all expenses.
    pub fn total_spent(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// Expenses fronted by `member`.
    pub fn paid_by<'a>(&'a self, member: &'a MemberId) -> impl Iterator<Item = &'a Expense> + 'a {
        self.expenses.iter().filter(move |e| e.paid_by() == member)
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Expense>> for ExpenseSet {
    fn from(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }
}
