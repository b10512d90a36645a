//! The expense domain model and the validated value types that make it up.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::database_id::ExpenseId;

/// The format used for expense dates on the wire, e.g. "2025-08-12".
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

time::serde::format_description!(
    iso_date,
    Date,
    "[year]-[month repr:numerical padding:zero]-[day padding:zero]"
);

/// The ways an expense, expense update or query from a client can be invalid.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// A required field was not given, or was given as `null`.
    #[error("missing required field \"{0}\"")]
    MissingField(&'static str),

    /// A text field was empty or only contained whitespace.
    #[error("the field \"{0}\" cannot be empty")]
    EmptyField(&'static str),

    /// The amount could not be read as a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// Expenses record money spent, so amounts cannot be negative.
    #[error("the amount cannot be negative, got {0}")]
    NegativeAmount(f64),

    /// The amount was larger than [Amount::MAX].
    #[error("the amount cannot be larger than {max}, got {0}", max = Amount::MAX)]
    AmountTooLarge(f64),

    /// The date was not a calendar date in the format YYYY-MM-DD.
    #[error("\"{0}\" is not a valid date, expected a date like 2025-08-12")]
    InvalidDate(String),

    /// The request body could not be read as a JSON object.
    #[error("could not parse the request body: {0}")]
    MalformedPayload(String),

    /// The query string had an unknown parameter value.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

/// A short, non-empty piece of text such as an expense's item or category.
///
/// Surrounding whitespace is trimmed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Label(String);

impl Label {
    /// Create a label for the field named `field`.
    ///
    /// # Errors
    ///
    /// This function will return an error if `text` is empty or only whitespace.
    pub fn new(field: &'static str, text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();

        if text.is_empty() {
            Err(ValidationError::EmptyField(field))
        } else {
            Ok(Self(text.to_owned()))
        }
    }

    /// Create a label without validation.
    ///
    /// The caller should ensure that the string is trimmed and not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty
    /// invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl From<Label> for String {
    fn from(value: Label) -> Self {
        value.0
    }
}

/// Deserialize a label, naming `field` if it is empty.
fn deserialize_label<'de, D>(field: &'static str, deserializer: D) -> Result<Label, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;

    Label::new(field, &text).map_err(serde::de::Error::custom)
}

fn deserialize_item<'de, D>(deserializer: D) -> Result<Label, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_label("item", deserializer)
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Label, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_label("category", deserializer)
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative amount of money no larger than [Amount::MAX].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// The largest amount a single expense may have.
    ///
    /// Keeps sums over any realistic number of expenses finite.
    pub const MAX: f64 = 1e12;

    /// Create an amount.
    ///
    /// # Errors
    ///
    /// This function will return an error if `value` is negative, larger than
    /// [Amount::MAX], infinite or NaN.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            Err(ValidationError::InvalidAmount(value.to_string()))
        } else if value < 0.0 {
            Err(ValidationError::NegativeAmount(value))
        } else if value > Self::MAX {
            Err(ValidationError::AmountTooLarge(value))
        } else {
            // Adding zero turns -0.0 into 0.0.
            Ok(Self(value + 0.0))
        }
    }

    /// Create an amount without validation.
    ///
    /// The caller should ensure that `value` is finite, not negative and no
    /// larger than [Amount::MAX].
    pub fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    /// The amount as a float.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Parse a calendar date in the format YYYY-MM-DD.
///
/// # Errors
///
/// Returns [ValidationError::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, ValidationError> {
    Date::parse(text.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// One recorded spending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID assigned by the store when the expense was created.
    pub id: ExpenseId,
    /// What the money was spent on, e.g. "Notebook".
    #[serde(deserialize_with = "deserialize_item")]
    pub item: Label,
    /// The label used for grouping expenses, e.g. "School".
    #[serde(deserialize_with = "deserialize_category")]
    pub category: Label,
    /// How much was spent.
    pub amount: Amount,
    /// The day the money was spent.
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// The fields of an expense that has not been added to a store yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// What the money was spent on.
    pub item: Label,
    /// The label used for grouping expenses.
    pub category: Label,
    /// How much was spent.
    pub amount: Amount,
    /// The day the money was spent.
    pub date: Date,
}

impl NewExpense {
    /// Attach the store assigned `id` to the new expense.
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            item: self.item,
            category: self.category,
            amount: self.amount,
            date: self.date,
        }
    }
}

/// A partial update of an expense. Fields set to `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// The new item, if it should change.
    pub item: Option<Label>,
    /// The new category, if it should change.
    pub category: Option<Label>,
    /// The new amount, if it should change.
    pub amount: Option<Amount>,
    /// The new date, if it should change.
    pub date: Option<Date>,
}

impl ExpenseUpdate {
    /// Whether the update leaves every field unchanged.
    pub fn is_empty(&self) -> bool {
        self.item.is_none() && self.category.is_none() && self.amount.is_none() && self.date.is_none()
    }

    /// Apply the update over `expense`, returning the updated expense.
    pub fn apply(self, expense: Expense) -> Expense {
        Expense {
            id: expense.id,
            item: self.item.unwrap_or(expense.item),
            category: self.category.unwrap_or(expense.category),
            amount: self.amount.unwrap_or(expense.amount),
            date: self.date.unwrap_or(expense.date),
        }
    }
}

/// The sum of expense amounts for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category the expenses were grouped by.
    #[serde(deserialize_with = "deserialize_category")]
    pub category: Label,
    /// The sum of the amounts of the expenses in `category`.
    pub total: f64,
}

#[cfg(test)]
mod label_tests {
    use super::{Label, ValidationError};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Label::new("item", ""), Err(ValidationError::EmptyField("item")));
    }

    #[test]
    fn new_fails_on_whitespace() {
        assert_eq!(
            Label::new("category", " \t "),
            Err(ValidationError::EmptyField("category"))
        );
    }

    #[test]
    fn new_trims_text() {
        let label = Label::new("item", "  Notebook ").unwrap();

        assert_eq!(label.as_ref(), "Notebook");
    }
}

#[cfg(test)]
mod amount_tests {
    use super::{Amount, ValidationError};

    #[test]
    fn new_accepts_zero_and_positive_amounts() {
        assert_eq!(Amount::new(0.0).map(|amount| amount.as_f64()), Ok(0.0));
        assert_eq!(Amount::new(12.5).map(|amount| amount.as_f64()), Ok(12.5));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        assert_eq!(Amount::new(-1.0), Err(ValidationError::NegativeAmount(-1.0)));
    }

    #[test]
    fn new_fails_on_amount_above_max() {
        assert_eq!(
            Amount::new(Amount::MAX).map(|amount| amount.as_f64()),
            Ok(Amount::MAX)
        );
        assert_eq!(Amount::new(1e308), Err(ValidationError::AmountTooLarge(1e308)));
    }

    #[test]
    fn new_fails_on_non_finite_amount() {
        assert!(matches!(
            Amount::new(f64::NAN),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(f64::INFINITY),
            Err(ValidationError::InvalidAmount(_))
        ));
    }
}
