//! Parsing of untrusted expense payloads sent by clients.

use axum::{Json, extract::rejection::JsonRejection};
use serde::Deserialize;

use crate::{
    Error,
    expense::core::{Amount, ExpenseUpdate, Label, NewExpense, ValidationError, parse_date},
};

/// The JSON body of a request to create or update an expense.
///
/// Every field is optional here so that a missing field can be reported as a
/// [ValidationError] rather than a generic deserialization failure. Unknown
/// fields, such as an `id` echoed back by the client, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensePayload {
    /// What the money was spent on.
    pub item: Option<String>,
    /// The label used for grouping expenses.
    pub category: Option<String>,
    /// How much was spent, as a JSON number or a numeric string.
    pub amount: Option<AmountInput>,
    /// The day the money was spent, as YYYY-MM-DD.
    pub date: Option<String>,
}

/// An amount as sent by a client.
///
/// HTML number inputs produce strings, so both `12.5` and `"12.5"` are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(f64),
    /// A JSON string holding a number.
    Text(String),
}

impl AmountInput {
    fn parse(&self) -> Result<Amount, ValidationError> {
        match self {
            AmountInput::Number(value) => Amount::new(*value),
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidAmount(text.to_owned()))
                .and_then(Amount::new),
        }
    }
}

impl TryFrom<ExpensePayload> for NewExpense {
    type Error = ValidationError;

    fn try_from(payload: ExpensePayload) -> Result<Self, Self::Error> {
        let item = payload.item.ok_or(ValidationError::MissingField("item"))?;
        let category = payload
            .category
            .ok_or(ValidationError::MissingField("category"))?;
        let amount = payload
            .amount
            .ok_or(ValidationError::MissingField("amount"))?;
        let date = payload.date.ok_or(ValidationError::MissingField("date"))?;

        Ok(NewExpense {
            item: Label::new("item", &item)?,
            category: Label::new("category", &category)?,
            amount: amount.parse()?,
            date: parse_date(&date)?,
        })
    }
}

impl TryFrom<ExpensePayload> for ExpenseUpdate {
    type Error = ValidationError;

    fn try_from(payload: ExpensePayload) -> Result<Self, Self::Error> {
        Ok(ExpenseUpdate {
            item: payload
                .item
                .map(|item| Label::new("item", &item))
                .transpose()?,
            category: payload
                .category
                .map(|category| Label::new("category", &category))
                .transpose()?,
            amount: payload.amount.map(|amount| amount.parse()).transpose()?,
            date: payload.date.map(|date| parse_date(&date)).transpose()?,
        })
    }
}

/// Unwrap a JSON request body, turning a rejection into a validation error.
pub(crate) fn parse_json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!("Rejected JSON body: {}", rejection.body_text());
            Err(ValidationError::MalformedPayload(rejection.body_text()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::expense::core::{Amount, ExpenseUpdate, Label, NewExpense, ValidationError};

    use super::{AmountInput, ExpensePayload};

    fn full_payload() -> ExpensePayload {
        ExpensePayload {
            item: Some("Notebook".to_owned()),
            category: Some("School".to_owned()),
            amount: Some(AmountInput::Number(12.0)),
            date: Some("2025-08-12".to_owned()),
        }
    }

    #[test]
    fn full_payload_becomes_new_expense() {
        let new_expense = NewExpense::try_from(full_payload());

        assert_eq!(
            new_expense,
            Ok(NewExpense {
                item: Label::new_unchecked("Notebook"),
                category: Label::new_unchecked("School"),
                amount: Amount::new_unchecked(12.0),
                date: date!(2025 - 08 - 12),
            })
        );
    }

    #[test]
    fn each_missing_field_is_reported() {
        let cases: [(fn(&mut ExpensePayload), &str); 4] = [
            (|payload| payload.item = None, "item"),
            (|payload| payload.category = None, "category"),
            (|payload| payload.amount = None, "amount"),
            (|payload| payload.date = None, "date"),
        ];

        for (remove_field, field) in cases {
            let mut payload = full_payload();
            remove_field(&mut payload);

            assert_eq!(
                NewExpense::try_from(payload),
                Err(ValidationError::MissingField(field)),
                "expected missing {field} to be rejected"
            );
        }
    }

    #[test]
    fn amount_may_be_a_numeric_string() {
        let payload = ExpensePayload {
            amount: Some(AmountInput::Text(" 3.50 ".to_owned())),
            ..full_payload()
        };

        let new_expense = NewExpense::try_from(payload).unwrap();

        assert_eq!(new_expense.amount, Amount::new_unchecked(3.5));
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let payload = ExpensePayload {
            amount: Some(AmountInput::Text("a lot".to_owned())),
            ..full_payload()
        };

        assert_eq!(
            NewExpense::try_from(payload),
            Err(ValidationError::InvalidAmount("a lot".to_owned()))
        );
    }

    #[test]
    fn empty_payload_is_an_empty_update() {
        let update = ExpenseUpdate::try_from(ExpensePayload::default()).unwrap();

        assert!(update.is_empty());
    }

    #[test]
    fn update_validates_given_fields() {
        let payload = ExpensePayload {
            item: Some("   ".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            ExpenseUpdate::try_from(payload),
            Err(ValidationError::EmptyField("item"))
        );
    }

    #[test]
    fn update_parses_given_fields() {
        let payload = ExpensePayload {
            date: Some("2025-09-01".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            ExpenseUpdate::try_from(payload),
            Ok(ExpenseUpdate {
                date: Some(date!(2025 - 09 - 01)),
                ..Default::default()
            })
        );
    }

    #[test]
    fn payload_deserializes_number_and_string_amounts() {
        let payload: ExpensePayload =
            serde_json::from_str(r#"{"amount": 4, "_id": "ignored"}"#).unwrap();
        assert_eq!(payload.amount, Some(AmountInput::Number(4.0)));

        let payload: ExpensePayload = serde_json::from_str(r#"{"amount": "4"}"#).unwrap();
        assert_eq!(payload.amount, Some(AmountInput::Text("4".to_owned())));
    }
}
