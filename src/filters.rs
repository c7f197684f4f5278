//! Query-string filters for the order listing.
//!
//! Raw parameters are parsed once into an [`OrderFilter`]; the filter then
//! narrows either a SeaORM query ([`OrderFilter::apply`]) or an in-memory
//! collection ([`OrderFilter::matches`]) with the same semantics.

use std::{collections::HashMap, str::FromStr};

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, QueryFilter};

use crate::{entity::orders::Column, models::Order, validation::ValidationErrors};

pub const STATUS: &str = "status";
pub const AMOUNT_MIN: &str = "amount_min";
pub const AMOUNT_MAX: &str = "amount_max";
pub const CREATED_FROM: &str = "created_from";
pub const CREATED_TO: &str = "created_to";

/// Every key the filter understands, in the order predicates are applied.
pub const FILTER_KEYS: [&str; 5] = [STATUS, AMOUNT_MIN, AMOUNT_MAX, CREATED_FROM, CREATED_TO];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub amount_min: Option<Decimal>,
    pub amount_max: Option<Decimal>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
}

impl OrderFilter {
    /// Parses the recognized keys out of a query-string map.
    ///
    /// A key counts as present as soon as it exists in the map, so
    /// `?status=` filters on the empty status. Numeric and date keys must
    /// hold a well-formed value; unrecognized keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let filter = Self {
            status: params.get(STATUS).cloned(),
            amount_min: parse_param(params, AMOUNT_MIN, parse_amount, &mut errors),
            amount_max: parse_param(params, AMOUNT_MAX, parse_amount, &mut errors),
            created_from: parse_param(params, CREATED_FROM, parse_date, &mut errors),
            created_to: parse_param(params, CREATED_TO, parse_date, &mut errors),
        };

        errors.into_result(filter)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Narrows `query` by every present predicate.
    ///
    /// Predicates are added in a fixed order (status, amount range, date
    /// range) so the generated SQL is stable for a given filter.
    pub fn apply<Q: QueryFilter>(&self, mut query: Q) -> Q {
        if let Some(status) = &self.status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(min) = self.amount_min {
            query = query.filter(Column::Amount.gte(min));
        }
        if let Some(max) = self.amount_max {
            query = query.filter(Column::Amount.lte(max));
        }
        if let Some(from) = self.created_from {
            query = query.filter(Column::CreatedAt.gte(start_of_day(from)));
        }
        if let Some(end) = self.created_to.and_then(start_of_next_day) {
            query = query.filter(Column::CreatedAt.lt(end));
        }
        query
    }

    /// In-memory counterpart of [`OrderFilter::apply`].
    pub fn matches(&self, order: &Order) -> bool {
        self.status.as_deref().is_none_or(|s| order.status == s)
            && self.amount_min.is_none_or(|min| order.amount >= min)
            && self.amount_max.is_none_or(|max| order.amount <= max)
            && self
                .created_from
                .is_none_or(|from| order.created_at >= start_of_day(from))
            && self
                .created_to
                .and_then(start_of_next_day)
                .is_none_or(|end| order.created_at < end)
    }
}

fn parse_param<T>(
    params: &HashMap<String, String>,
    key: &str,
    parse: fn(&str) -> Option<T>,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = params.get(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        errors.add(key, format!("The {key} field has an invalid value."));
    }
    parsed
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose UTC date is used.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `None` on the last representable date, where the upper bound is moot.
fn start_of_next_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.checked_add_days(Days::new(1)).map(start_of_day)
}
