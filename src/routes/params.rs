use std::collections::HashMap;

use crate::{filters::OrderFilter, repository::PageRequest, validation::ValidationErrors};

pub const ORDERS_PER_PAGE: u64 = 10;

/// Parsed query string of `GET /api/orders`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListQuery {
    pub filter: OrderFilter,
    pub page: PageRequest,
}

impl OrderListQuery {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let filter = OrderFilter::from_params(params)?;
        // An unusable page number silently falls back to the first page.
        let page = params
            .get("page")
            .and_then(|p| p.trim().parse::<u64>().ok())
            .unwrap_or(1);

        Ok(Self {
            filter,
            page: PageRequest::new(page, ORDERS_PER_PAGE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_defaults_to_first_with_fixed_size() {
        let query = OrderListQuery::parse(&params(&[])).unwrap();
        assert_eq!(query.page, PageRequest::new(1, ORDERS_PER_PAGE));
        assert!(query.filter.is_empty());
    }

    #[test]
    fn bad_page_falls_back_but_bad_filter_fails() {
        let query = OrderListQuery::parse(&params(&[("page", "zero")])).unwrap();
        assert_eq!(query.page.page, 1);

        let query = OrderListQuery::parse(&params(&[("page", "3")])).unwrap();
        assert_eq!(query.page.offset(), 20);

        assert!(OrderListQuery::parse(&params(&[("amount_min", "abc")])).is_err());
    }

    #[test]
    fn out_of_range_page_still_yields_a_bindable_offset() {
        for raw in ["18446744073709551615", "922337203685477582"] {
            let query = OrderListQuery::parse(&params(&[("page", raw)])).unwrap();
            assert!(query.page.offset() <= i64::MAX as u64, "page={raw}");
            assert_eq!(query.page.per_page, ORDERS_PER_PAGE);
        }
    }
}
