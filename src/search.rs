//! Property search options and the statement they assemble into.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::query_builder::{FilteredQuery, QueryAndParams};
use crate::types::fits_integer_column;

/// Row cap used when the caller does not pass one.
pub const DEFAULT_LIMIT: i64 = 10;

const PROPERTY_SEARCH_SELECT: &str = "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating
FROM properties
JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Optional, independent filters for [`property_search_query`].
///
/// Filters are always applied in field order here, whatever order the caller
/// supplied them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearch {
    /// Substring of the city name (case-sensitive).
    pub city: Option<String>,
    pub owner_id: Option<i64>,
    /// Exclusive lower bound on `cost_per_night`.
    pub minimum_price_per_night: Option<i64>,
    /// Exclusive upper bound on `cost_per_night`.
    pub maximum: Option<i64>,
    /// Exclusive lower bound on the listing's average review rating.
    pub minimum_rating: Option<f64>,
}

impl PropertySearch {
    /// Build options from string pairs, e.g. a decoded query string.
    ///
    /// Empty values count as absent and unrecognized keys are ignored. Numeric options
    /// are parsed here, before any statement exists.
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` if a numeric option does not parse.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut search = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            if value.is_empty() {
                continue;
            }
            match key {
                "city" => search.city = Some(value.to_string()),
                "owner_id" => search.owner_id = Some(parse_integer(key, value)?),
                "minimum_price_per_night" => {
                    search.minimum_price_per_night = Some(parse_integer(key, value)?);
                }
                "maximum" => search.maximum = Some(parse_integer(key, value)?),
                "minimum_rating" => search.minimum_rating = Some(parse_rating(value)?),
                _ => {}
            }
        }
        Ok(search)
    }

    /// Number of filters that will be applied.
    #[must_use]
    pub fn applied_filters(&self) -> usize {
        usize::from(self.city.as_deref().is_some_and(|c| !c.is_empty()))
            + usize::from(self.owner_id.is_some())
            + usize::from(self.minimum_price_per_night.is_some())
            + usize::from(self.maximum.is_some())
            + usize::from(self.minimum_rating.is_some())
    }
}

fn parse_integer(key: &str, value: &str) -> Result<i64, StoreError> {
    let parsed = value
        .parse()
        .map_err(|_| StoreError::MalformedInput(format!("{key} must be an integer, got '{value}'")))?;
    check_integer_filter(key, parsed)
}

/// Owner ids and prices are `INTEGER` columns; wider values cannot be bound.
fn check_integer_filter(key: &str, value: i64) -> Result<i64, StoreError> {
    if fits_integer_column(value) {
        Ok(value)
    } else {
        Err(StoreError::MalformedInput(format!(
            "{key} is out of range for an integer column, got {value}"
        )))
    }
}

fn parse_rating(value: &str) -> Result<f64, StoreError> {
    match value.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Ok(rating),
        _ => Err(StoreError::MalformedInput(format!(
            "minimum_rating must be a number, got '{value}'"
        ))),
    }
}

pub(crate) fn check_limit(limit: i64) -> Result<i64, StoreError> {
    if limit < 0 {
        return Err(StoreError::MalformedInput(format!(
            "limit must not be negative, got {limit}"
        )));
    }
    Ok(limit)
}

/// Assemble the property search statement.
///
/// WHERE starts from `true` and gains one `AND` predicate and one parameter per applied
/// filter in the order city, owner, minimum price, maximum price. The rating filter
/// compares the per-listing average, so it lands in HAVING after `GROUP BY`. Results are
/// ordered by nightly cost and the limit is always the last parameter.
///
/// # Errors
/// Returns `StoreError::MalformedInput` for a negative limit, a non-finite rating, or an
/// owner or price bound outside the `INTEGER` range.
pub fn property_search_query(
    options: &PropertySearch,
    limit: i64,
) -> Result<QueryAndParams, StoreError> {
    let limit = check_limit(limit)?;

    let mut query = FilteredQuery::new(PROPERTY_SEARCH_SELECT);
    if let Some(city) = options.city.as_deref().filter(|c| !c.is_empty()) {
        query.push_where("properties.city LIKE", format!("%{city}%"));
    }
    if let Some(owner_id) = options.owner_id {
        query.push_where("properties.owner_id =", check_integer_filter("owner_id", owner_id)?);
    }
    if let Some(minimum) = options.minimum_price_per_night {
        let minimum = check_integer_filter("minimum_price_per_night", minimum)?;
        query.push_where("properties.cost_per_night >", minimum);
    }
    if let Some(maximum) = options.maximum {
        query.push_where("properties.cost_per_night <", check_integer_filter("maximum", maximum)?);
    }
    if let Some(rating) = options.minimum_rating {
        if !rating.is_finite() {
            return Err(StoreError::MalformedInput(format!(
                "minimum_rating must be a finite number, got {rating}"
            )));
        }
        query.push_having("avg(property_reviews.rating)::float8 >", rating);
    }

    Ok(query
        .group_by("properties.id")
        .order_by("properties.cost_per_night")
        .limit(limit)
        .build())
}

/// Completed stays for one guest, oldest first.
///
/// Reviews are joined on the property only, so `average_rating` is the mean over every
/// review of that listing; grouping by the reservation as well keeps one row per stay.
#[must_use]
pub fn reservations_query(guest_id: i64, limit: i64) -> QueryAndParams {
    QueryAndParams::new(
        "SELECT properties.*,
       reservations.id AS reservation_id,
       reservations.guest_id,
       reservations.property_id,
       reservations.start_date,
       reservations.end_date,
       avg(property_reviews.rating)::float8 AS average_rating
FROM reservations
JOIN properties ON reservations.property_id = properties.id
JOIN property_reviews ON properties.id = property_reviews.property_id
WHERE reservations.guest_id = $1
  AND reservations.end_date < now()::date
GROUP BY properties.id, reservations.id
ORDER BY reservations.start_date
LIMIT $2",
        vec![guest_id.into(), limit.into()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowValues;
    use regex::Regex;

    fn placeholders(sql: &str) -> Vec<usize> {
        Regex::new(r"\$(\d+)")
            .unwrap()
            .captures_iter(sql)
            .map(|c| c[1].parse().unwrap())
            .collect()
    }

    fn every_combination() -> Vec<PropertySearch> {
        (0u8..32)
            .map(|mask| PropertySearch {
                city: (mask & 1 != 0).then(|| "Van".to_string()),
                owner_id: (mask & 2 != 0).then_some(3),
                minimum_price_per_night: (mask & 4 != 0).then_some(50),
                maximum: (mask & 8 != 0).then_some(150),
                minimum_rating: (mask & 16 != 0).then_some(4.0),
            })
            .collect()
    }

    #[test]
    fn no_filters_binds_only_limit() {
        let built = property_search_query(&PropertySearch::default(), DEFAULT_LIMIT).unwrap();
        assert_eq!(built.params, vec![RowValues::Int(10)]);
        assert!(built.query.contains("WHERE true\nGROUP BY properties.id"));
        assert!(built.query.ends_with("ORDER BY properties.cost_per_night\nLIMIT $1"));
    }

    #[test]
    fn params_equal_applied_filters_plus_limit_for_every_combination() {
        for options in every_combination() {
            let built = property_search_query(&options, 7).unwrap();
            assert_eq!(built.params.len(), options.applied_filters() + 1, "{options:?}");
            let expected: Vec<usize> = (1..=built.params.len()).collect();
            assert_eq!(placeholders(&built.query), expected, "{options:?}");
            assert_eq!(built.params.last(), Some(&RowValues::Int(7)));
        }
    }

    #[test]
    fn all_filters_bind_in_fixed_order() {
        // Supplied in reverse; evaluation order is fixed.
        let options = PropertySearch::from_query_pairs([
            ("minimum_rating", "4"),
            ("maximum", "150"),
            ("minimum_price_per_night", "50"),
            ("owner_id", "3"),
            ("city", "Vancouver"),
        ])
        .unwrap();
        let built = property_search_query(&options, 5).unwrap();
        assert_eq!(
            built.params,
            vec![
                RowValues::Text("%Vancouver%".into()),
                RowValues::Int(3),
                RowValues::Int(50),
                RowValues::Int(150),
                RowValues::Float(4.0),
                RowValues::Int(5),
            ]
        );
        assert!(built.query.contains("AND properties.city LIKE $1"));
        assert!(built.query.contains("AND properties.owner_id = $2"));
        assert!(built.query.contains("AND properties.cost_per_night > $3"));
        assert!(built.query.contains("AND properties.cost_per_night < $4"));
        assert!(built.query.contains("HAVING true\n  AND avg(property_reviews.rating)::float8 > $5"));
    }

    #[test]
    fn price_range_binds_bounds_then_limit() {
        let options = PropertySearch {
            minimum_price_per_night: Some(50),
            maximum: Some(150),
            ..PropertySearch::default()
        };
        let built = property_search_query(&options, 5).unwrap();
        assert_eq!(
            built.params,
            vec![RowValues::Int(50), RowValues::Int(150), RowValues::Int(5)]
        );
    }

    #[test]
    fn empty_and_unknown_pairs_are_skipped() {
        let options =
            PropertySearch::from_query_pairs([("city", ""), ("maximum", " "), ("sort", "desc")])
                .unwrap();
        assert_eq!(options, PropertySearch::default());
        assert_eq!(options.applied_filters(), 0);
    }

    #[test]
    fn zero_is_a_real_filter() {
        let options = PropertySearch::from_query_pairs([("minimum_price_per_night", "0")]).unwrap();
        assert_eq!(options.minimum_price_per_night, Some(0));
        assert_eq!(property_search_query(&options, 10).unwrap().params.len(), 2);
    }

    #[test]
    fn non_numeric_filters_are_rejected() {
        for (key, value) in [
            ("owner_id", "me"),
            ("minimum_price_per_night", "cheap"),
            ("maximum", "12.5"),
            ("minimum_rating", "great"),
            ("minimum_rating", "NaN"),
        ] {
            let err = PropertySearch::from_query_pairs([(key, value)]).unwrap_err();
            assert!(err.is_malformed_input(), "{key}={value}");
        }
    }

    #[test]
    fn integer_filters_wider_than_the_column_are_rejected() {
        for key in ["owner_id", "minimum_price_per_night", "maximum"] {
            let err = PropertySearch::from_query_pairs([(key, "99999999999")]).unwrap_err();
            assert!(err.is_malformed_input(), "{key}");
            assert!(!err.is_transport_failure(), "{key}");
        }
        let edge = PropertySearch::from_query_pairs([("maximum", "2147483647")]).unwrap();
        assert_eq!(edge.maximum, Some(i64::from(i32::MAX)));
    }

    #[test]
    fn out_of_range_bounds_fail_before_a_statement_is_built() {
        let options = PropertySearch {
            maximum: Some(3_000_000_000),
            ..PropertySearch::default()
        };
        assert!(property_search_query(&options, 10).unwrap_err().is_malformed_input());
        let options = PropertySearch {
            owner_id: Some(-3_000_000_000),
            ..PropertySearch::default()
        };
        assert!(property_search_query(&options, 10).unwrap_err().is_malformed_input());
    }

    #[test]
    fn non_finite_rating_and_negative_limit_are_rejected() {
        let options = PropertySearch {
            minimum_rating: Some(f64::INFINITY),
            ..PropertySearch::default()
        };
        assert!(property_search_query(&options, 10).unwrap_err().is_malformed_input());
        assert!(
            property_search_query(&PropertySearch::default(), -1)
                .unwrap_err()
                .is_malformed_input()
        );
    }

    #[test]
    fn reservations_bind_guest_then_limit() {
        let built = reservations_query(4, 2);
        assert_eq!(built.params, vec![RowValues::Int(4), RowValues::Int(2)]);
        assert_eq!(placeholders(&built.query), vec![1, 2]);
        assert!(built.query.contains("reservations.end_date < now()::date"));
    }
}
