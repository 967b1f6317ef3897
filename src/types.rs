use chrono::{NaiveDate, NaiveDateTime};

/// Values that can be read from a result row or bound as statement parameters.
///
/// Every data-access operation speaks this one enum, so the statement builders never
/// need to know the driver's parameter types:
/// ```rust
/// use lightbnb_store::prelude::*;
///
/// let params = vec![
///     RowValues::Text("%Vancouver%".into()),
///     RowValues::Int(50),
///     RowValues::Float(4.5),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit); narrowed to the column width when bound
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Calendar date (`DATE` columns)
    Date(NaiveDate),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let RowValues::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let RowValues::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Floats come back as-is; integers widen so `avg()` over an integer column and a
    /// plain float column read the same way.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RowValues::Date(value) => Some(*value),
            RowValues::Timestamp(value) => Some(value.date()),
            RowValues::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

/// Whether `value` can be bound to an `INTEGER` (int4) column.
pub(crate) fn fits_integer_column(value: i64) -> bool {
    i32::try_from(value).is_ok()
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<NaiveDate> for RowValues {
    fn from(value: NaiveDate) -> Self {
        RowValues::Date(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_to_float() {
        assert_eq!(RowValues::Int(4).as_float(), Some(4.0));
        assert_eq!(RowValues::Float(4.25).as_float(), Some(4.25));
        assert_eq!(RowValues::Text("4".into()).as_float(), None);
    }

    #[test]
    fn dates_parse_from_text_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        assert_eq!(RowValues::Text("2021-03-14".into()).as_date(), Some(expected));
        let ts = expected.and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(RowValues::Timestamp(ts).as_date(), Some(expected));
        assert_eq!(RowValues::Null.as_date(), None);
    }

    #[test]
    fn integer_column_range_is_int4() {
        assert!(fits_integer_column(i64::from(i32::MAX)));
        assert!(fits_integer_column(i64::from(i32::MIN)));
        assert!(!fits_integer_column(3_000_000_000));
        assert!(!fits_integer_column(-3_000_000_000));
    }

    #[test]
    fn optional_values_become_null() {
        assert!(RowValues::from(None::<i64>).is_null());
        assert_eq!(RowValues::from(Some("x")), RowValues::Text("x".into()));
    }
}
