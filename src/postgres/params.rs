use std::error::Error;

use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::types::RowValues;

type BoxError = Box<dyn Error + Sync + Send>;

/// Container for Postgres parameters with lifetime tracking
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Borrow a slice of `RowValues` as driver parameters, preserving order.
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        Params { references }
    }

    /// Get a reference to the underlying parameter array
    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

/// Encode `value` only if the driver type really accepts the inferred column type;
/// otherwise the server would receive bytes in the wrong wire format.
fn encode<T: ToSql>(value: &T, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    if !T::accepts(ty) {
        return Err(format!(
            "cannot bind a {} value to a parameter of type {ty}",
            std::any::type_name::<T>()
        )
        .into());
    }
    value.to_sql(ty, out)
}

impl ToSql for RowValues {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn to_sql(&self, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
        match self {
            // Postgres infers the exact integer width from the column; narrow to it.
            RowValues::Int(i) => match *ty {
                Type::INT2 => encode(&i16::try_from(*i)?, ty, out),
                Type::INT4 => encode(&i32::try_from(*i)?, ty, out),
                Type::FLOAT4 => encode(&(*i as f32), ty, out),
                Type::FLOAT8 => encode(&(*i as f64), ty, out),
                _ => encode(i, ty, out),
            },
            RowValues::Float(f) => match *ty {
                Type::FLOAT4 => encode(&(*f as f32), ty, out),
                _ => encode(f, ty, out),
            },
            RowValues::Text(s) => encode(s, ty, out),
            RowValues::Bool(b) => encode(b, ty, out),
            RowValues::Date(d) => encode(d, ty, out),
            RowValues::Timestamp(dt) => encode(dt, ty, out),
            RowValues::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
                | Type::BOOL
                | Type::DATE
                | Type::TIMESTAMP
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: &RowValues, ty: &Type) -> Result<Vec<u8>, BoxError> {
        let mut out = bytes::BytesMut::new();
        value.to_sql_checked(ty, &mut out)?;
        Ok(out.to_vec())
    }

    #[test]
    fn integers_narrow_to_column_width() {
        assert_eq!(encoded(&RowValues::Int(7), &Type::INT4).unwrap(), vec![0, 0, 0, 7]);
        assert_eq!(encoded(&RowValues::Int(7), &Type::INT2).unwrap(), vec![0, 7]);
        assert_eq!(encoded(&RowValues::Int(7), &Type::INT8).unwrap().len(), 8);
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        assert!(encoded(&RowValues::Int(i64::from(i32::MAX) + 1), &Type::INT4).is_err());
    }

    #[test]
    fn text_cannot_be_bound_to_integer_column() {
        assert!(encoded(&RowValues::Text("50".into()), &Type::INT4).is_err());
    }

    #[test]
    fn float_binds_to_float8() {
        assert_eq!(
            encoded(&RowValues::Float(4.5), &Type::FLOAT8).unwrap(),
            4.5f64.to_be_bytes().to_vec()
        );
    }

    #[test]
    fn params_keep_order() {
        let values = vec![RowValues::Text("a".into()), RowValues::Int(1)];
        let params = Params::convert(&values);
        assert_eq!(params.as_refs().len(), 2);
    }
}
