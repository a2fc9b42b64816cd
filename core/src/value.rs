//! 绑定参数值
//!
//! `BindValue` 是交给数据库驱动的不透明参数，按位置与 SQL 中的 `?` 一一对应。

use crate::error::{Result, SqlChainError};
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// 绑定值，用于安全地传递参数
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    String(String),
    Int64(i64),
    Int32(i32),
    Int16(i16),
    Float64(f64),
    Float32(f32),
    Bool(bool),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
    Decimal(BigDecimal),
    Null,
}

impl BindValue {
    pub fn is_null(&self) -> bool {
        matches!(self, BindValue::Null)
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::String(s)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::String(s.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(i: i64) -> Self {
        BindValue::Int64(i)
    }
}

impl From<i32> for BindValue {
    fn from(i: i32) -> Self {
        BindValue::Int32(i)
    }
}

impl From<i16> for BindValue {
    fn from(i: i16) -> Self {
        BindValue::Int16(i)
    }
}

// 无符号 / 更窄的整数提升到能无损容纳的有符号类型
impl From<u32> for BindValue {
    fn from(i: u32) -> Self {
        BindValue::Int64(i64::from(i))
    }
}

impl From<u16> for BindValue {
    fn from(i: u16) -> Self {
        BindValue::Int32(i32::from(i))
    }
}

impl From<u8> for BindValue {
    fn from(i: u8) -> Self {
        BindValue::Int16(i16::from(i))
    }
}

impl From<i8> for BindValue {
    fn from(i: i8) -> Self {
        BindValue::Int16(i16::from(i))
    }
}

impl From<f64> for BindValue {
    fn from(f: f64) -> Self {
        BindValue::Float64(f)
    }
}

impl From<f32> for BindValue {
    fn from(f: f32) -> Self {
        BindValue::Float32(f)
    }
}

impl From<bool> for BindValue {
    fn from(b: bool) -> Self {
        BindValue::Bool(b)
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(b: Vec<u8>) -> Self {
        BindValue::Bytes(b)
    }
}

impl From<NaiveDateTime> for BindValue {
    fn from(dt: NaiveDateTime) -> Self {
        BindValue::DateTime(dt)
    }
}

impl From<BigDecimal> for BindValue {
    fn from(d: BigDecimal) -> Self {
        BindValue::Decimal(d)
    }
}

/// `None` 绑定为 SQL NULL
impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => BindValue::Null,
        }
    }
}

impl TryFrom<serde_json::Value> for BindValue {
    type Error = SqlChainError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(BindValue::Null),
            Value::Bool(b) => Ok(BindValue::Bool(b)),
            Value::String(s) => Ok(BindValue::String(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(BindValue::Int64(i))
                } else if n.is_u64() {
                    Err(SqlChainError::UnsupportedValue(format!(
                        "integer {} does not fit in a signed 64-bit parameter",
                        n
                    )))
                } else {
                    n.as_f64().map(BindValue::Float64).ok_or_else(|| {
                        SqlChainError::UnsupportedValue(format!("number {}", n))
                    })
                }
            }
            Value::Array(_) => Err(SqlChainError::UnsupportedValue(
                "arrays cannot be bound as a single parameter".to_string(),
            )),
            Value::Object(_) => Err(SqlChainError::UnsupportedValue(
                "objects cannot be bound as a single parameter".to_string(),
            )),
        }
    }
}

/// 有序的 列名 -> 值 映射，供 INSERT / UPDATE 使用
///
/// 列的顺序就是来源的迭代顺序，绑定参数按同样的顺序排列。
/// 结构体可以通过 `#[derive(Values)]` 自动实现。
pub trait IntoValues {
    fn into_column_values(self) -> Vec<(String, BindValue)>;
}

impl<K: Into<String>, V: Into<BindValue>> IntoValues for Vec<(K, V)> {
    fn into_column_values(self) -> Vec<(String, BindValue)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K: Into<String>, V: Into<BindValue>, const N: usize> IntoValues for [(K, V); N] {
    fn into_column_values(self) -> Vec<(String, BindValue)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K: Into<String>, V: Into<BindValue>> IntoValues for BTreeMap<K, V> {
    fn into_column_values(self) -> Vec<(String, BindValue)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

/// 按书写顺序构造 列名 -> 值 列表
///
/// ```
/// use sqlchain::{values, BindValue};
///
/// let v = values!["name" => "Ana", "age" => 30];
/// assert_eq!(v[0], ("name".to_string(), BindValue::from("Ana")));
/// assert_eq!(v[1], ("age".to_string(), BindValue::Int32(30)));
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<(::std::string::String, $crate::BindValue)>::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$((
            ::std::string::String::from($column),
            $crate::BindValue::from($value),
        )),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn test_bind_value_from_string() {
        let v: BindValue = String::from("test").into();
        assert_eq!(v, BindValue::String("test".to_string()));
    }

    #[test]
    fn test_bind_value_from_str() {
        let v: BindValue = "test".into();
        assert_eq!(v, BindValue::String("test".to_string()));
    }

    #[test]
    fn test_bind_value_from_integers() {
        assert_eq!(BindValue::from(42i64), BindValue::Int64(42));
        assert_eq!(BindValue::from(42i32), BindValue::Int32(42));
        assert_eq!(BindValue::from(42i16), BindValue::Int16(42));
        assert_eq!(BindValue::from(42u32), BindValue::Int64(42));
        assert_eq!(BindValue::from(42u16), BindValue::Int32(42));
        assert_eq!(BindValue::from(42u8), BindValue::Int16(42));
        assert_eq!(BindValue::from(-4i8), BindValue::Int16(-4));
    }

    #[test]
    fn test_bind_value_from_option() {
        assert_eq!(BindValue::from(Some(5)), BindValue::Int32(5));
        assert_eq!(BindValue::from(None::<&str>), BindValue::Null);
        assert!(BindValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_bind_value_from_json() {
        use serde_json::json;

        assert_eq!(BindValue::try_from(json!(18)).unwrap(), BindValue::Int64(18));
        assert_eq!(
            BindValue::try_from(json!(1.5)).unwrap(),
            BindValue::Float64(1.5)
        );
        assert_eq!(
            BindValue::try_from(json!("Ana")).unwrap(),
            BindValue::String("Ana".to_string())
        );
        assert_eq!(BindValue::try_from(json!(null)).unwrap(), BindValue::Null);
        assert_eq!(BindValue::try_from(json!(true)).unwrap(), BindValue::Bool(true));
    }

    #[test]
    fn test_bind_value_from_json_rejects_composites() {
        use serde_json::json;

        assert!(matches!(
            BindValue::try_from(json!([1, 2])),
            Err(SqlChainError::UnsupportedValue(_))
        ));
        assert!(matches!(
            BindValue::try_from(json!({"a": 1})),
            Err(SqlChainError::UnsupportedValue(_))
        ));
        assert!(matches!(
            BindValue::try_from(json!(u64::MAX)),
            Err(SqlChainError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_bind_value_serializes_as_plain_json() {
        let params = vec![
            BindValue::from("Ana"),
            BindValue::from(30),
            BindValue::Null,
            BindValue::from(true),
        ];
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"["Ana",30,null,true]"#);
    }

    #[test]
    fn test_bind_value_temporal_and_decimal() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(BindValue::from(dt), BindValue::DateTime(dt));

        let d = BigDecimal::from_str("12.50").unwrap();
        assert_eq!(BindValue::from(d.clone()), BindValue::Decimal(d));
    }

    #[test]
    fn test_into_values_keeps_order() {
        let v = vec![("b", 1), ("a", 2)].into_column_values();
        assert_eq!(v[0].0, "b");
        assert_eq!(v[1].0, "a");

        let arr = [("name", BindValue::from("Ana")), ("age", BindValue::from(30))].into_column_values();
        assert_eq!(arr[0], ("name".to_string(), BindValue::from("Ana")));
        assert_eq!(arr[1], ("age".to_string(), BindValue::Int32(30)));
    }

    #[test]
    fn test_into_values_btree_map_is_sorted() {
        let mut map = BTreeMap::new();
        map.insert("z", 1);
        map.insert("a", 2);
        let v = map.into_column_values();
        assert_eq!(v[0].0, "a");
        assert_eq!(v[1].0, "z");
    }

    #[test]
    fn test_values_macro() {
        let v = crate::values!["name" => "Ana", "age" => 30, "nick" => None::<&str>];
        assert_eq!(v.len(), 3);
        assert_eq!(v[2], ("nick".to_string(), BindValue::Null));

        let empty = crate::values![];
        assert!(empty.is_empty());
    }
}
