//! 将构建结果交给 sqlx：按顺序绑定参数，不执行查询

use crate::statement::Statement;
use chrono::NaiveDateTime;
use sqlx::{Database, Encode, Type};

/// 将单个绑定值应用到 sqlx 查询上
///
/// `$bind` 需要是拥有所有权的 `BindValue`。
#[macro_export]
macro_rules! apply_bind_value {
    ($query:expr, $bind:expr) => {
        match $bind {
            $crate::BindValue::String(s) => {
                $query = $query.bind(s);
            }
            $crate::BindValue::Int64(i) => {
                $query = $query.bind(i);
            }
            $crate::BindValue::Int32(i) => {
                $query = $query.bind(i);
            }
            $crate::BindValue::Int16(i) => {
                $query = $query.bind(i);
            }
            $crate::BindValue::Float64(f) => {
                $query = $query.bind(f);
            }
            $crate::BindValue::Float32(f) => {
                $query = $query.bind(f);
            }
            $crate::BindValue::Bool(b) => {
                $query = $query.bind(b);
            }
            $crate::BindValue::Bytes(b) => {
                $query = $query.bind(b);
            }
            $crate::BindValue::DateTime(dt) => {
                $query = $query.bind(dt);
            }
            // SQLite 没有 DECIMAL 编码，统一以字符串形式绑定
            $crate::BindValue::Decimal(d) => {
                $query = $query.bind(d.to_string());
            }
            $crate::BindValue::Null => {
                $query = $query.bind(Option::<String>::None);
            }
        }
    };
}

impl Statement {
    /// 生成绑定好全部参数的 `sqlx::query`
    ///
    /// 占位符保持 `?` 形式，适用于 MySQL / SQLite。
    pub fn to_query<'q, DB>(&'q self) -> sqlx::query::Query<'q, DB, <DB as Database>::Arguments<'q>>
    where
        DB: Database,
        String: Type<DB> + for<'b> Encode<'b, DB>,
        i64: Type<DB> + for<'b> Encode<'b, DB>,
        i32: Type<DB> + for<'b> Encode<'b, DB>,
        i16: Type<DB> + for<'b> Encode<'b, DB>,
        f64: Type<DB> + for<'b> Encode<'b, DB>,
        f32: Type<DB> + for<'b> Encode<'b, DB>,
        bool: Type<DB> + for<'b> Encode<'b, DB>,
        Vec<u8>: Type<DB> + for<'b> Encode<'b, DB>,
        NaiveDateTime: Type<DB> + for<'b> Encode<'b, DB>,
        Option<String>: Type<DB> + for<'b> Encode<'b, DB>,
    {
        let mut query = sqlx::query::<DB>(&self.query);
        for bind in self.params.iter().cloned() {
            crate::apply_bind_value!(query, bind);
        }
        query
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use crate::{BindValue, StatementBuilder};
    use sqlx::Execute;

    #[test]
    fn test_to_query_keeps_sql_text() {
        let stmt = StatementBuilder::new("users")
            .update([("age", BindValue::from(31)), ("nick", BindValue::Null)])
            .and_then(|b| b.where_("id", 5))
            .and_then(|mut b| b.build())
            .unwrap();

        let query = stmt.to_query::<sqlx::Sqlite>();
        assert_eq!(query.sql(), "UPDATE users SET age = ?, nick = ? WHERE id = ?");
    }
}
