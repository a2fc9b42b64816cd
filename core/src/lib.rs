//! 参数化 SQL 语句构建器
//!
//! 通过链式调用拼出 INSERT / SELECT / UPDATE / DELETE 语句，最终得到
//! `(query, params)`：SQL 中只出现 `?` 占位符，值全部走绑定参数。
//!
//! ```
//! use sqlchain::{values, BindValue, StatementBuilder};
//!
//! let stmt = StatementBuilder::new("users")
//!     .insert(values!["name" => "Ana", "age" => 30])?
//!     .build()?;
//!
//! assert_eq!(stmt.query, "INSERT INTO users (name,age) VALUES (?,?)");
//! assert_eq!(stmt.params, vec![BindValue::from("Ana"), BindValue::from(30)]);
//! # Ok::<(), sqlchain::SqlChainError>(())
//! ```
//!
//! 开启 `mysql` 或 `sqlite` feature 后可通过 `Statement::to_query` 交给 sqlx 执行。
//! 占位符不做方言改写，PostgreSQL 需要的 `$n` 形式不受支持。

#[cfg(feature = "sqlx")]
pub mod bind;
pub mod builder;
pub mod error;
pub mod statement;
pub mod value;

pub use builder::{Connector, Direction, JoinKind, Operator, StatementBuilder, StatementKind};
pub use error::{Result, SqlChainError};
pub use statement::Statement;
pub use value::{BindValue, IntoValues};

// 重新导出 derive 宏
pub use sqlchain_derive::Values;
