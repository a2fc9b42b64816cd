//! Statement 构建模块
//!
//! `StatementBuilder` 负责状态机与子句拼接，`clause` 提供操作符、排序方向等子句词汇

pub mod clause;
pub mod statement_builder;

pub use clause::{placeholders, Connector, Direction, JoinKind, Operator};
pub use statement_builder::{StatementBuilder, StatementKind};
