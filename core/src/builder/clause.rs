//! 子句词汇：比较操作符、排序方向、JOIN 类型、条件连接符

use crate::error::{Result, SqlChainError};
use std::fmt;
use std::str::FromStr;

/// SQL 比较操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// 等于: =
    #[default]
    Eq,
    /// 等于: ==
    EqEq,
    /// 不等于: !=
    Ne,
    /// 不等于: <>
    LtGt,
    /// 大于: >
    Gt,
    /// 大于等于: >=
    Ge,
    /// 小于: <
    Lt,
    /// 小于等于: <=
    Le,
    /// LIKE 匹配
    Like,
    /// NOT LIKE
    NotLike,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::EqEq => "==",
            Operator::Ne => "!=",
            Operator::LtGt => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// 符号操作符按原样保留写法，`<>` 与 `!=` 是两个不同的变体；
/// LIKE / NOT LIKE 是关键字，大小写不敏感，统一渲染为大写。
impl FromStr for Operator {
    type Err = SqlChainError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_uppercase().as_str() {
            "=" => Ok(Operator::Eq),
            "==" => Ok(Operator::EqEq),
            "!=" => Ok(Operator::Ne),
            "<>" => Ok(Operator::LtGt),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            "LIKE" => Ok(Operator::Like),
            "NOT LIKE" => Ok(Operator::NotLike),
            _ => Err(SqlChainError::invalid(format!("unknown operator '{}'", s))),
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Direction {
    type Err = SqlChainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            _ => Err(SqlChainError::invalid(format!(
                "unknown order direction '{}'",
                s
            ))),
        }
    }
}

/// JOIN 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Inner => "INNER JOIN",
        }
    }
}

impl FromStr for JoinKind {
    type Err = SqlChainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "LEFT" => Ok(JoinKind::Left),
            "RIGHT" => Ok(JoinKind::Right),
            "INNER" => Ok(JoinKind::Inner),
            _ => Err(SqlChainError::invalid(format!("unknown join kind '{}'", s))),
        }
    }
}

/// 条件连接符：条件组第一项为 WHERE，之后为 AND / OR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Where,
    And,
    Or,
}

impl Connector {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connector::Where => "WHERE",
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl FromStr for Connector {
    type Err = SqlChainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "WHERE" => Ok(Connector::Where),
            "AND" => Ok(Connector::And),
            "OR" => Ok(Connector::Or),
            _ => Err(SqlChainError::invalid(format!("unknown connector '{}'", s))),
        }
    }
}

/// 生成 n 个以逗号分隔的 `?`
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_from_str() {
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::LtGt);
        assert_eq!("!=".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("==".parse::<Operator>().unwrap(), Operator::EqEq);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("like".parse::<Operator>().unwrap(), Operator::Like);
        assert_eq!("not   like".parse::<Operator>().unwrap(), Operator::NotLike);
        assert!(matches!(
            "=~".parse::<Operator>(),
            Err(SqlChainError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(Operator::Le.to_string(), "<=");
        assert_eq!(Operator::NotLike.to_string(), "NOT LIKE");
        assert_eq!(Operator::default(), Operator::Eq);
    }

    #[test]
    fn test_operator_keeps_symbol_spelling() {
        for spelling in ["=", "==", "!=", "<>", ">", ">=", "<", "<="] {
            let op = spelling.parse::<Operator>().unwrap();
            assert_eq!(op.as_sql(), spelling);
        }
        assert_eq!(" not like ".parse::<Operator>().unwrap().as_sql(), "NOT LIKE");
    }

    #[test]
    fn test_direction_from_str_is_case_insensitive() {
        assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Asc);
        assert_eq!("Desc".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Desc.to_string(), "DESC");
    }

    #[test]
    fn test_join_kind_and_connector() {
        assert_eq!("left".parse::<JoinKind>().unwrap().as_sql(), "LEFT JOIN");
        assert_eq!("INNER".parse::<JoinKind>().unwrap(), JoinKind::Inner);
        assert_eq!("or".parse::<Connector>().unwrap(), Connector::Or);
        assert!("xor".parse::<Connector>().is_err());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
        assert_eq!(placeholders(0), "");
    }
}
