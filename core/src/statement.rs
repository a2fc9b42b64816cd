use crate::value::BindValue;
use serde::Serialize;
use std::fmt;

/// 构建完成的语句：SQL 文本 + 按位置排列的绑定参数
///
/// `params[i]` 对应 `query` 中从左到右第 i 个 `?`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub query: String,
    pub params: Vec<BindValue>,
}

impl Statement {
    pub(crate) fn new(query: String, params: Vec<BindValue>) -> Self {
        Self { query, params }
    }

    /// SQL 文本中 `?` 占位符的数量
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.query)
    }

    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        (self.query, self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

pub(crate) fn count_placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}
