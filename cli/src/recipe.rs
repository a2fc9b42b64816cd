//! JSON 语句描述（recipe）及其到 StatementBuilder 的回放

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use sqlchain::{BindValue, Connector, Direction, JoinKind, Operator, StatementBuilder};

/// 一条语句的完整描述
///
/// ```json
/// {
///   "table": "users",
///   "select": ["id", "name"],
///   "conditions": [{"connector": "where", "column": "age", "op": ">", "value": 18}],
///   "order": [{"column": "name", "direction": "desc"}],
///   "limit": 10
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub table: String,
    #[serde(default)]
    pub select: Option<Vec<String>>,
    #[serde(default)]
    pub insert: Option<Map<String, Value>>,
    #[serde(default)]
    pub update: Option<Map<String, Value>>,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub joins: Vec<JoinStep>,
    #[serde(default)]
    pub conditions: Vec<ConditionStep>,
    #[serde(default)]
    pub order: Vec<OrderStep>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinStep {
    pub kind: String,
    pub table: String,
    pub left: String,
    pub right: String,
    #[serde(default)]
    pub op: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionStep {
    #[serde(default = "default_connector")]
    pub connector: String,
    pub column: String,
    #[serde(default)]
    pub op: Option<String>,
    // 显式的 null 绑定为 NULL，缺省则视为缺少 value
    #[serde(default, deserialize_with = "present_value")]
    pub value: Option<Value>,
    #[serde(default, rename = "in")]
    pub values: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderStep {
    pub column: String,
    #[serde(default)]
    pub direction: Option<String>,
}

fn default_connector() -> String {
    "where".to_string()
}

fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Recipe {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse recipe JSON")
    }

    /// 按 语句类型 -> JOIN -> 条件 -> ORDER BY -> LIMIT 的顺序回放到 builder 上
    ///
    /// 合法性完全交给 builder 判断，例如同时给出 select 和 delete 会得到 InvalidOperation。
    pub fn into_builder(self) -> Result<StatementBuilder> {
        let mut builder = StatementBuilder::new(self.table);

        if let Some(columns) = self.select {
            builder = builder.select(columns)?;
        }
        if let Some(values) = self.insert {
            builder = builder.insert(bind_values(values).context("Invalid insert values")?)?;
        }
        if let Some(values) = self.update {
            builder = builder.update(bind_values(values).context("Invalid update values")?)?;
        }
        if self.delete {
            builder = builder.delete()?;
        }

        for join in self.joins {
            let kind = join.kind.parse::<JoinKind>()?;
            let op = parse_operator(join.op.as_deref())?;
            builder = builder.join(kind, &join.table, &join.left, op, &join.right)?;
        }

        for (i, condition) in self.conditions.into_iter().enumerate() {
            builder = condition
                .apply(builder)
                .with_context(|| format!("Invalid condition #{}", i + 1))?;
        }

        for order in self.order {
            let direction = match order.direction.as_deref() {
                Some(d) => d.parse::<Direction>()?,
                None => Direction::default(),
            };
            builder = builder.order(&order.column, direction)?;
        }

        if let Some(n) = self.limit {
            builder = builder.limit(n)?;
        }

        Ok(builder)
    }
}

impl ConditionStep {
    fn apply(self, builder: StatementBuilder) -> Result<StatementBuilder> {
        let connector = self.connector.parse::<Connector>()?;

        match (self.values, self.value) {
            (Some(_), Some(_)) => {
                bail!("condition on '{}' has both 'value' and 'in'", self.column)
            }
            (Some(values), None) => {
                if self.op.is_some() {
                    bail!("'op' cannot be combined with 'in' on '{}'", self.column);
                }
                let values = values
                    .into_iter()
                    .map(BindValue::try_from)
                    .collect::<sqlchain::Result<Vec<_>>>()?;
                Ok(builder.condition_in(connector, &self.column, values)?)
            }
            (None, Some(value)) => {
                let op = parse_operator(self.op.as_deref())?;
                let value = BindValue::try_from(value)?;
                Ok(builder.condition(connector, &self.column, op, value)?)
            }
            (None, None) => bail!("condition on '{}' needs 'value' or 'in'", self.column),
        }
    }
}

fn parse_operator(op: Option<&str>) -> Result<Operator> {
    match op {
        Some(op) => Ok(op.parse::<Operator>()?),
        None => Ok(Operator::default()),
    }
}

fn bind_values(values: Map<String, Value>) -> Result<Vec<(String, BindValue)>> {
    values
        .into_iter()
        .map(|(column, value)| {
            let value = BindValue::try_from(value)
                .with_context(|| format!("Invalid value for column '{}'", column))?;
            Ok((column, value))
        })
        .collect()
}
