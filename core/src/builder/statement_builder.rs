use super::clause::{placeholders, Connector, Direction, JoinKind, Operator};
use crate::error::{Result, SqlChainError};
use crate::statement::{count_placeholders, Statement};
use crate::value::{BindValue, IntoValues};
use std::fmt;

/// 语句类型，由第一次调用 insert / select / update / delete 决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Unset,
    Insert,
    Select,
    Update,
    Delete,
}

impl StatementKind {
    /// WHERE / AND / OR 是否可用
    fn allows_conditions(self) -> bool {
        match self {
            StatementKind::Insert => false,
            StatementKind::Unset
            | StatementKind::Select
            | StatementKind::Update
            | StatementKind::Delete => true,
        }
    }

    /// JOIN / ORDER BY / LIMIT 是否可用
    fn allows_select_clauses(self) -> bool {
        match self {
            StatementKind::Select => true,
            StatementKind::Unset
            | StatementKind::Insert
            | StatementKind::Update
            | StatementKind::Delete => false,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatementKind::Unset => "UNSET",
            StatementKind::Insert => "INSERT",
            StatementKind::Select => "SELECT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// 单条语句的构建器
///
/// 每个配置方法都消耗 builder 并返回 `Result<Self>`，非法调用会立即返回
/// `InvalidOperation`，链式调用在该处中断：
///
/// ```
/// use sqlchain::{Direction, Operator, StatementBuilder};
///
/// let stmt = StatementBuilder::new("users")
///     .select(["id", "name"])?
///     .where_op("age", Operator::Gt, 18)?
///     .and("active", 1)?
///     .order("name", Direction::Desc)?
///     .limit(10)?
///     .build()?;
///
/// assert_eq!(
///     stmt.query,
///     "SELECT id,name FROM users WHERE age > ? AND active = ? ORDER BY name DESC LIMIT 10"
/// );
/// assert_eq!(stmt.params.len(), 2);
/// # Ok::<(), sqlchain::SqlChainError>(())
/// ```
///
/// 再次调用 `where_` / `where_in` 会替换整个条件组，之前条件绑定的参数一并丢弃。
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    table: String,
    kind: StatementKind,
    main: String,
    // 主子句参数（INSERT 的 VALUES / UPDATE 的 SET）
    main_params: Vec<BindValue>,
    joins: Vec<String>,
    conditions: Vec<String>,
    // 当前条件组绑定的参数，替换条件组时一起替换
    condition_params: Vec<BindValue>,
    order: Vec<String>,
    limit: Option<u64>,
    built: Option<Statement>,
}

impl StatementBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: StatementKind::Unset,
            main: String::new(),
            main_params: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            condition_params: Vec::new(),
            order: Vec::new(),
            limit: None,
            built: None,
        }
    }

    // ========== 语句类型 ==========

    /// `INSERT INTO <table> (<cols>) VALUES (?,...)`，列顺序即映射的迭代顺序
    pub fn insert(mut self, values: impl IntoValues) -> Result<Self> {
        if !self.conditions.is_empty() {
            return Err(self.reject("insert", "cannot use conditions inside insert query"));
        }
        let values = values.into_column_values();
        if values.is_empty() {
            return Err(self.reject("insert", "insert requires at least one column"));
        }
        self.set_kind(StatementKind::Insert)?;

        let (columns, params): (Vec<String>, Vec<BindValue>) = values.into_iter().unzip();
        self.main = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(","),
            placeholders(params.len())
        );
        self.main_params = params;
        Ok(self)
    }

    /// `SELECT <cols> FROM <table>`，空列表等同于 `*`
    pub fn select<I>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.set_kind(StatementKind::Select)?;

        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let columns = if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(",")
        };
        self.main = format!("SELECT {} FROM {}", columns, self.table);
        Ok(self)
    }

    pub fn select_all(self) -> Result<Self> {
        self.select(["*"])
    }

    /// `UPDATE <table> SET a = ?, b = ?`
    pub fn update(mut self, values: impl IntoValues) -> Result<Self> {
        let values = values.into_column_values();
        if values.is_empty() {
            return Err(self.reject("update", "update requires at least one column"));
        }
        self.set_kind(StatementKind::Update)?;

        let (columns, params): (Vec<String>, Vec<BindValue>) = values.into_iter().unzip();
        let assignments: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
        self.main = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        self.main_params = params;
        Ok(self)
    }

    pub fn delete(mut self) -> Result<Self> {
        self.set_kind(StatementKind::Delete)?;
        self.main = format!("DELETE FROM {}", self.table);
        Ok(self)
    }

    // ========== 条件 ==========

    /// 开启新的条件组：`WHERE <column> = ?`
    pub fn where_(self, column: &str, value: impl Into<BindValue>) -> Result<Self> {
        self.where_op(column, Operator::Eq, value)
    }

    /// 开启新的条件组：`WHERE <column> <op> ?`
    pub fn where_op(
        mut self,
        column: &str,
        op: Operator,
        value: impl Into<BindValue>,
    ) -> Result<Self> {
        self.ensure_conditions_allowed("where")?;
        self.conditions = vec![comparison(Connector::Where, column, op)];
        self.condition_params = vec![value.into()];
        Ok(self)
    }

    pub fn and(self, column: &str, value: impl Into<BindValue>) -> Result<Self> {
        self.push_comparison(Connector::And, column, Operator::Eq, value)
    }

    pub fn and_op(self, column: &str, op: Operator, value: impl Into<BindValue>) -> Result<Self> {
        self.push_comparison(Connector::And, column, op, value)
    }

    pub fn or(self, column: &str, value: impl Into<BindValue>) -> Result<Self> {
        self.push_comparison(Connector::Or, column, Operator::Eq, value)
    }

    pub fn or_op(self, column: &str, op: Operator, value: impl Into<BindValue>) -> Result<Self> {
        self.push_comparison(Connector::Or, column, op, value)
    }

    /// 开启新的条件组：`WHERE <column> IN (?,?,...)`
    pub fn where_in<I>(mut self, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        self.ensure_conditions_allowed("where_in")?;
        let values = self.collect_in_values("where_in", values)?;
        self.conditions = vec![membership(Connector::Where, column, values.len())];
        self.condition_params = values;
        Ok(self)
    }

    pub fn and_in<I>(self, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        self.push_membership(Connector::And, column, values)
    }

    pub fn or_in<I>(self, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        self.push_membership(Connector::Or, column, values)
    }

    /// 按连接符追加比较条件；`Connector::Where` 会开启新的条件组
    pub fn condition(
        self,
        connector: Connector,
        column: &str,
        op: Operator,
        value: impl Into<BindValue>,
    ) -> Result<Self> {
        match connector {
            Connector::Where => self.where_op(column, op, value),
            Connector::And | Connector::Or => self.push_comparison(connector, column, op, value),
        }
    }

    /// 按连接符追加 IN 条件；`Connector::Where` 会开启新的条件组
    pub fn condition_in<I>(self, connector: Connector, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        match connector {
            Connector::Where => self.where_in(column, values),
            Connector::And | Connector::Or => self.push_membership(connector, column, values),
        }
    }

    fn push_comparison(
        mut self,
        connector: Connector,
        column: &str,
        op: Operator,
        value: impl Into<BindValue>,
    ) -> Result<Self> {
        self.ensure_condition_group(connector)?;
        self.conditions.push(comparison(connector, column, op));
        self.condition_params.push(value.into());
        Ok(self)
    }

    fn push_membership<I>(mut self, connector: Connector, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        self.ensure_condition_group(connector)?;
        let values = self.collect_in_values(connector.as_sql(), values)?;
        self.conditions
            .push(membership(connector, column, values.len()));
        self.condition_params.extend(values);
        Ok(self)
    }

    // ========== JOIN / ORDER BY / LIMIT（仅 SELECT） ==========

    pub fn left_join(self, table: &str, left: &str, right: &str) -> Result<Self> {
        self.join(JoinKind::Left, table, left, Operator::Eq, right)
    }

    pub fn left_join_op(self, table: &str, left: &str, op: Operator, right: &str) -> Result<Self> {
        self.join(JoinKind::Left, table, left, op, right)
    }

    pub fn right_join(self, table: &str, left: &str, right: &str) -> Result<Self> {
        self.join(JoinKind::Right, table, left, Operator::Eq, right)
    }

    pub fn right_join_op(self, table: &str, left: &str, op: Operator, right: &str) -> Result<Self> {
        self.join(JoinKind::Right, table, left, op, right)
    }

    pub fn inner_join(self, table: &str, left: &str, right: &str) -> Result<Self> {
        self.join(JoinKind::Inner, table, left, Operator::Eq, right)
    }

    pub fn inner_join_op(self, table: &str, left: &str, op: Operator, right: &str) -> Result<Self> {
        self.join(JoinKind::Inner, table, left, op, right)
    }

    /// `<KIND> JOIN <table> ON <left> <op> <right>`，按调用顺序追加
    pub fn join(
        mut self,
        kind: JoinKind,
        table: &str,
        left: &str,
        op: Operator,
        right: &str,
    ) -> Result<Self> {
        self.ensure_select("joins")?;
        self.joins
            .push(format!("{} {} ON {} {} {}", kind.as_sql(), table, left, op, right));
        Ok(self)
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Result<Self> {
        self.ensure_select("order")?;
        self.order.push(format!("{} {}", column, direction));
        Ok(self)
    }

    /// 与 `order` 相同，方向以字符串给出（不区分大小写）
    pub fn order_by(self, column: &str, direction: &str) -> Result<Self> {
        let direction = direction.parse::<Direction>()?;
        self.order(column, direction)
    }

    /// 设置 LIMIT，多次调用以最后一次为准
    pub fn limit(mut self, n: u64) -> Result<Self> {
        self.ensure_select("limit")?;
        self.limit = Some(n);
        Ok(self)
    }

    // ========== 构建 ==========

    /// 拼接最终 SQL 并校验占位符数量与参数数量一致
    ///
    /// 结果同时保存在 builder 中，可通过 `rendered()` 取回。
    pub fn build(&mut self) -> Result<Statement> {
        if self.kind == StatementKind::Unset {
            return Err(self.reject(
                "build",
                "no statement kind set; call insert, select, update or delete first",
            ));
        }

        let mut query = self.main.clone();

        if !self.joins.is_empty() {
            query.push(' ');
            query.push_str(&self.joins.join(" "));
        }

        if !self.conditions.is_empty() {
            query.push(' ');
            query.push_str(&self.conditions.join(" "));
        }

        if !self.order.is_empty() {
            query.push_str(" ORDER BY ");
            query.push_str(&self.order.join(","));
        }

        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        let params = self.params();
        let placeholders = count_placeholders(&query);
        if placeholders != params.len() {
            tracing::debug!(
                table = %self.table,
                kind = %self.kind,
                placeholders,
                params = params.len(),
                "placeholder count does not match bound parameters"
            );
            return Err(SqlChainError::ParameterMismatch {
                placeholders,
                params: params.len(),
            });
        }

        let statement = Statement::new(query, params);
        tracing::debug!(
            table = %self.table,
            kind = %self.kind,
            params = statement.params.len(),
            "statement built"
        );
        self.built = Some(statement.clone());
        Ok(statement)
    }

    // ========== 访问器 ==========

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// 所有绑定值（主子句参数 + 条件参数），顺序与占位符一致
    pub fn params(&self) -> Vec<BindValue> {
        let mut all = self.main_params.clone();
        all.extend_from_slice(&self.condition_params);
        all
    }

    pub fn joins(&self) -> &[String] {
        &self.joins
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn orders(&self) -> &[String] {
        &self.order
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// 最近一次 `build` 的结果
    pub fn rendered(&self) -> Option<&Statement> {
        self.built.as_ref()
    }

    // ========== 校验 ==========

    fn set_kind(&mut self, kind: StatementKind) -> Result<()> {
        if self.kind != StatementKind::Unset {
            let msg = format!(
                "statement kind already set to {}, cannot switch to {}",
                self.kind, kind
            );
            return Err(self.reject("set_kind", msg));
        }
        self.kind = kind;
        Ok(())
    }

    fn ensure_conditions_allowed(&self, op: &str) -> Result<()> {
        if self.kind.allows_conditions() {
            Ok(())
        } else {
            Err(self.reject(op, "cannot use conditions inside insert query"))
        }
    }

    fn ensure_condition_group(&self, connector: Connector) -> Result<()> {
        if self.conditions.is_empty() {
            Err(self.reject(connector.as_sql(), "cannot use and/or before where"))
        } else {
            Ok(())
        }
    }

    fn ensure_select(&self, op: &str) -> Result<()> {
        if self.kind.allows_select_clauses() {
            Ok(())
        } else {
            let msg = format!("cannot use {} outside select query", op);
            Err(self.reject(op, msg))
        }
    }

    fn collect_in_values<I>(&self, op: &str, values: I) -> Result<Vec<BindValue>>
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        let values: Vec<BindValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(self.reject(op, "IN requires at least one value"));
        }
        Ok(values)
    }

    fn reject(&self, op: &str, msg: impl Into<String>) -> SqlChainError {
        let msg = msg.into();
        tracing::debug!(table = %self.table, kind = %self.kind, op, "{}", msg);
        SqlChainError::invalid(msg)
    }
}

fn comparison(connector: Connector, column: &str, op: Operator) -> String {
    format!("{} {} {} ?", connector.as_sql(), column, op)
}

fn membership(connector: Connector, column: &str, count: usize) -> String {
    format!("{} {} IN ({})", connector.as_sql(), column, placeholders(count))
}
