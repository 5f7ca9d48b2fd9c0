//! Compiles predicate trees into parameterized WHERE-clause text.
//!
//! Compilation runs in two steps. Lowering walks the tree depth-first,
//! resolves every property path against the schema, binds values into the
//! caller's [`QueryParameters`] and rewrites equality into its NULL-safe
//! form. Rendering then prints the lowered tree, parenthesizing every OR
//! group so the text evaluates like the tree regardless of what encloses it.

use tracing::trace;

use super::{BinaryPredicate, GroupOperator, Operator, Predicate};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::naming::parameter_name;
use crate::params::QueryParameters;
use crate::schema::{Mapping, Schema};
use crate::value::{SqlValue, ValueKind};

/// A lowered boolean expression, ready to print.
#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Compare {
        left: String,
        op: &'static str,
        right: String,
    },
    IsNull {
        expr: String,
        negate: bool,
    },
    Literal(bool),
    Not(Box<Condition>),
    Group {
        op: GroupOperator,
        children: Vec<Condition>,
    },
}

/// A resolved left operand.
struct Operand {
    expr: String,
    param_base: String,
    /// The operand resolves into a JSON column.
    json: bool,
}

/// Compiles [`Predicate`]s against one schema and dialect.
///
/// ```rust
/// use pgintent_core::predicate::{Predicate, PredicateCompiler};
/// use pgintent_core::schema::{Mapping, Schema};
/// use pgintent_core::{PostgresDialect, QueryParameters};
///
/// let mut builder = Schema::builder("foos");
/// builder
///     .map(Mapping::new("Id", "id"))
///     .map(Mapping::new("Size", "size"))
///     .set_key_property("Id");
/// let schema = builder.build().unwrap();
///
/// let dialect = PostgresDialect::new();
/// let compiler = PredicateCompiler::new(&schema, &dialect);
/// let mut params = QueryParameters::new();
/// let sql = compiler
///     .compile(Some(&Predicate::gt("Size", 3)), &mut params)
///     .unwrap();
///
/// assert_eq!(sql, "size > @size");
/// assert_eq!(params.len(), 1);
/// ```
pub struct PredicateCompiler<'a> {
    schema: &'a Schema,
    dialect: &'a dyn Dialect,
    qualify: bool,
}

impl<'a> PredicateCompiler<'a> {
    /// Creates a compiler for `schema`.
    #[must_use]
    pub fn new(schema: &'a Schema, dialect: &'a dyn Dialect) -> Self {
        Self {
            schema,
            dialect,
            qualify: schema.qualifies_columns(),
        }
    }

    /// Renders bare column names even when the schema declares joins.
    ///
    /// UPDATE and DELETE address a single table and take no alias.
    #[must_use]
    pub const fn unqualified(mut self) -> Self {
        self.qualify = false;
        self
    }

    /// Compiles `predicate` into a boolean SQL expression.
    ///
    /// `None` yields an empty string. Values are bound into `params`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaResolution`] when a path's first segment is not
    /// mapped and [`Error::UnsupportedPath`] when a path navigates into a
    /// column that is not JSON-typed.
    pub fn compile(
        &self,
        predicate: Option<&Predicate>,
        params: &mut QueryParameters,
    ) -> Result<String> {
        let Some(predicate) = predicate else {
            return Ok(String::new());
        };
        let condition = self.lower(predicate, params)?;
        let sql = render(&condition, self.dialect);
        trace!("Compiled predicate: {sql}");
        Ok(sql)
    }

    fn lower(&self, predicate: &Predicate, params: &mut QueryParameters) -> Result<Condition> {
        match predicate {
            Predicate::Group(group) => {
                let children = group
                    .children
                    .iter()
                    .map(|child| self.lower(child, params))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Condition::Group {
                    op: group.operator,
                    children,
                })
            }
            Predicate::Binary(binary) => self.lower_binary(binary, params),
        }
    }

    fn lower_binary(
        &self,
        binary: &BinaryPredicate,
        params: &mut QueryParameters,
    ) -> Result<Condition> {
        let left = self.left_operand(binary)?;
        let value = &binary.value;

        if value.is_null() {
            return Ok(if binary.operator == Operator::Eq {
                Condition::IsNull {
                    expr: left.expr,
                    negate: binary.negate,
                }
            } else {
                Condition::Compare {
                    right: wrap_in(binary.operator, String::from("NULL")),
                    op: self.dialect.comparison_operator(binary.operator, binary.negate),
                    left: left.expr,
                }
            });
        }

        match binary.operator {
            Operator::In => self.lower_in(binary, left, params),
            Operator::Matches if value.kind().is_structured() => {
                let right = self.bind(&left, &left.param_base, value, params)?;
                let contains = Condition::Compare {
                    left: left.expr,
                    op: self.dialect.containment_operator(),
                    right,
                };
                Ok(if binary.negate {
                    Condition::Not(Box::new(contains))
                } else {
                    contains
                })
            }
            Operator::Eq if !binary.is_strict() => {
                let right = self.bind(&left, &left.param_base, value, params)?;
                Ok(self.null_safe_equality(left.expr, right, binary.negate))
            }
            op => {
                let right = self.bind(&left, &left.param_base, value, params)?;
                Ok(Condition::Compare {
                    left: left.expr,
                    op: self.dialect.comparison_operator(op, binary.negate),
                    right,
                })
            }
        }
    }

    /// `a = v` becomes `a = v OR (a IS NULL AND v IS NULL)`.
    ///
    /// `a != v` becomes `a != v OR (a IS NULL AND v IS NOT NULL)
    /// OR (a IS NOT NULL AND v IS NULL)`: true when exactly one side is NULL,
    /// false when both are.
    fn null_safe_equality(&self, left: String, right: String, negate: bool) -> Condition {
        let is_null = |expr: &String, negate: bool| Condition::IsNull {
            expr: expr.clone(),
            negate,
        };
        let both = |l: bool, r: bool| Condition::Group {
            op: GroupOperator::And,
            children: vec![is_null(&left, l), is_null(&right, r)],
        };

        let mut children = vec![Condition::Compare {
            left: left.clone(),
            op: self.dialect.comparison_operator(Operator::Eq, negate),
            right: right.clone(),
        }];
        if negate {
            children.push(both(false, true));
            children.push(both(true, false));
        } else {
            children.push(both(false, false));
        }

        Condition::Group {
            op: GroupOperator::Or,
            children,
        }
    }

    fn lower_in(
        &self,
        binary: &BinaryPredicate,
        left: Operand,
        params: &mut QueryParameters,
    ) -> Result<Condition> {
        let refs = match &binary.value {
            SqlValue::Array(items) => {
                if items.is_empty() {
                    // Nothing is a member of the empty list.
                    return Ok(Condition::Literal(binary.negate));
                }
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        if item.is_null() {
                            Ok(String::from("NULL"))
                        } else {
                            let base = format!("{}_{i}", left.param_base);
                            self.bind(&left, &base, item, params)
                        }
                    })
                    .collect::<Result<Vec<_>>>()?
            }
            scalar => vec![self.bind(&left, &left.param_base, scalar, params)?],
        };

        Ok(Condition::Compare {
            left: left.expr,
            op: self.dialect.comparison_operator(Operator::In, binary.negate),
            right: format!("({})", refs.join(",")),
        })
    }

    fn left_operand(&self, binary: &BinaryPredicate) -> Result<Operand> {
        let mut segments = binary.path();
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let mapping = self.schema.resolve(first)?;
        let base = self.column_expression(mapping);
        let param_base = parameter_name(&mapping.column, &rest);

        if rest.is_empty() {
            return Ok(Operand {
                expr: base,
                param_base,
                json: mapping.is_json(),
            });
        }
        if !mapping.is_json() {
            return Err(Error::UnsupportedPath {
                path: binary.property.clone(),
                column: mapping.column.clone(),
            });
        }

        // Extracted JSON is text; cast it to the compared value's type.
        let extracted = self.dialect.json_path(&base, &rest);
        let kind = scalar_kind(binary);
        let expr = match self.dialect.cast_type(kind) {
            Some(type_name) => self.dialect.cast(&extracted, type_name),
            None => extracted,
        };
        Ok(Operand {
            expr,
            param_base,
            json: kind == ValueKind::Json,
        })
    }

    fn column_expression(&self, mapping: &Mapping) -> String {
        match &mapping.select_expression {
            Some(expression) => expression.clone(),
            None if self.qualify => self.schema.column_ref(mapping),
            None => self.dialect.quote_identifier(&mapping.column),
        }
    }

    /// Binds `value` and returns its (possibly cast) reference.
    ///
    /// Arrays compared against a JSON operand are bound as JSON documents so
    /// both sides of the operator are jsonb.
    fn bind(
        &self,
        left: &Operand,
        base: &str,
        value: &SqlValue,
        params: &mut QueryParameters,
    ) -> Result<String> {
        let value = if left.json {
            value.clone().into_json_document()?
        } else {
            value.clone()
        };
        let kind = value.kind();
        let name = params.insert_or_reuse(base, value);
        let reference = self.dialect.parameter(&name);
        Ok(match kind {
            ValueKind::Json => match self.dialect.cast_type(ValueKind::Json) {
                Some(type_name) => self.dialect.cast(&reference, type_name),
                None => reference,
            },
            _ => reference,
        })
    }
}

fn wrap_in(op: Operator, operand: String) -> String {
    if op == Operator::In {
        format!("({operand})")
    } else {
        operand
    }
}

/// The kind a JSON path extraction is compared as.
fn scalar_kind(binary: &BinaryPredicate) -> ValueKind {
    match (&binary.value, binary.operator) {
        (SqlValue::Array(items), Operator::In) => items
            .iter()
            .map(SqlValue::kind)
            .find(|kind| *kind != ValueKind::Null)
            .unwrap_or(ValueKind::Null),
        (SqlValue::Array(_), _) => ValueKind::Json,
        (value, _) => value.kind(),
    }
}

fn render(condition: &Condition, dialect: &dyn Dialect) -> String {
    match condition {
        Condition::Compare { left, op, right } => format!("{left} {op} {right}"),
        Condition::IsNull { expr, negate } => {
            if *negate {
                format!("{expr} IS NOT NULL")
            } else {
                format!("{expr} IS NULL")
            }
        }
        Condition::Literal(value) => String::from(if *value { "TRUE" } else { "FALSE" }),
        Condition::Not(inner) => format!("NOT ({})", render(inner, dialect)),
        Condition::Group { op, children } => {
            if children.is_empty() {
                // AND over nothing holds; OR over nothing does not.
                return render(&Condition::Literal(*op == GroupOperator::And), dialect);
            }
            let keyword = format!(" {} ", dialect.logical_operator(*op));
            let joined = children
                .iter()
                .map(|child| render(child, dialect))
                .collect::<Vec<_>>()
                .join(&keyword);
            match op {
                GroupOperator::Or => format!("({joined})"),
                GroupOperator::And => joined,
            }
        }
    }
}
