//! Predicate trees over entity properties.
//!
//! A [`Predicate`] is either a single comparison ([`BinaryPredicate`]) or a
//! boolean combination of children ([`PredicateGroup`]). Trees are built by
//! the host and consumed by the [`PredicateCompiler`].
//!
//! # Example
//!
//! ```rust
//! use pgintent_core::predicate::Predicate;
//!
//! // TemplateKey = 'nuts' AND (Attributes.color = 'red' OR Size > 3)
//! let filter = Predicate::eq("TemplateKey", "nuts")
//!     .and(Predicate::eq("Attributes.color", "red").or(Predicate::gt("Size", 3)));
//! ```

mod compiler;

pub use compiler::PredicateCompiler;

use crate::value::{SqlValue, ToSqlValue};

/// Comparison operators of a [`BinaryPredicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality, NULL-safe unless the predicate is strict.
    Eq,
    /// Pattern match, or containment for JSON and array values.
    Matches,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Membership in a list of values.
    In,
}

/// Boolean operators of a [`PredicateGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    /// Returns the dual operator.
    #[must_use]
    pub const fn dual(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

/// A single comparison between a property path and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPredicate {
    /// The comparison operator.
    pub operator: Operator,
    /// Dot-separated property path; segments after the first navigate JSON.
    pub property: String,
    /// The right-hand value.
    pub value: SqlValue,
    /// Inverts the comparison.
    pub negate: bool,
    strict: bool,
}

impl BinaryPredicate {
    /// Creates a comparison.
    pub fn new(operator: Operator, property: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self {
            operator,
            property: property.into(),
            value: value.to_sql_value(),
            negate: false,
            strict: false,
        }
    }

    /// Returns true if equality is rendered as plain SQL `=`.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Splits the property path into its segments.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.property.split('.')
    }
}

/// A boolean combination of predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateGroup {
    pub operator: GroupOperator,
    pub children: Vec<Predicate>,
}

/// A boolean filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Binary(BinaryPredicate),
    Group(PredicateGroup),
}

impl Predicate {
    fn binary(op: Operator, property: &str, value: impl ToSqlValue) -> Self {
        Self::Binary(BinaryPredicate::new(op, property, value))
    }

    /// `property = value`, true when both sides are NULL.
    pub fn eq(property: &str, value: impl ToSqlValue) -> Self {
        Self::binary(Operator::Eq, property, value)
    }

    /// `property != value`, true when exactly one side is NULL.
    pub fn ne(property: &str, value: impl ToSqlValue) -> Self {
        Self::eq(property, value).not()
    }

    /// Pattern match, or containment when `value` is JSON or an array.
    pub fn matches(property: &str, value: impl ToSqlValue) -> Self {
        Self::binary(Operator::Matches, property, value)
    }

    /// Negated [`Predicate::matches`].
    pub fn not_matches(property: &str, value: impl ToSqlValue) -> Self {
        Self::matches(property, value).not()
    }

    /// `property > value`.
    pub fn gt(property: &str, value: impl ToSqlValue) -> Self {
        Self::binary(Operator::Gt, property, value)
    }

    /// `property >= value`.
    pub fn gte(property: &str, value: impl ToSqlValue) -> Self {
        Self::binary(Operator::Gte, property, value)
    }

    /// `property < value`.
    pub fn lt(property: &str, value: impl ToSqlValue) -> Self {
        Self::binary(Operator::Lt, property, value)
    }

    /// `property <= value`.
    pub fn lte(property: &str, value: impl ToSqlValue) -> Self {
        Self::binary(Operator::Lte, property, value)
    }

    /// `property IN (values...)`.
    pub fn in_list<V: ToSqlValue>(property: &str, values: Vec<V>) -> Self {
        Self::binary(Operator::In, property, values)
    }

    /// `property NOT IN (values...)`.
    pub fn not_in<V: ToSqlValue>(property: &str, values: Vec<V>) -> Self {
        Self::in_list(property, values).not()
    }

    /// Plain SQL equality, exempt from NULL-safe expansion.
    ///
    /// Used for key lookups, where the key column is never NULL.
    pub fn strict_eq(property: &str, value: impl ToSqlValue) -> Self {
        Self::eq(property, value).strict()
    }

    /// Exempts an equality from NULL-safe expansion.
    ///
    /// Anything other than an equality comparison is returned unchanged.
    #[must_use]
    pub fn strict(self) -> Self {
        match self {
            Self::Binary(mut binary) if binary.operator == Operator::Eq => {
                binary.strict = true;
                Self::Binary(binary)
            }
            other => other,
        }
    }

    /// Conjunction of `children`.
    #[must_use]
    pub const fn all(children: Vec<Self>) -> Self {
        Self::Group(PredicateGroup {
            operator: GroupOperator::And,
            children,
        })
    }

    /// Disjunction of `children`.
    #[must_use]
    pub const fn any(children: Vec<Self>) -> Self {
        Self::Group(PredicateGroup {
            operator: GroupOperator::Or,
            children,
        })
    }

    /// Combines with another predicate using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.combine(GroupOperator::And, other)
    }

    /// Combines with another predicate using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.combine(GroupOperator::Or, other)
    }

    fn combine(self, operator: GroupOperator, other: Self) -> Self {
        match self {
            Self::Group(mut group) if group.operator == operator => {
                group.children.push(other);
                Self::Group(group)
            }
            first => Self::Group(PredicateGroup {
                operator,
                children: vec![first, other],
            }),
        }
    }

    /// Logical negation, pushed down to the leaves.
    ///
    /// Comparisons flip their `negate` flag; groups swap AND and OR and
    /// negate every child.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Self::Binary(mut binary) => {
                binary.negate = !binary.negate;
                Self::Binary(binary)
            }
            Self::Group(group) => Self::Group(PredicateGroup {
                operator: group.operator.dual(),
                children: group.children.into_iter().map(Self::not).collect(),
            }),
        }
    }
}

impl From<BinaryPredicate> for Predicate {
    fn from(binary: BinaryPredicate) -> Self {
        Self::Binary(binary)
    }
}

impl From<PredicateGroup> for Predicate {
    fn from(group: PredicateGroup) -> Self {
        Self::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_flattens_same_operator() {
        let p = Predicate::eq("A", 1).and(Predicate::eq("B", 2)).and(Predicate::eq("C", 3));
        match p {
            Predicate::Group(group) => {
                assert_eq!(group.operator, GroupOperator::And);
                assert_eq!(group.children.len(), 3);
            }
            Predicate::Binary(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn test_mixed_operators_nest() {
        let p = Predicate::eq("A", 1).or(Predicate::eq("B", 2)).and(Predicate::eq("C", 3));
        let Predicate::Group(outer) = p else {
            panic!("expected a group");
        };
        assert_eq!(outer.operator, GroupOperator::And);
        assert!(matches!(
            &outer.children[0],
            Predicate::Group(PredicateGroup {
                operator: GroupOperator::Or,
                ..
            })
        ));
    }

    #[test]
    fn test_not_applies_de_morgan() {
        let p = Predicate::eq("A", 1).and(Predicate::gt("B", 2)).not();
        let Predicate::Group(group) = p else {
            panic!("expected a group");
        };
        assert_eq!(group.operator, GroupOperator::Or);
        for child in &group.children {
            assert!(matches!(child, Predicate::Binary(b) if b.negate));
        }
    }

    #[test]
    fn test_double_negation_is_identity() {
        let p = Predicate::eq("A", 1).or(Predicate::lt("B", 2));
        assert_eq!(p.clone().not().not(), p);
    }

    #[test]
    fn test_ne_and_not_in_are_negated() {
        assert!(matches!(Predicate::ne("A", 1), Predicate::Binary(b) if b.negate && b.operator == Operator::Eq));
        assert!(matches!(
            Predicate::not_in("A", vec![1, 2]),
            Predicate::Binary(b) if b.negate && b.value == SqlValue::Array(vec![SqlValue::Int(1), SqlValue::Int(2)])
        ));
    }

    #[test]
    fn test_strict_only_marks_equality() {
        assert!(matches!(Predicate::strict_eq("Id", 1), Predicate::Binary(b) if b.is_strict()));
        assert!(matches!(Predicate::gt("Id", 1).strict(), Predicate::Binary(b) if !b.is_strict()));
    }

    #[test]
    fn test_path_segments() {
        let b = BinaryPredicate::new(Operator::Eq, "Attributes.color.name", "red");
        assert_eq!(b.path().collect::<Vec<_>>(), ["Attributes", "color", "name"]);
        assert!(!b.is_strict());
    }
}
