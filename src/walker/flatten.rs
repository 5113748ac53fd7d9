//! Prefix-order flattening of a normalized tree and its inverse.
//!
//! `flatten` emits every node before its operands, operands left to right.
//! Each token knows how many operands it takes, so `reconstruct` can rebuild
//! the tree by consuming the sequence recursively, exactly undoing the
//! flattening.

use crate::ast::{BinaryOp, Expr, Method, SqlMethod, UnaryOp, Value};
use crate::error::{QueryError, QueryResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'e> {
    Binary(BinaryOp),
    Unary(UnaryOp),
    /// `arity` counts the receiver
    Method { method: SqlMethod, arity: usize },
    Member { table: &'e str, field: &'e str },
    Constant(&'e Value),
}

impl Token<'_> {
    pub fn operand_count(&self) -> usize {
        match self {
            Token::Binary(_) => 2,
            Token::Unary(_) => 1,
            Token::Method { arity, .. } => *arity,
            Token::Member { .. } | Token::Constant(_) => 0,
        }
    }
}

/// Flatten a normalized tree.
pub fn flatten(root: &Expr) -> QueryResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node {
            Expr::Binary { op, left, right } => {
                tokens.push(Token::Binary(*op));
                stack.push(right);
                stack.push(left);
            }
            Expr::Unary { op, operand } => {
                tokens.push(Token::Unary(*op));
                stack.push(operand);
            }
            Expr::Call {
                method: Method::Sql(method),
                receiver: Some(receiver),
                args,
            } => {
                tokens.push(Token::Method {
                    method: *method,
                    arity: args.len() + 1,
                });
                stack.extend(args.iter().rev());
                stack.push(receiver);
            }
            Expr::Member { table, field } => tokens.push(Token::Member {
                table: table.as_str(),
                field: field.as_str(),
            }),
            Expr::Constant(value) => tokens.push(Token::Constant(value)),
            other => {
                return Err(QueryError::malformed(format!(
                    "node cannot be translated directly: {:?}",
                    other
                )));
            }
        }
    }
    Ok(tokens)
}

/// Builds one output per token from the outputs of its operands.
pub trait Assemble<'e> {
    type Output;

    fn assemble(&mut self, token: &Token<'e>, operands: Vec<Self::Output>) -> QueryResult<Self::Output>;
}

/// Consume a flattened sequence. Every token must be used exactly once.
pub fn reconstruct<'e, A: Assemble<'e>>(tokens: &[Token<'e>], assembler: &mut A) -> QueryResult<A::Output> {
    let mut cursor = 0;
    let output = consume(tokens, &mut cursor, assembler)?;
    if cursor != tokens.len() {
        return Err(QueryError::malformed(format!(
            "{} token(s) left after reconstruction",
            tokens.len() - cursor
        )));
    }
    Ok(output)
}

fn consume<'e, A: Assemble<'e>>(
    tokens: &[Token<'e>],
    cursor: &mut usize,
    assembler: &mut A,
) -> QueryResult<A::Output> {
    let token = tokens
        .get(*cursor)
        .ok_or_else(|| QueryError::malformed("token sequence ended early"))?;
    *cursor += 1;

    let mut operands = Vec::with_capacity(token.operand_count());
    for _ in 0..token.operand_count() {
        operands.push(consume(tokens, cursor, assembler)?);
    }
    assembler.assemble(token, operands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::not;

    /// Rebuilds the tree itself, to check the sequence round-trips.
    struct Rebuild;

    impl<'e> Assemble<'e> for Rebuild {
        type Output = Expr;

        fn assemble(&mut self, token: &Token<'e>, mut operands: Vec<Expr>) -> QueryResult<Expr> {
            Ok(match token {
                Token::Binary(op) => {
                    let right = operands.pop().unwrap();
                    let left = operands.pop().unwrap();
                    Expr::binary(*op, left, right)
                }
                Token::Unary(op) => Expr::unary(*op, operands.pop().unwrap()),
                Token::Method { method, .. } => {
                    let receiver = operands.remove(0);
                    Expr::sql_call(*method, receiver, operands)
                }
                Token::Member { table, field } => Expr::member(*table, *field),
                Token::Constant(value) => Expr::Constant((*value).clone()),
            })
        }
    }

    fn t(field: &str) -> Expr {
        Expr::member("T", field)
    }

    #[test]
    fn test_prefix_order() {
        let expr = t("A").equals(1).and(t("B").less_than(t("C")));
        let tokens = flatten(&expr).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Binary(BinaryOp::AndAlso),
                Token::Binary(BinaryOp::Equal),
                Token::Member { table: "T", field: "A" },
                Token::Constant(&Value::Int(1)),
                Token::Binary(BinaryOp::LessThan),
                Token::Member { table: "T", field: "B" },
                Token::Member { table: "T", field: "C" },
            ]
        );
    }

    #[test]
    fn test_round_trip_keeps_operand_order() {
        let cases = vec![
            t("A").equals(0),
            t("A").minus(t("B")).greater_than(t("C").divided_by(2)),
            not(t("A").less_or_equal(t("B"))).or(t("C").not_equals("x")),
            t("A").between(1, t("B")).and(t("C").is_in([3, 2, 1])),
            t("A").or_else(t("B")).length().is_not_null(),
        ];
        for expr in cases {
            let tokens = flatten(&expr).unwrap();
            let rebuilt = reconstruct(&tokens, &mut Rebuild).unwrap();
            assert_eq!(rebuilt, expr);
        }
    }

    #[test]
    fn test_unnormalized_nodes_are_rejected() {
        let expr = Expr::Lambda(Box::new(t("A")));
        assert!(matches!(flatten(&expr), Err(QueryError::MalformedExpression(_))));
    }

    #[test]
    fn test_truncated_sequence() {
        let expr = t("A").equals(1);
        let tokens = flatten(&expr).unwrap();
        let err = reconstruct(&tokens[..2], &mut Rebuild).unwrap_err();
        assert!(matches!(err, QueryError::MalformedExpression(_)));
        let err = reconstruct(&[tokens[2].clone(), tokens[3].clone()], &mut Rebuild).unwrap_err();
        assert!(matches!(err, QueryError::MalformedExpression(_)));
    }
}
