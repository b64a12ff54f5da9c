use super::{Type, TypeChecker};
use crate::ast::{BinaryOperator, Expression, UnaryOperator};

impl TypeChecker<'_> {
    /// Walk a branch guard and collect the variable refinements it implies
    /// for the `positive` (guard held) or negative (guard failed) arm.
    ///
    /// Only bare variables narrow; refinements through aliased expressions
    /// are out of reach.
    pub(crate) fn extract_narrowings(
        &self,
        condition: &Expression,
        positive: bool,
    ) -> Vec<(String, Type)> {
        let mut narrowings = vec![];
        self.extract(condition, positive, &mut narrowings);
        narrowings
    }

    fn extract(&self, condition: &Expression, positive: bool, out: &mut Vec<(String, Type)>) {
        match condition {
            Expression::Is(is) => {
                let Expression::Variable(variable) = &is.expr else {
                    return;
                };
                // `!(x is T)` and `x !is T` cancel out
                if positive ^ is.negated {
                    out.push((variable.name.clone(), Type::from(&is.ty)));
                }
            }
            Expression::Unary(unary) if unary.operator == UnaryOperator::Not => {
                self.extract(&unary.operand, !positive, out);
            }
            Expression::Binary(binary) => match binary.operator {
                // both conjuncts hold on the positive arm
                BinaryOperator::And if positive => {
                    self.extract(&binary.left, true, out);
                    self.extract(&binary.right, true, out);
                }
                // De Morgan: a failed disjunction refutes both arms
                BinaryOperator::Or if !positive => {
                    self.extract(&binary.left, false, out);
                    self.extract(&binary.right, false, out);
                }
                BinaryOperator::Equal | BinaryOperator::NotEqual => {
                    self.extract_null_test(binary, positive, out);
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// `x != null` on the positive arm and `x == null` on the negative arm
    /// both prove `x` non-null; the null literal may sit on either side.
    fn extract_null_test(
        &self,
        binary: &crate::ast::BinaryExpr,
        positive: bool,
        out: &mut Vec<(String, Type)>,
    ) {
        let variable = match (&binary.left, &binary.right) {
            (Expression::Variable(v), other) if other.is_null_literal() => v,
            (other, Expression::Variable(v)) if other.is_null_literal() => v,
            _ => return,
        };

        let proves_non_null = match binary.operator {
            BinaryOperator::NotEqual => positive,
            BinaryOperator::Equal => !positive,
            _ => return,
        };
        if !proves_non_null {
            return;
        }

        if let Some(info) = self.scope.lookup(&variable.name) {
            if info.declared.is_nullable() {
                out.push((variable.name.clone(), info.declared.strip_null()));
            }
        }
    }
}
