//! Conditional branches, `goto` and switches.
//!
//! A branch whose outcome depends on an unknown value yields every possible
//! successor: the fallthrough first, then the taken targets.

use crate::{
    assembly::{IfKind, Register},
    emulation::{Comparison, RegisterContext, Value},
    Result,
};

/// `if-<kind>` and `if-<kind>z`.
#[derive(Clone, Debug)]
pub struct IfOp {
    pub(crate) kind: IfKind,
    pub(crate) lhs: Register,
    pub(crate) rhs: Option<Register>,
    pub(crate) target: u32,
}

impl IfOp {
    pub(crate) fn execute(&self, ctx: &RegisterContext, next: u32) -> Result<Vec<u32>> {
        let lhs = ctx.read(self.lhs)?;
        let zero = Value::int(0);
        let rhs = match self.rhs {
            Some(reg) => ctx.read(reg)?,
            None => &zero,
        };

        match evaluate_predicate(self.kind, lhs, rhs) {
            Some(true) => Ok(vec![self.target]),
            Some(false) => Ok(vec![next]),
            None => {
                log::trace!("ambiguous if-{} on {lhs} and {rhs}", self.kind);
                Ok(vec![next, self.target])
            }
        }
    }
}

/// `packed-switch` and `sparse-switch`.
#[derive(Clone, Debug)]
pub struct SwitchOp {
    pub(crate) src: Register,
    pub(crate) cases: Vec<(i32, u32)>,
}

impl SwitchOp {
    pub(crate) fn execute(&self, ctx: &RegisterContext, next: u32) -> Result<Vec<u32>> {
        let selector = ctx.read(self.src)?;
        if let Some(key) = selector.as_int() {
            let target = self
                .cases
                .iter()
                .find(|(case, _)| *case == key)
                .map_or(next, |(_, target)| *target);
            return Ok(vec![target]);
        }

        log::trace!("ambiguous switch on {selector}");
        Ok(self.possible_successors(next))
    }

    pub(crate) fn possible_successors(&self, next: u32) -> Vec<u32> {
        let mut successors = vec![next];
        for (_, target) in &self.cases {
            if !successors.contains(target) {
                successors.push(*target);
            }
        }
        successors
    }
}

/// Evaluates a predicate on two values, `None` when ambiguous.
///
/// ```rust
/// use smaliscope::assembly::IfKind;
/// use smaliscope::emulation::{evaluate_predicate, Value};
///
/// assert_eq!(evaluate_predicate(IfKind::Ge, &Value::int(5), &Value::int(5)), Some(true));
/// ```
#[must_use]
pub fn evaluate_predicate(kind: IfKind, lhs: &Value, rhs: &Value) -> Option<bool> {
    match lhs.compare(rhs) {
        Comparison::Ambiguous => None,
        other => other.ordering().map(|ordering| kind.holds(ordering)),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::metadata::TypeDescriptor;

    fn ctx_with(lhs: Value, rhs: Value) -> RegisterContext {
        let mut ctx = RegisterContext::new(2, 0);
        ctx.write(0, lhs).unwrap();
        ctx.write(1, rhs).unwrap();
        ctx
    }

    fn branch(kind: IfKind, rhs: Option<Register>) -> IfOp {
        IfOp {
            kind,
            lhs: 0,
            rhs,
            target: 20,
        }
    }

    #[test]
    fn test_unknown_operand_yields_fallthrough_then_target() {
        let unknown = Value::unknown(TypeDescriptor::int());
        for kind in IfKind::iter() {
            let ctx = ctx_with(unknown.clone(), Value::int(1));
            assert_eq!(branch(kind, Some(1)).execute(&ctx, 2).unwrap(), vec![2, 20]);
            assert_eq!(branch(kind, None).execute(&ctx, 2).unwrap(), vec![2, 20]);

            let ctx = ctx_with(Value::int(1), unknown.clone());
            assert_eq!(branch(kind, Some(1)).execute(&ctx, 2).unwrap(), vec![2, 20]);
        }
    }

    #[test]
    fn test_known_operands_yield_one_successor() {
        let cases = [
            (IfKind::Eq, 3, 3, true),
            (IfKind::Eq, 3, 4, false),
            (IfKind::Ne, 3, 4, true),
            (IfKind::Ne, 3, 3, false),
            (IfKind::Lt, 2, 3, true),
            (IfKind::Lt, 3, 3, false),
            (IfKind::Le, 3, 3, true),
            (IfKind::Le, 4, 3, false),
            (IfKind::Gt, 4, 3, true),
            (IfKind::Gt, 3, 3, false),
            (IfKind::Ge, 3, 3, true),
            (IfKind::Ge, 2, 3, false),
        ];
        for (kind, a, b, taken) in cases {
            let ctx = ctx_with(Value::int(a), Value::int(b));
            let expected = if taken { vec![20] } else { vec![2] };
            assert_eq!(
                branch(kind, Some(1)).execute(&ctx, 2).unwrap(),
                expected,
                "if-{kind} {a}, {b}"
            );
        }
    }

    #[test]
    fn test_zero_forms() {
        let ctx = ctx_with(Value::int(-1), Value::int(0));
        assert_eq!(branch(IfKind::Lt, None).execute(&ctx, 2).unwrap(), vec![20]);
        assert_eq!(branch(IfKind::Eq, None).execute(&ctx, 2).unwrap(), vec![2]);

        let ctx = ctx_with(Value::string("x"), Value::int(0));
        assert_eq!(branch(IfKind::Eq, None).execute(&ctx, 2).unwrap(), vec![2]);
        assert_eq!(branch(IfKind::Ne, None).execute(&ctx, 2).unwrap(), vec![20]);
    }

    #[test]
    fn test_switch() {
        let op = SwitchOp {
            src: 0,
            cases: vec![(1, 10), (2, 20), (3, 10)],
        };

        let ctx = ctx_with(Value::int(2), Value::int(0));
        assert_eq!(op.execute(&ctx, 3).unwrap(), vec![20]);

        let ctx = ctx_with(Value::int(9), Value::int(0));
        assert_eq!(op.execute(&ctx, 3).unwrap(), vec![3]);

        let ctx = ctx_with(Value::unknown(TypeDescriptor::int()), Value::int(0));
        assert_eq!(op.execute(&ctx, 3).unwrap(), vec![3, 10, 20]);
    }

    #[test]
    fn test_evaluate_predicate() {
        assert_eq!(
            evaluate_predicate(IfKind::Lt, &Value::int(1), &Value::int(2)),
            Some(true)
        );
        assert_eq!(
            evaluate_predicate(
                IfKind::Eq,
                &Value::unknown(TypeDescriptor::int()),
                &Value::int(2)
            ),
            None
        );
    }
}
