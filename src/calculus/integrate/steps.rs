use crate::expr::{Expr, Rational};

/// One node of a derivation trace: `∫ integrand d(variable) = result` by `rule`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegralStep {
    pub integrand: Expr,
    pub variable: String,
    pub result: Expr,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Integrand free of the variable.
    Constant,
    /// `x**n` with `n != -1`.
    Power { exponent: Rational },
    /// `1/x`.
    Reciprocal,
    Exp,
    /// `c**x` for a positive constant base.
    ExpBase { base: Expr },
    Sin,
    Cos,
    Tan,
    /// `1/(a*x**2 + c)`.
    Arctan { a: Rational, c: Rational },
    /// `1/sqrt(c - a*x**2)`.
    Arcsin { a: Rational, c: Rational },
    /// `(b*x + c)/(x**2 + p*x + q)` with `p**2 < 4*q`: a logarithm plus an arctangent.
    QuadraticDenominator { p: Rational, q: Rational },
    ConstantTimes {
        constant: Expr,
        substep: Box<IntegralStep>,
    },
    Sum {
        substeps: Vec<IntegralStep>,
    },
    Substitution {
        u_var: String,
        u: Expr,
        du: Expr,
        substep: Box<IntegralStep>,
    },
    Parts {
        u: Expr,
        dv: Expr,
        du: Expr,
        v_step: Box<IntegralStep>,
        second_step: Box<IntegralStep>,
    },
    Rewrite {
        rewritten: Expr,
        substep: Box<IntegralStep>,
    },
    PartialFractions {
        decomposition: Expr,
        substeps: Vec<IntegralStep>,
    },
}

impl IntegralStep {
    pub fn new(integrand: Expr, variable: &str, result: Expr, rule: Rule) -> Self {
        Self {
            integrand,
            variable: variable.to_string(),
            result,
            rule,
        }
    }

    /// Name of the rule, as printed in traces.
    pub fn rule_name(&self) -> &'static str {
        match &self.rule {
            Rule::Constant => "Constant rule",
            Rule::Power { .. } => "Power rule",
            Rule::Reciprocal => "Reciprocal rule",
            Rule::Exp => "Exponential rule",
            Rule::ExpBase { .. } => "Exponential rule",
            Rule::Sin => "Sine rule",
            Rule::Cos => "Cosine rule",
            Rule::Tan => "Tangent rule",
            Rule::Arctan { .. } => "Arctangent rule",
            Rule::Arcsin { .. } => "Arcsine rule",
            Rule::QuadraticDenominator { .. } => "Quadratic denominator rule",
            Rule::ConstantTimes { .. } => "Constant multiple rule",
            Rule::Sum { .. } => "Sum rule",
            Rule::Substitution { .. } => "Substitution",
            Rule::Parts { .. } => "Integration by parts",
            Rule::Rewrite { .. } => "Rewrite",
            Rule::PartialFractions { .. } => "Partial fractions",
        }
    }

    /// Immediate sub-derivations.
    pub fn children(&self) -> Vec<&IntegralStep> {
        match &self.rule {
            Rule::ConstantTimes { substep, .. }
            | Rule::Substitution { substep, .. }
            | Rule::Rewrite { substep, .. } => vec![substep.as_ref()],
            Rule::Sum { substeps } | Rule::PartialFractions { substeps, .. } => {
                substeps.iter().collect()
            }
            Rule::Parts {
                v_step,
                second_step,
                ..
            } => vec![v_step.as_ref(), second_step.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Whether any node of the trace uses `pred`.
    pub fn any_rule(&self, pred: &impl Fn(&Rule) -> bool) -> bool {
        pred(&self.rule) || self.children().into_iter().any(|c| c.any_rule(pred))
    }
}
