use crate::{
    error::InternalError,
    query::{
        expr::{
            SqmAttributeReference, SqmExpression, SqmFunction, SqmLiteral, SqmParameter, SqmStar,
        },
        walker::SemanticQueryWalker,
    },
    value::ValueKind,
};

///
/// ExpressionTypeResolver
///
/// Resolves the result type of an expression from its context. `*` has no
/// type of its own and is accepted only as the argument of `count`.
/// `Ok(None)` means the type is not known yet (null literal, untyped
/// parameter, bare star).
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionTypeResolver;

impl ExpressionTypeResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub fn resolve(
        &mut self,
        expression: &SqmExpression,
    ) -> Result<Option<ValueKind>, InternalError> {
        expression.accept(self)
    }

    fn single_argument(function: &SqmFunction) -> Result<&SqmExpression, InternalError> {
        match function.arguments() {
            [argument] => Ok(argument),
            arguments => Err(InternalError::query_unsupported(format!(
                "function '{}' takes 1 argument, found {}",
                function.name(),
                arguments.len()
            ))),
        }
    }
}

impl SemanticQueryWalker for ExpressionTypeResolver {
    type Output = Result<Option<ValueKind>, InternalError>;

    fn visit_star(&mut self, _: &SqmStar) -> Self::Output {
        Ok(None)
    }

    fn visit_literal(&mut self, literal: &SqmLiteral) -> Self::Output {
        Ok(literal.expressable_type())
    }

    fn visit_attribute_reference(&mut self, reference: &SqmAttributeReference) -> Self::Output {
        Ok(reference.expressable_type())
    }

    fn visit_parameter(&mut self, parameter: &SqmParameter) -> Self::Output {
        Ok(parameter.expressable_type())
    }

    fn visit_function(&mut self, function: &SqmFunction) -> Self::Output {
        let name = function.name().to_ascii_lowercase();

        if name == "count" {
            Self::single_argument(function)?.accept(self)?;
            return Ok(Some(ValueKind::Int));
        }

        if function.arguments().iter().any(SqmExpression::is_star) {
            return Err(InternalError::query_unsupported(format!(
                "'*' is not a valid argument of function '{}'",
                function.name()
            )));
        }

        let mut argument_types = Vec::with_capacity(function.arguments().len());
        for argument in function.arguments() {
            argument_types.push(argument.accept(self)?);
        }

        if let Some(kind) = function.expressable_type() {
            return Ok(Some(kind));
        }

        match name.as_str() {
            "avg" => {
                Self::single_argument(function)?;
                Ok(Some(ValueKind::Float64))
            }
            "sum" | "min" | "max" => {
                Self::single_argument(function)?;
                Ok(argument_types[0])
            }
            "length" => {
                Self::single_argument(function)?;
                Ok(Some(ValueKind::Int))
            }
            "lower" | "upper" => {
                Self::single_argument(function)?;
                Ok(Some(ValueKind::Text))
            }
            "concat" => Ok(Some(ValueKind::Text)),
            _ => Err(InternalError::query_unsupported(format!(
                "function '{}' has no declared return type",
                function.name()
            ))),
        }
    }
}

///
/// TESTS
///
