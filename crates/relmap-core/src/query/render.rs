use crate::query::{
    expr::{SqmAttributeReference, SqmFunction, SqmLiteral, SqmParameter, SqmStar},
    walker::SemanticQueryWalker,
};

///
/// ExpressionRenderer
/// Query-text form of an expression, for diagnostics and plan explain output.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionRenderer;

impl SemanticQueryWalker for ExpressionRenderer {
    type Output = String;

    fn visit_star(&mut self, _: &SqmStar) -> String {
        "*".to_string()
    }

    fn visit_literal(&mut self, literal: &SqmLiteral) -> String {
        literal.value().to_string()
    }

    fn visit_attribute_reference(&mut self, reference: &SqmAttributeReference) -> String {
        reference.path().full_path().to_string()
    }

    fn visit_parameter(&mut self, parameter: &SqmParameter) -> String {
        parameter.label().to_string()
    }

    fn visit_function(&mut self, function: &SqmFunction) -> String {
        let arguments = function
            .arguments()
            .iter()
            .map(|argument| argument.accept(self))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}({arguments})", function.name())
    }
}

///
/// TESTS
///
