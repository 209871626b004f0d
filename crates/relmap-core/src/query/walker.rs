use crate::query::expr::{SqmAttributeReference, SqmFunction, SqmLiteral, SqmParameter, SqmStar};

///
/// SemanticQueryWalker
///
/// Double-dispatch target for expression nodes. There are no default
/// methods: a walker must handle every node kind. Walkers decide for
/// themselves whether to descend into function arguments.
///

pub trait SemanticQueryWalker {
    type Output;

    fn visit_star(&mut self, star: &SqmStar) -> Self::Output;

    fn visit_literal(&mut self, literal: &SqmLiteral) -> Self::Output;

    fn visit_attribute_reference(&mut self, reference: &SqmAttributeReference) -> Self::Output;

    fn visit_parameter(&mut self, parameter: &SqmParameter) -> Self::Output;

    fn visit_function(&mut self, function: &SqmFunction) -> Self::Output;
}

///
/// TESTS
///
