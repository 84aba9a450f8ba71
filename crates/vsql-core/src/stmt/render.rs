use super::{Frozen, Value};
use crate::Result;

/// Source text produced by a [`Generator`], with its bind parameters in
/// placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub params: Vec<Value>,
}

/// Turns a frozen query into source text for one target.
///
/// Generators never inline values taken from expressions: every literal and
/// every value-sourced variable is returned as a bind parameter.
pub trait Generator {
    fn render(&self, query: &Frozen<'_>) -> Result<Rendered>;
}
