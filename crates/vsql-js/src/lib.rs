mod emitter;
pub use emitter::Emitter;

mod json;
pub use json::to_json;

/// Helpers every emitted function declares before its body, bound to `$`.
///
/// They implement the NULL semantics of the SQL generators: comparisons and
/// arithmetic involving NULL yield NULL, `==` and `!=` treat NULL as a value,
/// `and` / `or` use three-valued logic.
pub const PRELUDE: &str = include_str!("prelude.js");
