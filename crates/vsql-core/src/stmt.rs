mod check;
pub use check::check_valid;

mod color;
pub use color::Color;

mod expr;
pub use expr::Expr;

mod expr_attr;
pub use expr_attr::ExprAttr;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_bool_op;
pub use expr_bool_op::ExprBoolOp;

mod expr_call;
pub use expr_call::ExprCall;

mod expr_compare;
pub use expr_compare::ExprCompare;

mod expr_field;
pub use expr_field::ExprField;

mod expr_if;
pub use expr_if::ExprIf;

mod expr_item;
pub use expr_item::ExprItem;

mod expr_list;
pub use expr_list::ExprList;

mod expr_meth;
pub use expr_meth::ExprMeth;

mod expr_slice;
pub use expr_slice::ExprSlice;

mod expr_unary_op;
pub use expr_unary_op::ExprUnaryOp;

mod expr_var;
pub use expr_var::ExprVar;

mod func;
pub use func::{Attribute, Func, Meth};

mod join;
pub use join::{Alias, Join, JoinKind, Joins};

mod op_binary;
pub use op_binary::BinaryOp;

mod op_bool;
pub use op_bool::BoolOp;

mod op_compare;
pub use op_compare::CompareOp;

mod op_unary;
pub use op_unary::UnaryOp;

mod query;
pub use query::{Frozen, OrderByExpr, Query, SelectItem};

mod render;
pub use render::{Generator, Rendered};

mod resolve;
pub use resolve::resolve;

mod source;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod walk;
pub use walk::WalkNodes;
