use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};

/// Case-insensitive "contains" predicate on a text column.
pub fn icontains<C: IntoColumnRef>(col: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(format!("%{}%", needle.to_lowercase()))
}
