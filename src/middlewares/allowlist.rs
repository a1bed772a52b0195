//! Route names reachable without authentication or an active subscription.

/// One allowlist entry, matched against the resolved route name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteExemption {
    /// The route name must equal this value.
    Exact(&'static str),
    /// Every route in the namespace; the prefix ends with `:`.
    Namespace(&'static str),
}

impl RouteExemption {
    pub fn matches(&self, route_name: &str) -> bool {
        match self {
            RouteExemption::Exact(name) => route_name == *name,
            RouteExemption::Namespace(prefix) => route_name.starts_with(prefix),
        }
    }
}

/// Immutable table of exemptions, built once and only ever read.
#[derive(Debug, Clone, Copy)]
pub struct Allowlist {
    entries: &'static [RouteExemption],
}

impl Allowlist {
    pub const fn new(entries: &'static [RouteExemption]) -> Self {
        Self { entries }
    }

    pub fn is_exempt(&self, route_name: &str) -> bool {
        self.entries.iter().any(|e| e.matches(route_name))
    }

    pub fn entries(&self) -> &'static [RouteExemption] {
        self.entries
    }
}

pub static DEFAULT_ALLOWLIST: Allowlist = Allowlist::new(&[
    RouteExemption::Exact("register"),
    RouteExemption::Exact("token_obtain_pair"),
    RouteExemption::Exact("token_refresh"),
    RouteExemption::Exact("token_verify"),
    RouteExemption::Exact("v1:tariff:tariff-list-create"),
    RouteExemption::Exact("v1:subscriptions:subscriptions-list-create"),
    RouteExemption::Exact("swagger-ui"),
    RouteExemption::Exact("schema"),
    RouteExemption::Namespace("v1:users:"),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names() {
        assert!(DEFAULT_ALLOWLIST.is_exempt("register"));
        assert!(DEFAULT_ALLOWLIST.is_exempt("v1:tariff:tariff-list-create"));
        assert!(!DEFAULT_ALLOWLIST.is_exempt("v1:tariff:tariff-detail-actions"));
        assert!(!DEFAULT_ALLOWLIST.is_exempt("registe"));
    }

    #[test]
    fn test_docs_entries_match_registered_names() {
        assert!(DEFAULT_ALLOWLIST.is_exempt("swagger-ui"));
        assert!(DEFAULT_ALLOWLIST.is_exempt("schema"));
        assert!(!DEFAULT_ALLOWLIST.is_exempt("redoc"));
    }

    #[test]
    fn test_namespace_prefix() {
        assert!(DEFAULT_ALLOWLIST.is_exempt("v1:users:users-list"));
        assert!(DEFAULT_ALLOWLIST.is_exempt("v1:users:hard-delete-user"));
        assert!(!DEFAULT_ALLOWLIST.is_exempt("v1:users"));
        assert!(!DEFAULT_ALLOWLIST.is_exempt("v1:orders:orders-list-create"));
    }

    #[test]
    fn test_custom_table() {
        static ONLY_DOCS: Allowlist = Allowlist::new(&[RouteExemption::Namespace("docs:")]);
        assert!(ONLY_DOCS.is_exempt("docs:index"));
        assert!(!ONLY_DOCS.is_exempt("register"));
        assert_eq!(ONLY_DOCS.entries().len(), 1);
    }
}
