use derive_more::Display;

/// Access-control tier of a URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RouteClass {
    #[display("public")]
    Public,
    #[display("protected")]
    Protected,
    #[display("admin-only")]
    AdminOnly,
}

impl RouteClass {
    /// Protected and AdminOnly paths need a valid session.
    #[inline]
    pub const fn requires_session(&self) -> bool {
        matches!(self, RouteClass::Protected | RouteClass::AdminOnly)
    }
}
