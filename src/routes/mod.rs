/// Router Module Index
///
/// Routing split by access level so the identity layer is applied per module rather than
/// per route.

/// Routes accessible without an identity.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
pub mod authenticated;
