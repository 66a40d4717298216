pub mod gateway;
pub mod identity;

pub use gateway::{AuthorizeError, GatewayError, IdentityGateway};
pub use identity::{
    AuthenticatedSession, IdentityError, IdentityProvider, SessionState, UserProfile,
};
