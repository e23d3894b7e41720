//! Account command and query handlers.

mod get_profile;
mod register_user;
mod sign_in;

pub use get_profile::{GetProfileHandler, ProfileView};
pub use register_user::{RegisterUserCommand, RegisterUserHandler};
pub use sign_in::{SignInCommand, SignInHandler, SignInResult};
