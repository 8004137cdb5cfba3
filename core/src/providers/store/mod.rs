//! User record store seam.

mod r#trait;
pub use r#trait::UserStore;

mod mock;
pub use mock::InMemoryUserStore;
