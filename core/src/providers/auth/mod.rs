//! Identity provider interface module.

mod r#trait;
pub use r#trait::{AuthProvider, CodeDelivery};

mod mock;
pub use mock::{CodeRequest, MockAuthProvider};
