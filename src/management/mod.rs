mod session;
mod store;

pub use session::PROPERTY_COOKIE;
pub use session::PROPERTY_PASSWORD;
pub use session::PROPERTY_USERNAME;
pub use session::SessionManager;
pub use store::PropertyStore;
