pub mod service_account;

pub use service_account::{ServiceAccountAuth, StaticTokenAuth};
