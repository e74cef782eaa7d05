pub mod chat;
pub mod request;
pub mod response;
pub mod stage;

pub use chat::*;
pub use request::*;
pub use response::*;
pub use stage::*;
