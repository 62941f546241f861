pub mod message_store;
pub mod pool;

pub use message_store::MessageStore;
pub use pool::create_pool;
