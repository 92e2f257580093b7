mod connection;

pub use connection::InMemoryConnectionRegistry;
