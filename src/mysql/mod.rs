pub mod connection;

pub use connection::MySqlConnection;
