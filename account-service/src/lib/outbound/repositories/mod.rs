pub mod user;

pub use user::SqliteUserRepository;
