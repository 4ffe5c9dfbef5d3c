//! Record store substrate for the campus platform.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and the embedded SQL migrations that create every table the catalog and
//! enrollment crates read and write.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: a single-server school administration service
//!   needs no external database process. WAL mode allows concurrent readers
//!   with a single writer, which matches the read-heavy access pattern of
//!   course listings.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server and cannot drift
//!   from the code that depends on it.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
