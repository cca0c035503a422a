//! crm-persistence: snapshots durables de las colecciones del CRM
//!
//! Cada colección se serializa completa (arreglo JSON de registros planos) y
//! se guarda bajo una clave propia. El contrato es `SnapshotRepository`; hay
//! una implementación en memoria (`InMemorySnapshotRepository`) y otra sobre
//! SQLite con Diesel (`DieselSnapshotRepository`). `PersistenceLayer` añade
//! la carga con semilla de respaldo y los escalares de sesión.

pub mod errors;
mod layer;
pub mod repository;
pub mod schema;
mod snapshot_persistence;
pub mod stubs;

pub use errors::{PersistenceError, Result};
pub use layer::{PersistenceLayer, Sesion, CLAVE_SESION_ACTIVA, CLAVE_USUARIO_ACTUAL};
pub use repository::SnapshotRepository;
pub use snapshot_persistence::{new_from_env, DieselSnapshotRepository};
pub use stubs::InMemorySnapshotRepository;
