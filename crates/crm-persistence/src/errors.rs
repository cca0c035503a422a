// Archivo: errors.rs
// Propósito: errores de la capa de persistencia de snapshots.
use thiserror::Error;

/// Errores al leer o escribir snapshots.
///
/// - `Almacenamiento`: fallo del backend (BD, pool, mutex).
/// - `Serializacion`: la colección no se pudo convertir a JSON.
/// - `Configuracion`: variables de entorno ausentes o inválidas.
#[derive(Error, Debug)]
pub enum PersistenceError {
  #[error("Error de almacenamiento: {0}")]
  Almacenamiento(String),
  #[error("Error de serialización: {0}")]
  Serializacion(#[from] serde_json::Error),
  #[error("Error de configuración: {0}")]
  Configuracion(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, PersistenceError>;
