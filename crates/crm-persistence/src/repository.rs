// Archivo: repository.rs
// Propósito: contrato clave/valor del almacenamiento durable. Cada colección
// se guarda completa bajo su propia clave; no hay escrituras incrementales.
use crate::errors::Result;

pub trait SnapshotRepository: Send + Sync {
  /// Lee el payload guardado bajo `clave`, o `None` si no existe.
  fn leer(&self, clave: &str) -> Result<Option<String>>;

  /// Reemplaza por completo el payload guardado bajo `clave`.
  fn escribir(&self, clave: &str, payload: &str) -> Result<()>;

  /// Elimina la clave. No falla si no existía.
  fn eliminar(&self, clave: &str) -> Result<()>;
}
