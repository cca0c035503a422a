// Archivo: stubs.rs
// Propósito: repositorio de snapshots en memoria para pruebas y demos. No es
// durable.
use crate::errors::{PersistenceError, Result};
use crate::repository::SnapshotRepository;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository {
  entradas: Mutex<HashMap<String, String>>,
}

impl InMemorySnapshotRepository {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
    self.entradas
        .lock()
        .map_err(|e| PersistenceError::Almacenamiento(format!("mutex poisoned: {:?}", e)))
  }

  /// Número de claves guardadas.
  pub fn len(&self) -> usize {
    self.entradas.lock().map(|m| m.len()).unwrap_or_else(|e| e.into_inner().len())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl SnapshotRepository for InMemorySnapshotRepository {
  fn leer(&self, clave: &str) -> Result<Option<String>> {
    Ok(self.lock()?.get(clave).cloned())
  }

  fn escribir(&self, clave: &str, payload: &str) -> Result<()> {
    self.lock()?.insert(clave.to_string(), payload.to_string());
    Ok(())
  }

  fn eliminar(&self, clave: &str) -> Result<()> {
    self.lock()?.remove(clave);
    Ok(())
  }
}
