use crate::errors::Result;
use crate::repository::SnapshotRepository;
use crm_domain::{AppUser, Entidad, EntityStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Clave del indicador de sesión iniciada (`"true"` / `"false"`).
pub const CLAVE_SESION_ACTIVA: &str = "hs_is_logged_in";
/// Clave de la copia desnormalizada del usuario actual.
pub const CLAVE_USUARIO_ACTUAL: &str = "hs_current_user";

/// Estado de sesión persistido junto a las colecciones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sesion {
  pub activa: bool,
  pub usuario: Option<AppUser>,
}

/// Capa de persistencia: carga cada colección una vez al arrancar y la
/// reescribe completa después de cada mutación.
#[derive(Clone)]
pub struct PersistenceLayer {
  repo: Arc<dyn SnapshotRepository>,
}

impl PersistenceLayer {
  pub fn new(repo: Arc<dyn SnapshotRepository>) -> Self {
    Self { repo }
  }

  /// Lee y deserializa una clave. Clave ausente o JSON inválido devuelven
  /// `Ok(None)`; un fallo del backend se propaga y nunca se siembra encima.
  fn leer_json<T: DeserializeOwned>(&self, clave: &str) -> Result<Option<T>> {
    let Some(raw) = self.repo.leer(clave)? else {
      log::debug!("snapshot {} ausente", clave);
      return Ok(None);
    };
    match serde_json::from_str(&raw) {
      Ok(v) => Ok(Some(v)),
      Err(e) => {
        log::warn!("snapshot {} malformado, se ignora: {}", clave, e);
        Ok(None)
      }
    }
  }

  /// Carga el almacén del tipo `T`. Si el snapshot falta o está malformado se
  /// usa `semilla`.
  pub fn cargar<T, F>(&self, semilla: F) -> Result<EntityStore<T>>
    where T: Entidad,
          F: FnOnce() -> Vec<T>
  {
    match self.leer_json::<Vec<T>>(T::CLAVE)? {
      Some(items) => Ok(EntityStore::from_vec(items)),
      None => {
        log::info!("usando datos semilla para {}", T::CLAVE);
        Ok(EntityStore::from_vec(semilla()))
      }
    }
  }

  /// Serializa el almacén completo y lo escribe bajo su clave.
  pub fn guardar<T: Entidad>(&self, store: &EntityStore<T>) -> Result<()> {
    self.guardar_items(T::CLAVE, store.list())
  }

  fn guardar_items<T: Serialize>(&self, clave: &str, items: &[T]) -> Result<()> {
    let payload = serde_json::to_string(items)?;
    self.repo.escribir(clave, &payload)
  }

  /// Carga la sesión. El usuario actual sólo se restaura si su copia es
  /// legible; si no, queda `None` y el llamador decide el respaldo.
  pub fn cargar_sesion(&self) -> Result<Sesion> {
    let activa = self.repo.leer(CLAVE_SESION_ACTIVA)?.is_some_and(|v| v == "true");
    let usuario = self.leer_json::<AppUser>(CLAVE_USUARIO_ACTUAL)?;
    Ok(Sesion { activa, usuario })
  }

  pub fn guardar_sesion(&self, sesion: &Sesion) -> Result<()> {
    self.repo.escribir(CLAVE_SESION_ACTIVA, if sesion.activa { "true" } else { "false" })?;
    match &sesion.usuario {
      Some(u) => self.repo.escribir(CLAVE_USUARIO_ACTUAL, &serde_json::to_string(u)?),
      None => self.repo.eliminar(CLAVE_USUARIO_ACTUAL),
    }
  }
}
