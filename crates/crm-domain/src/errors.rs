// errors.rs
use crate::usuario::Modulo;
use thiserror::Error;

/// Errores del dominio operativo. Todos representan una operación rechazada;
/// el estado queda sin cambios cuando se devuelven.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
  #[error("Ya existe un registro con id {0}")]
  IdDuplicado(String),
  #[error("No puedes eliminar tu propio usuario.")]
  AutoEliminacion,
  #[error("Debe existir al menos un usuario Admin")]
  UltimoAdministrador,
  #[error("Ya existe un presupuesto para el usuario {usuario_id} en {anio}-{mes}")]
  PresupuestoDuplicado { usuario_id: String, anio: i32, mes: u32 },
  #[error("Error de validación: {0}")]
  Validacion(String),
  #[error("Acceso denegado al módulo {0}")]
  AccesoDenegado(Modulo),
  #[error("Usuario o contraseña incorrectos")]
  CredencialesInvalidas,
  #[error("No hay una sesión activa")]
  SinSesion,
  #[error("Error de serialización: {0}")]
  Serializacion(String),
}

impl From<serde_json::Error> for DomainError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serializacion(e.to_string())
  }
}
