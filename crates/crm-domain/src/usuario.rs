// usuario.rs
use crate::entity_store::Entidad;
use crate::DomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const PREFIJO_HASH: &str = "sha256:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rol {
  Admin,
  Comercial,
  Logistica,
  Tecnico,
}

/// Conjunto cerrado de módulos de la aplicación. Un usuario sólo ve y opera
/// los módulos presentes en sus `permisos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modulo {
  Dashboard,
  Cotizaciones,
  OrdenesCompra,
  Clientes,
  Productos,
  Proveedores,
  Conductores,
  Logistica,
  Reparaciones,
  Informes,
  Admin,
  Vendedores,
}

impl Modulo {
  /// Todos los módulos en el orden canónico del menú.
  pub const TODOS: [Modulo; 12] = [Modulo::Dashboard,
                                   Modulo::Cotizaciones,
                                   Modulo::OrdenesCompra,
                                   Modulo::Clientes,
                                   Modulo::Productos,
                                   Modulo::Proveedores,
                                   Modulo::Conductores,
                                   Modulo::Logistica,
                                   Modulo::Reparaciones,
                                   Modulo::Informes,
                                   Modulo::Admin,
                                   Modulo::Vendedores];

  pub fn id(&self) -> &'static str {
    match self {
      Modulo::Dashboard => "dashboard",
      Modulo::Cotizaciones => "cotizaciones",
      Modulo::OrdenesCompra => "ordenes-compra",
      Modulo::Clientes => "clientes",
      Modulo::Productos => "productos",
      Modulo::Proveedores => "proveedores",
      Modulo::Conductores => "conductores",
      Modulo::Logistica => "logistica",
      Modulo::Reparaciones => "reparaciones",
      Modulo::Informes => "informes",
      Modulo::Admin => "admin",
      Modulo::Vendedores => "vendedores",
    }
  }

  pub fn etiqueta(&self) -> &'static str {
    match self {
      Modulo::Dashboard => "Dashboard",
      Modulo::Cotizaciones => "Cotizaciones",
      Modulo::OrdenesCompra => "Ordenes de Compra",
      Modulo::Clientes => "Clientes",
      Modulo::Productos => "Productos",
      Modulo::Proveedores => "Proveedores",
      Modulo::Conductores => "Conductores",
      Modulo::Logistica => "Logística",
      Modulo::Reparaciones => "Reparaciones",
      Modulo::Informes => "Informes",
      Modulo::Admin => "Administración",
      Modulo::Vendedores => "Vendedores",
    }
  }
}

impl fmt::Display for Modulo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

impl FromStr for Modulo {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Modulo::TODOS.iter()
                 .copied()
                 .find(|m| m.id() == s)
                 .ok_or_else(|| DomainError::Validacion(format!("módulo desconocido: {}", s)))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUser {
  pub id: String,
  pub nombre: String,
  pub usuario: String,
  #[serde(default)]
  pub cargo: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub telefono: String,
  pub rol: Rol,
  pub permisos: BTreeSet<Modulo>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
}

impl AppUser {
  pub fn es_admin(&self) -> bool {
    self.rol == Rol::Admin
  }

  pub fn tiene_permiso(&self, modulo: Modulo) -> bool {
    self.permisos.contains(&modulo)
  }

  /// Reglas mínimas al crear o editar un usuario.
  pub fn validar(&self) -> Result<(), DomainError> {
    if self.usuario.trim().is_empty() {
      return Err(DomainError::Validacion("el nombre de usuario no puede estar vacío".to_string()));
    }
    Ok(())
  }

  /// Devuelve el usuario con la contraseña en forma de hash. Las contraseñas
  /// que ya están hasheadas se dejan igual.
  pub fn con_password_hasheado(mut self) -> Self {
    if let Some(pw) = self.password.take() {
      self.password = Some(if pw.starts_with(PREFIJO_HASH) { pw } else { hash_password(&pw) });
    }
    self
  }

  /// Comprueba la contraseña. Acepta valores hasheados y valores heredados en
  /// texto plano. Un usuario sin contraseña nunca se autentica.
  pub fn verificar_password(&self, candidata: &str) -> bool {
    match self.password.as_deref() {
      Some(guardada) if guardada.starts_with(PREFIJO_HASH) => guardada == hash_password(candidata),
      Some(guardada) => guardada == candidata,
      None => false,
    }
  }
}

impl Entidad for AppUser {
  const CLAVE: &'static str = "hs_users";

  fn id(&self) -> &str {
    &self.id
  }
}

pub fn hash_password(plain: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(plain.as_bytes());
  format!("{}{:x}", PREFIJO_HASH, hasher.finalize())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn module_ids_parse_back() {
    for m in Modulo::TODOS {
      assert_eq!(m.id().parse::<Modulo>(), Ok(m));
      assert_eq!(serde_json::to_string(&m).unwrap(), format!("\"{}\"", m.id()));
    }
    assert!("bodega".parse::<Modulo>().is_err());
  }

  #[test]
  fn unknown_permission_is_rejected_on_deserialize() {
    let raw = r#"{"id":"2","nombre":"X","usuario":"x","rol":"Comercial","permisos":["dashboard","nomina"]}"#;
    assert!(serde_json::from_str::<AppUser>(raw).is_err());
  }

  #[test]
  fn password_is_hashed_once_and_verifies() {
    let u = AppUser { id: "1".into(),
                      nombre: "Admin".into(),
                      usuario: "admin".into(),
                      cargo: String::new(),
                      email: String::new(),
                      telefono: String::new(),
                      rol: Rol::Admin,
                      permisos: Modulo::TODOS.into_iter().collect(),
                      password: Some("secreto".into()) };
    assert!(u.verificar_password("secreto"));
    let hashed = u.con_password_hasheado();
    let stored = hashed.password.clone().unwrap();
    assert!(stored.starts_with("sha256:"));
    assert!(hashed.verificar_password("secreto"));
    assert!(!hashed.verificar_password("otra"));
    let again = hashed.con_password_hasheado();
    assert_eq!(again.password.as_deref(), Some(stored.as_str()));
  }
}
