// proveedor.rs
use crate::entity_store::Entidad;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proveedor {
  pub id: String,
  pub nombre: String,
  pub nit: String,
  pub contacto: String,
  pub telefono: String,
  pub correo: String,
  pub direccion: String,
  #[serde(default)]
  pub coordenadas: String,
}

impl Entidad for Proveedor {
  const CLAVE: &'static str = "hs_proveedores";

  fn id(&self) -> &str {
    &self.id
  }
}
