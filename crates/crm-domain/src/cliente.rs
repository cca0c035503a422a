// cliente.rs
use crate::entity_store::Entidad;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
  pub id: String,
  pub nombre: String,
  pub nit: String,
  pub contacto: String,
  pub telefono: String,
  pub correo: String,
  pub direccion: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub coordenadas: Option<String>,
}

impl Entidad for Cliente {
  const CLAVE: &'static str = "hs_clientes";

  fn id(&self) -> &str {
    &self.id
  }
}
