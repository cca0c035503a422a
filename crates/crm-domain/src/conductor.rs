// conductor.rs
use crate::entity_store::Entidad;
use serde::{Deserialize, Serialize};

/// Conductor asignable a despachos y a recogidas de órdenes de compra.
///
/// Los documentos del vehículo se guardan como nombre de archivo o Base64;
/// su carga está fuera de este crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conductor {
  pub id: String,
  pub nombre: String,
  pub cedula: String,
  pub telefono: String,
  pub placa_vehiculo: String,
  pub modelo_vehiculo: String,
  pub tipo_vehiculo: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tarjeta_propiedad: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub soat: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tecnomecanica: Option<String>,
}

impl Entidad for Conductor {
  const CLAVE: &'static str = "hs_conductores";

  fn id(&self) -> &str {
    &self.id
  }
}
