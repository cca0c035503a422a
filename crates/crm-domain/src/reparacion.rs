// reparacion.rs
use crate::entity_store::Entidad;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoReparacion {
  Recibido,
  #[serde(rename = "En Diagnóstico")]
  EnDiagnostico,
  #[serde(rename = "En Reparación")]
  EnReparacion,
  #[serde(rename = "Esperando Repuestos")]
  EsperandoRepuestos,
  Reparado,
  Entregado,
  Cerrado,
}

/// Quién atiende el servicio: el taller propio o un proveedor externo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipoServicio {
  #[serde(rename = "HELP SOLUCIONES")]
  Interno,
  Proveedor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reparacion {
  pub id: String,
  pub consecutivo: String,
  pub cliente_id: String,
  pub cliente_nombre: String,
  #[serde(default)]
  pub marca: String,
  #[serde(default)]
  pub tipo: String,
  #[serde(default)]
  pub serial: String,
  #[serde(default)]
  pub observaciones: String,
  pub estado: EstadoReparacion,
  pub tipo_servicio: TipoServicio,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub proveedor_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub proveedor_nombre: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub foto: Option<String>,
  pub fecha_ingreso: String,
}

impl Entidad for Reparacion {
  const CLAVE: &'static str = "hs_reparaciones";

  fn id(&self) -> &str {
    &self.id
  }
}
