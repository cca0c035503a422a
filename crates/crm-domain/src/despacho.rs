// despacho.rs
use crate::entity_store::{Entidad, OrdenInsercion, Propietario};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoDespacho {
  Pendiente,
  Preparando,
  Despachado,
  Entregado,
  #[serde(rename = "Entrega Parcial")]
  EntregaParcial,
}

impl EstadoDespacho {
  pub const TODOS: [EstadoDespacho; 5] = [EstadoDespacho::Pendiente,
                                          EstadoDespacho::Preparando,
                                          EstadoDespacho::Despachado,
                                          EstadoDespacho::Entregado,
                                          EstadoDespacho::EntregaParcial];

  pub fn as_str(&self) -> &'static str {
    match self {
      EstadoDespacho::Pendiente => "Pendiente",
      EstadoDespacho::Preparando => "Preparando",
      EstadoDespacho::Despachado => "Despachado",
      EstadoDespacho::Entregado => "Entregado",
      EstadoDespacho::EntregaParcial => "Entrega Parcial",
    }
  }
}

impl fmt::Display for EstadoDespacho {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DespachoItem {
  pub producto_id: String,
  pub nombre_producto: String,
  pub num_part: String,
  pub cantidad: f64,
}

/// Despacho logístico. Sólo lo crea la regla de cotización ganada; la
/// colección guarda el más reciente primero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Despacho {
  pub id: String,
  pub cotizacion_id: String,
  pub consecutivo_cotizacion: String,
  pub fecha_solicitud: String,
  pub cliente_id: String,
  pub cliente_nombre: String,
  pub direccion: String,
  #[serde(default)]
  pub items: Vec<DespachoItem>,
  pub total: f64,
  #[serde(default)]
  pub ejecutivo_email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ejecutivo_telefono: Option<String>,
  pub usuario_id: String,
  pub estado: EstadoDespacho,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub conductor_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub conductor_nombre: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub foto_entrega: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub foto_remision: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub georeferencia: Option<String>,
}

impl Despacho {
  pub fn esta_entregado(&self) -> bool {
    self.estado == EstadoDespacho::Entregado
  }
}

impl Entidad for Despacho {
  const CLAVE: &'static str = "hs_despachos";
  const ORDEN: OrdenInsercion = OrdenInsercion::AlInicio;

  fn id(&self) -> &str {
    &self.id
  }
}

impl Propietario for Despacho {
  fn usuario_id(&self) -> &str {
    &self.usuario_id
  }
}
