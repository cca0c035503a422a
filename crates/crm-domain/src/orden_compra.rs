// orden_compra.rs
use crate::entity_store::{Entidad, Propietario};
use crate::totales::{Totales, IVA_ORDEN_COMPRA};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoOrdenCompra {
  Pendiente,
  Recogido,
  #[serde(rename = "En Bodega")]
  EnBodega,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdenCompraItem {
  pub id: String,
  pub producto_id: String,
  pub nombre_producto: String,
  pub num_part: String,
  pub cantidad: f64,
  pub precio_unitario: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdenCompra {
  pub id: String,
  pub consecutivo: String,
  pub fecha: String,
  pub proveedor_id: String,
  pub nombre_proveedor: String,
  #[serde(default)]
  pub items: Vec<OrdenCompraItem>,
  #[serde(default)]
  pub subtotal: f64,
  #[serde(default)]
  pub iva: f64,
  #[serde(default)]
  pub total: f64,
  #[serde(default)]
  pub condiciones_comerciales: String,
  #[serde(default)]
  pub observaciones: String,
  pub estado: EstadoOrdenCompra,
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
  pub usuario_id: String,
}

impl OrdenCompra {
  pub fn calcular_totales(&self) -> Totales {
    Totales::desde_lineas(self.items.iter().map(|it| (it.cantidad * it.precio_unitario, IVA_ORDEN_COMPRA)))
  }

  pub fn con_totales(mut self) -> Self {
    let t = self.calcular_totales();
    self.subtotal = t.subtotal;
    self.iva = t.iva;
    self.total = t.total;
    self
  }
}

impl Entidad for OrdenCompra {
  const CLAVE: &'static str = "hs_ordenes_compra";

  fn id(&self) -> &str {
    &self.id
  }
}

impl Propietario for OrdenCompra {
  fn usuario_id(&self) -> &str {
    &self.usuario_id
  }
}
