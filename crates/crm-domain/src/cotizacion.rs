// cotizacion.rs
use crate::entity_store::{Entidad, Propietario};
use crate::totales::Totales;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoCotizacion {
  Seguimiento,
  Ganado,
  Perdido,
}

impl fmt::Display for EstadoCotizacion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      EstadoCotizacion::Seguimiento => "Seguimiento",
      EstadoCotizacion::Ganado => "Ganado",
      EstadoCotizacion::Perdido => "Perdido",
    };
    f.write_str(s)
  }
}

/// Línea de cotización. `utilidad` e `iva` son porcentajes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CotizacionItem {
  pub id: String,
  pub producto_id: String,
  pub proveedor_id: String,
  #[serde(default)]
  pub unidad: String,
  pub cantidad: f64,
  pub costo_unitario: f64,
  pub utilidad: f64,
  pub iva: f64,
}

impl CotizacionItem {
  /// Precio de venta unitario: costo más el margen de utilidad.
  pub fn precio_venta(&self) -> f64 {
    self.costo_unitario * (1.0 + self.utilidad / 100.0)
  }

  pub fn subtotal(&self) -> f64 {
    self.cantidad * self.precio_venta()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cotizacion {
  pub id: String,
  /// Fecha de creación `YYYY-MM-DD`.
  pub fecha: String,
  pub cliente_id: String,
  pub cliente_nombre: String,
  pub consecutivo: String,
  #[serde(default)]
  pub items: Vec<CotizacionItem>,
  #[serde(default)]
  pub subtotal: f64,
  #[serde(default)]
  pub iva: f64,
  #[serde(default)]
  pub total: f64,
  #[serde(default)]
  pub ejecutivo: String,
  #[serde(default)]
  pub ejecutivo_email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ejecutivo_telefono: Option<String>,
  pub usuario_id: String,
  pub estado: EstadoCotizacion,
}

impl Cotizacion {
  pub fn calcular_totales(&self) -> Totales {
    Totales::desde_lineas(self.items.iter().map(|it| (it.subtotal(), it.iva)))
  }

  /// Devuelve la cotización con `subtotal`, `iva` y `total` derivados de sus
  /// líneas.
  pub fn con_totales(mut self) -> Self {
    let t = self.calcular_totales();
    self.subtotal = t.subtotal;
    self.iva = t.iva;
    self.total = t.total;
    self
  }

  pub fn es_ganada(&self) -> bool {
    self.estado == EstadoCotizacion::Ganado
  }
}

impl Entidad for Cotizacion {
  const CLAVE: &'static str = "hs_cotizaciones";

  fn id(&self) -> &str {
    &self.id
  }
}

impl Propietario for Cotizacion {
  fn usuario_id(&self) -> &str {
    &self.usuario_id
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(cantidad: f64, costo: f64, utilidad: f64, iva: f64) -> CotizacionItem {
    CotizacionItem { id: "i".into(),
                     producto_id: "1".into(),
                     proveedor_id: "1".into(),
                     unidad: "Und".into(),
                     cantidad,
                     costo_unitario: costo,
                     utilidad,
                     iva }
  }

  #[test]
  fn totals_are_derived_from_items() {
    let c = Cotizacion { id: "c1".into(),
                         fecha: "2024-03-10".into(),
                         cliente_id: "1".into(),
                         cliente_nombre: "Help".into(),
                         consecutivo: "COT-001".into(),
                         items: vec![item(2.0, 100.0, 20.0, 19.0), item(1.0, 50.0, 0.0, 0.0)],
                         subtotal: 999.0,
                         iva: 999.0,
                         total: 1.0,
                         ejecutivo: "Ana".into(),
                         ejecutivo_email: "ana@x.co".into(),
                         ejecutivo_telefono: None,
                         usuario_id: "1".into(),
                         estado: EstadoCotizacion::Seguimiento }.con_totales();
    assert!((c.subtotal - 290.0).abs() < 1e-9);
    assert!((c.iva - 45.6).abs() < 1e-9);
    assert_eq!(c.total, c.subtotal + c.iva);
  }

  #[test]
  fn empty_quote_has_zero_totals() {
    let t = Totales::desde_lineas(Vec::<(f64, f64)>::new());
    assert_eq!(t, Totales::default());
  }
}
