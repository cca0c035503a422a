// producto.rs
use crate::entity_store::Entidad;
use serde::{Deserialize, Serialize};

/// Entrada del historial de precios de compra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecioHistorico {
  pub date: String,
  pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
  pub id: String,
  pub nombre: String,
  pub num_part: String,
  #[serde(default)]
  pub descripcion: String,
  #[serde(default)]
  pub unidad: String,
  pub precio_compra: f64,
  #[serde(default)]
  pub history: Vec<PrecioHistorico>,
}

impl Producto {
  /// Prepara un producto nuevo: si llega sin historial se registra el precio
  /// inicial con la fecha dada.
  pub fn con_historial_inicial(mut self, fecha: &str) -> Self {
    if self.history.is_empty() {
      self.history.push(PrecioHistorico { date: fecha.to_string(), price: self.precio_compra });
    }
    self
  }

  /// Combina la versión almacenada con la versión editada.
  ///
  /// El historial es de sólo-anexar: se conserva el del registro almacenado
  /// (lo que traiga el editado se ignora) y, si el precio de compra cambió,
  /// se agrega una entrada nueva con `fecha`.
  pub fn con_historial_de(mut self, almacenado: &Producto, fecha: &str) -> Self {
    let mut history = almacenado.history.clone();
    if self.precio_compra != almacenado.precio_compra {
      history.push(PrecioHistorico { date: fecha.to_string(), price: self.precio_compra });
    }
    self.history = history;
    self
  }
}

impl Entidad for Producto {
  const CLAVE: &'static str = "hs_productos";

  fn id(&self) -> &str {
    &self.id
  }
}
