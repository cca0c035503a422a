use crate::DomainError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Registro persistible con identificador inmutable.
///
/// Cada tipo de entidad declara la clave bajo la que se guarda su colección
/// completa y la política de inserción de su almacén.
pub trait Entidad: Clone + Serialize + DeserializeOwned {
  /// Clave del snapshot de la colección en el almacenamiento durable.
  const CLAVE: &'static str;
  /// Política de inserción del almacén de este tipo.
  const ORDEN: OrdenInsercion = OrdenInsercion::AlFinal;

  fn id(&self) -> &str;
}

/// Registros que pertenecen a un usuario (filtrados por rol).
pub trait Propietario {
  fn usuario_id(&self) -> &str;
}

/// Dónde se inserta un registro nuevo dentro de la colección ordenada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdenInsercion {
  /// Se agrega al final: el último elemento es el más reciente.
  AlFinal,
  /// Se agrega al inicio: el primer elemento es el más reciente.
  AlInicio,
}

/// Colección ordenada de entidades con CRUD por id.
///
/// `update` y `delete` son totales: si el id no existe no hacen nada. Sólo
/// `add` falla, cuando el id ya está en uso.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T: Entidad> {
  items: Vec<T>,
}

impl<T: Entidad> EntityStore<T> {
  pub fn new() -> Self {
    Self { items: Vec::new() }
  }

  /// Construye el almacén a partir de una colección ya ordenada (por ejemplo
  /// un snapshot cargado). El orden se respeta tal cual.
  pub fn from_vec(items: Vec<T>) -> Self {
    Self { items }
  }

  pub fn add(&mut self, item: T) -> Result<(), DomainError> {
    if self.contains(item.id()) {
      return Err(DomainError::IdDuplicado(item.id().to_string()));
    }
    match T::ORDEN {
      OrdenInsercion::AlFinal => self.items.push(item),
      OrdenInsercion::AlInicio => self.items.insert(0, item),
    }
    Ok(())
  }

  /// Reemplaza el registro completo con el mismo id. Devuelve `false` si no
  /// había coincidencia.
  pub fn update(&mut self, item: T) -> bool {
    match self.items.iter_mut().find(|it| it.id() == item.id()) {
      Some(slot) => {
        *slot = item;
        true
      }
      None => false,
    }
  }

  /// Elimina la primera coincidencia y la devuelve.
  pub fn delete(&mut self, id: &str) -> Option<T> {
    let pos = self.items.iter().position(|it| it.id() == id)?;
    Some(self.items.remove(pos))
  }

  pub fn list(&self) -> &[T] {
    &self.items
  }

  pub fn get(&self, id: &str) -> Option<&T> {
    self.items.iter().find(|it| it.id() == id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.get(id).is_some()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Los `n` registros insertados más recientemente, el más reciente primero.
  pub fn recientes(&self, n: usize) -> Vec<&T> {
    match T::ORDEN {
      OrdenInsercion::AlFinal => self.items.iter().rev().take(n).collect(),
      OrdenInsercion::AlInicio => self.items.iter().take(n).collect(),
    }
  }
}

impl<T: Entidad> Default for EntityStore<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Cliente, Despacho, EstadoDespacho};

  fn cliente(id: &str, nombre: &str) -> Cliente {
    Cliente { id: id.into(),
              nombre: nombre.into(),
              nit: "900".into(),
              contacto: "c".into(),
              telefono: "300".into(),
              correo: "c@x.co".into(),
              direccion: "Calle 1".into(),
              coordenadas: None }
  }

  fn despacho(id: &str) -> Despacho {
    Despacho { id: id.into(),
               cotizacion_id: format!("cot-{}", id),
               consecutivo_cotizacion: "COT-1".into(),
               fecha_solicitud: "2024-03-01".into(),
               cliente_id: "1".into(),
               cliente_nombre: "Cliente".into(),
               direccion: "N/A".into(),
               items: vec![],
               total: 0.0,
               ejecutivo_email: String::new(),
               ejecutivo_telefono: None,
               usuario_id: "1".into(),
               estado: EstadoDespacho::Pendiente,
               conductor_id: None,
               conductor_nombre: None,
               foto_entrega: None,
               foto_remision: None,
               georeferencia: None }
  }

  #[test]
  fn add_rejects_duplicate_id() -> Result<(), DomainError> {
    let mut store = EntityStore::new();
    store.add(cliente("1", "A"))?;
    let err = store.add(cliente("1", "B")).unwrap_err();
    assert_eq!(err, DomainError::IdDuplicado("1".into()));
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].nombre, "A");
    Ok(())
  }

  #[test]
  fn update_and_delete_are_noops_when_missing() -> Result<(), DomainError> {
    let mut store = EntityStore::new();
    store.add(cliente("1", "A"))?;
    assert!(!store.update(cliente("2", "X")));
    assert!(store.delete("2").is_none());
    assert_eq!(store.list(), &[cliente("1", "A")]);

    assert!(store.update(cliente("1", "Z")));
    assert_eq!(store.get("1").map(|c| c.nombre.as_str()), Some("Z"));
    assert!(store.delete("1").is_some());
    assert!(store.is_empty());
    Ok(())
  }

  #[test]
  fn append_store_keeps_insertion_order() -> Result<(), DomainError> {
    let mut store = EntityStore::new();
    for i in 1..=4 {
      store.add(cliente(&i.to_string(), "c"))?;
    }
    let ids: Vec<&str> = store.list().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    let recientes: Vec<&str> = store.recientes(3).iter().map(|c| c.id.as_str()).collect();
    assert_eq!(recientes, vec!["4", "3", "2"]);
    Ok(())
  }

  #[test]
  fn despacho_store_inserts_at_head() -> Result<(), DomainError> {
    let mut store = EntityStore::new();
    store.add(despacho("a"))?;
    store.add(despacho("b"))?;
    store.add(despacho("c"))?;
    let ids: Vec<&str> = store.list().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    let recientes: Vec<&str> = store.recientes(2).iter().map(|d| d.id.as_str()).collect();
    assert_eq!(recientes, vec!["c", "b"]);
    Ok(())
  }
}
