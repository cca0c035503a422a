use crm_domain::{Cotizacion, CotizacionItem, EntityStore, EstadoCotizacion};
use crm_persistence::{DieselSnapshotRepository, InMemorySnapshotRepository, PersistenceLayer, SnapshotRepository};
use std::sync::Arc;
use uuid::Uuid;

fn cotizacion(id: &str, fecha: &str) -> Cotizacion {
  Cotizacion { id: id.into(),
               fecha: fecha.into(),
               cliente_id: "1".into(),
               cliente_nombre: "Help Soluciones Inc".into(),
               consecutivo: format!("COT-{}", id),
               items: vec![CotizacionItem { id: format!("{}-1", id),
                                            producto_id: "1".into(),
                                            proveedor_id: "1".into(),
                                            unidad: "Und".into(),
                                            cantidad: 3.0,
                                            costo_unitario: 1000.0,
                                            utilidad: 25.0,
                                            iva: 19.0 }],
               subtotal: 0.0,
               iva: 0.0,
               total: 0.0,
               ejecutivo: "Ana".into(),
               ejecutivo_email: "ana@helpsoluciones.com".into(),
               ejecutivo_telefono: Some("3000000000".into()),
               usuario_id: "2".into(),
               estado: EstadoCotizacion::Seguimiento }.con_totales()
}

fn sample_store() -> EntityStore<Cotizacion> {
  let mut store = EntityStore::new();
  for (i, fecha) in ["2024-01-05", "2024-02-11", "2024-02-20"].iter().enumerate() {
    store.add(cotizacion(&format!("c{}", i), fecha)).expect("add");
  }
  store
}

fn assert_round_trip(repo: Arc<dyn SnapshotRepository>) {
  let layer = PersistenceLayer::new(repo);
  let esperado = sample_store();
  layer.guardar(&esperado).expect("guardar");
  let reloaded = layer.cargar::<Cotizacion, _>(Vec::new).expect("cargar");
  assert_eq!(reloaded, esperado);
  let ids: Vec<&str> = reloaded.list().iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, vec!["c0", "c1", "c2"]);
}

#[test]
fn in_memory_round_trip_preserves_order_and_fields() {
  assert_round_trip(Arc::new(InMemorySnapshotRepository::new()));
}

#[test]
fn sqlite_round_trip_preserves_order_and_fields() {
  let tmp_path = std::env::temp_dir().join(format!("crm_test_{}.db", Uuid::new_v4()));
  let db_url = tmp_path.to_str().unwrap().to_string();
  let repo = DieselSnapshotRepository::new(&db_url).expect("open sqlite");
  assert_round_trip(Arc::new(repo));

  // Una segunda conexión al mismo archivo ve los datos ya escritos.
  let reopened = DieselSnapshotRepository::new(&db_url).expect("reopen sqlite");
  assert_eq!(reopened.claves().expect("claves"), vec!["hs_cotizaciones".to_string()]);
  let layer = PersistenceLayer::new(Arc::new(reopened));
  assert_eq!(layer.cargar::<Cotizacion, _>(Vec::new).expect("cargar"), sample_store());

  let _ = std::fs::remove_file(tmp_path);
}

#[test]
fn sqlite_write_replaces_whole_collection() {
  let tmp_path = std::env::temp_dir().join(format!("crm_test_{}.db", Uuid::new_v4()));
  let repo = DieselSnapshotRepository::new(tmp_path.to_str().unwrap()).expect("open sqlite");
  repo.escribir("hs_clientes", "[1,2,3]").expect("write");
  repo.escribir("hs_clientes", "[]").expect("rewrite");
  assert_eq!(repo.leer("hs_clientes").expect("read").as_deref(), Some("[]"));
  repo.eliminar("hs_clientes").expect("delete");
  assert_eq!(repo.leer("hs_clientes").expect("read"), None);
  let _ = std::fs::remove_file(tmp_path);
}
