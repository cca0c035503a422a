//! crm-domain: modelo de datos del núcleo operativo
//!
//! Define las entidades (clientes, proveedores, productos, cotizaciones,
//! órdenes de compra, despachos, conductores, reparaciones, usuarios y
//! presupuestos), la derivación de totales, el almacén genérico
//! `EntityStore<T>` y las semillas usadas cuando no hay datos persistidos.

mod cliente;
mod conductor;
mod cotizacion;
mod despacho;
mod domain_stubs;
mod entity_store;
mod errors;
mod orden_compra;
mod presupuesto;
mod producto;
mod proveedor;
mod reparacion;
mod totales;
mod usuario;

pub use cliente::Cliente;
pub use conductor::Conductor;
pub use cotizacion::{Cotizacion, CotizacionItem, EstadoCotizacion};
pub use despacho::{Despacho, DespachoItem, EstadoDespacho};
pub use domain_stubs::DomainStubs;
pub use entity_store::{Entidad, EntityStore, OrdenInsercion, Propietario};
pub use errors::DomainError;
pub use orden_compra::{EstadoOrdenCompra, OrdenCompra, OrdenCompraItem};
pub use presupuesto::SalesBudget;
pub use producto::{PrecioHistorico, Producto};
pub use proveedor::Proveedor;
pub use reparacion::{EstadoReparacion, Reparacion, TipoServicio};
pub use totales::{Totales, IVA_ORDEN_COMPRA};
pub use usuario::{hash_password, AppUser, Modulo, Rol};
