use crate::producto::PrecioHistorico;
use crate::usuario::{AppUser, Modulo, Rol};
use crate::{Cliente, Producto, Proveedor};

/// Datos semilla usados cuando un snapshot no existe o no se puede leer.
///
/// Sólo los maestros y los usuarios tienen semilla; el resto de colecciones
/// arranca vacía.
pub struct DomainStubs;

impl DomainStubs {
  pub fn clientes() -> Vec<Cliente> {
    vec![Cliente { id: "1".into(),
                   nombre: "Help Soluciones Inc".into(),
                   nit: "900.123.456-7".into(),
                   contacto: "Juan Perez".into(),
                   telefono: "3001234567".into(),
                   correo: "juan@helpsoluciones.com".into(),
                   direccion: "Calle 123 #45-67".into(),
                   coordenadas: None }]
  }

  pub fn proveedores() -> Vec<Proveedor> {
    vec![Proveedor { id: "1".into(),
                     nombre: "Distribuidora Global".into(),
                     nit: "800.456.789-0".into(),
                     contacto: "Maria Lopez".into(),
                     telefono: "3109876543".into(),
                     correo: "mlopez@global.com".into(),
                     direccion: "Av. Siempre Viva 742".into(),
                     coordenadas: "4.6097, -74.0817".into() }]
  }

  pub fn productos() -> Vec<Producto> {
    vec![Producto { id: "1".into(),
                    nombre: "Laptop Pro".into(),
                    num_part: "LP-2024-X1".into(),
                    descripcion: "Alta gama".into(),
                    unidad: "Und".into(),
                    precio_compra: 3_500_000.0,
                    history: vec![PrecioHistorico { date: "2024-02-15".into(), price: 3_500_000.0 }] }]
  }

  /// Un único administrador con todos los módulos. Credenciales iniciales
  /// `admin` / `admin`.
  pub fn usuarios() -> Vec<AppUser> {
    let admin = AppUser { id: "1".into(),
                          nombre: "Administrador Principal".into(),
                          usuario: "admin".into(),
                          cargo: "Gerencia".into(),
                          email: "admin@helpsoluciones.com".into(),
                          telefono: "3160000000".into(),
                          rol: Rol::Admin,
                          permisos: Modulo::TODOS.into_iter().collect(),
                          password: Some("admin".into()) };
    vec![admin.con_password_hasheado()]
  }
}
