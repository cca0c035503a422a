use crm_domain::{AppUser, DomainError, Modulo, Propietario};

/// Visibilidad por rol y permisos por módulo.
///
/// Los documentos con dueño (cotizaciones, órdenes de compra, despachos) se
/// filtran por `usuario_id` salvo para el rol Admin. Los maestros (clientes,
/// proveedores, productos, conductores) no se filtran.
pub struct AccessControl;

impl AccessControl {
    /// Subconjunto visible de `items` para `usuario`, en el mismo orden.
    pub fn visible<'a, T: Propietario>(items: &'a [T], usuario: &AppUser) -> Vec<&'a T> {
        if usuario.es_admin() {
            items.iter().collect()
        } else {
            items.iter().filter(|it| it.usuario_id() == usuario.id).collect()
        }
    }

    pub fn puede(usuario: &AppUser, modulo: Modulo) -> bool {
        usuario.tiene_permiso(modulo)
    }

    /// Módulos del menú permitidos para el usuario, en orden canónico.
    pub fn menu(usuario: &AppUser) -> Vec<Modulo> {
        Modulo::TODOS.iter().copied().filter(|m| usuario.tiene_permiso(*m)).collect()
    }

    pub fn exigir(usuario: &AppUser, modulo: Modulo) -> Result<(), DomainError> {
        if Self::puede(usuario, modulo) {
            Ok(())
        } else {
            Err(DomainError::AccesoDenegado(modulo))
        }
    }
}
