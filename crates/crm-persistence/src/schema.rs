// Esquema Diesel: una fila por colección persistida.
diesel::table! {
    snapshots (clave) {
        clave -> Text,
        payload -> Text,
        updated_at_ts -> BigInt,
    }
}
