use crate::schema::{quote_ident, TableSchema};

/// Generate CREATE TABLE SQL for a table schema inside `schema`
pub fn generate_create_table(schema: &str, table: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", table.qualified(schema));
    let mut columns = Vec::new();

    columns.push(format!(
        "    {} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_ident(table.primary_key)
    ));

    for col in table.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        columns.push(format!(
            "    {} {}{}",
            quote_ident(col.name),
            col.col_type.sql_type(),
            null_constraint
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for a table
///
/// SQLite resolves the indexed table inside the index's own schema, so only
/// the index name is qualified.
pub fn generate_indexes(schema: &str, table: &TableSchema) -> Vec<String> {
    table
        .indexes
        .iter()
        .map(|index| {
            let unique = if index.unique { "UNIQUE " } else { "" };
            let name = format!("idx_{}_{}", table.name, index.columns.join("_"));
            let columns: Vec<String> = index.columns.iter().map(|c| quote_ident(c)).collect();

            format!(
                "CREATE {}INDEX IF NOT EXISTS {}.{} ON {}({})",
                unique,
                quote_ident(schema),
                quote_ident(&name),
                quote_ident(table.name),
                columns.join(", ")
            )
        })
        .collect()
}

/// Generate the parameterized INSERT for a table
pub fn generate_insert(schema: &str, table: &TableSchema) -> String {
    let columns: Vec<String> = table.column_names().map(quote_ident).collect();
    let params: Vec<String> = table.columns.iter().map(|c| c.param()).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.qualified(schema),
        columns.join(", "),
        params.join(", ")
    )
}

/// Generate the parameterized UPDATE by primary key (`:id`)
pub fn generate_update(schema: &str, table: &TableSchema) -> String {
    let assignments: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} = {}", quote_ident(c.name), c.param()))
        .collect();

    format!(
        "UPDATE {} SET {} WHERE {} = :id",
        table.qualified(schema),
        assignments.join(", "),
        quote_ident(table.primary_key)
    )
}

/// Generate the SELECT of every column, primary key first
pub fn generate_select(schema: &str, table: &TableSchema) -> String {
    let mut columns = vec![quote_ident(table.primary_key)];
    columns.extend(table.column_names().map(quote_ident));

    format!("SELECT {} FROM {}", columns.join(", "), table.qualified(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{EMPRESAS, SOCIOS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table("Sindplast", &SOCIOS);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS \"Sindplast\".\"Socios\""));
        assert!(sql.contains("\"IdSocio\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("\"Rede Social\" TEXT"));
        assert!(sql.contains("\"Status\" TEXT NOT NULL"));
        assert!(sql.contains("\"Carta\" INTEGER"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes("Sindplast", &SOCIOS);
        assert!(indexes
            .iter()
            .any(|i| i.starts_with("CREATE UNIQUE INDEX") && i.contains("idx_Socios_CPF")));

        let indexes = generate_indexes("Sindplast", &EMPRESAS);
        assert!(indexes.iter().all(|i| !i.contains("UNIQUE")));
    }

    #[test]
    fn test_generate_insert_uses_named_params() {
        let sql = generate_insert("Sindplast", &SOCIOS);
        assert!(sql.starts_with("INSERT INTO \"Sindplast\".\"Socios\""));
        assert!(sql.contains("\"Rede Social\""));
        assert!(sql.contains(":RedeSocial"));
        assert!(!sql.contains("IdSocio"));
    }

    #[test]
    fn test_generate_update() {
        let sql = generate_update("Sindplast", &EMPRESAS);
        assert!(sql.contains("\"CNPJ\" = :CNPJ"));
        assert!(sql.ends_with("WHERE \"IdEmpresa\" = :id"));
    }
}
