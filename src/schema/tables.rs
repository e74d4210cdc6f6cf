//! Table schema definitions for the registry database

use super::types::*;

pub static EMPRESAS: TableSchema = TableSchema {
    name: "Empresas",
    primary_key: "IdEmpresa",
    columns: &[
        Column::new("CodEmpresa", ColumnType::Text),
        Column::new("CNPJ", ColumnType::Text),
        Column::new("RazaoSocial", ColumnType::Text),
        Column::new("NomeFantasia", ColumnType::Text),
        Column::new("Endereco", ColumnType::Text),
        Column::new("Numero", ColumnType::Text),
        Column::new("Complemento", ColumnType::Text),
        Column::new("Bairro", ColumnType::Text),
        Column::new("CEP", ColumnType::Text),
        Column::new("Cidade", ColumnType::Text),
        Column::new("UF", ColumnType::Text),
        Column::new("Telefone01", ColumnType::Text),
        Column::new("Telefone02", ColumnType::Text),
        Column::new("Fax", ColumnType::Text),
        Column::new("Celular", ColumnType::Text),
        Column::new("WhatsApp", ColumnType::Text),
        Column::new("Instagram", ColumnType::Text),
        Column::new("Linkedin", ColumnType::Text),
        Column::new("NFuncionarios", ColumnType::Integer),
        Column::new("DataContribuicao", ColumnType::Date),
        Column::new("ValorContribuicao", ColumnType::Decimal),
        Column::new("DataCadastro", ColumnType::Timestamp),
        Column::new("Cadastrante", ColumnType::Text),
        Column::new("Observacao", ColumnType::Text),
    ],
    // Not unique: duplicate CNPJs are filtered by the migration, not the table
    indexes: &[Index::on(&["CNPJ"]), Index::on(&["CodEmpresa"])],
};

pub static SOCIOS: TableSchema = TableSchema {
    name: "Socios",
    primary_key: "IdSocio",
    columns: &[
        Column::new("Nome", ColumnType::Text),
        Column::new("RG", ColumnType::Text),
        Column::new("Emissor", ColumnType::Text),
        Column::new("CPF", ColumnType::Text),
        Column::new("Nascimento", ColumnType::Date),
        Column::new("Naturalidade", ColumnType::Text),
        Column::new("NaturalidadeUF", ColumnType::Text),
        Column::new("Nacionalidade", ColumnType::Text),
        Column::new("Sexo", ColumnType::Text),
        Column::new("EstadoCivil", ColumnType::Text),
        Column::new("Endereco", ColumnType::Text),
        Column::new("Complemento", ColumnType::Text),
        Column::new("Bairro", ColumnType::Text),
        Column::new("CEP", ColumnType::Text),
        Column::new("Celular", ColumnType::Text),
        Column::new("Rede Social", ColumnType::Text),
        Column::new("Pai", ColumnType::Text),
        Column::new("Mae", ColumnType::Text),
        Column::new("DataCadastro", ColumnType::Timestamp),
        Column::new("Cadastrante", ColumnType::Text),
        Column::required("Status", ColumnType::Text),
        Column::new("Matricula", ColumnType::Text),
        Column::new("DataMensalidade", ColumnType::Date),
        Column::new("ValorMensalidade", ColumnType::Decimal),
        Column::new("DataAdmissao", ColumnType::Date),
        Column::new("CTPS", ColumnType::Text),
        Column::new("Funcao", ColumnType::Text),
        Column::new("CodEmpresa", ColumnType::Text),
        Column::new("CNPJ", ColumnType::Text),
        Column::new("RazaoSocial", ColumnType::Text),
        Column::new("NomeFantasia", ColumnType::Text),
        Column::new("DataDemissao", ColumnType::Date),
        Column::new("MotivoDemissao", ColumnType::Text),
        Column::new("Carta", ColumnType::Boolean),
        Column::new("Carteira", ColumnType::Boolean),
        Column::new("Ficha", ColumnType::Boolean),
        Column::new("Observacao", ColumnType::Text),
        Column::new("Telefone", ColumnType::Text),
    ],
    indexes: &[Index::unique(&["CPF"]), Index::on(&["CodEmpresa"])],
};

/// All tables in creation order
pub static ALL_TABLES: &[&TableSchema] = &[&EMPRESAS, &SOCIOS];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables() {
        let names: Vec<&str> = ALL_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Empresas", "Socios"]);
        assert_eq!(SOCIOS.primary_key, "IdSocio");
    }

    #[test]
    fn test_column_counts() {
        assert_eq!(EMPRESAS.columns.len(), 24);
        assert_eq!(SOCIOS.columns.len(), 38);
    }
}
