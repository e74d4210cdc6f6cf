use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::schema_gen::{
    generate_create_table, generate_indexes, generate_insert, generate_select, generate_update,
};
use crate::model::{Company, CompanyRow, Member, MemberRow};
use crate::schema::{quote_ident, TableSchema, ALL_TABLES, EMPRESAS, SOCIOS};

/// SQLite connection with the registry database attached under its schema name
///
/// Every statement addresses tables as `"<schema>"."<table>"`, so the database
/// file is attached under the schema alias rather than opened as `main`.
pub struct RegistryStore {
    conn: Connection,
    schema: String,
}

impl RegistryStore {
    /// Open (or create) the database file at `db_path`
    pub fn open(db_path: &Path, schema: &str) -> Result<Self> {
        let target = db_path
            .to_str()
            .with_context(|| format!("Database path is not valid UTF-8: {:?}", db_path))?;
        Self::attach(target, schema)
            .with_context(|| format!("Failed to open database: {:?}", db_path))
    }

    /// Open a private in-memory database
    pub fn open_in_memory(schema: &str) -> Result<Self> {
        Self::attach(":memory:", schema).context("Failed to open in-memory database")
    }

    fn attach(target: &str, schema: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create connection")?;

        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {}", quote_ident(schema)),
            [target],
        )?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self {
            conn,
            schema: schema.to_string(),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Raw connection, for statements outside the gateway
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create all registry tables and indexes that do not exist yet
    pub fn create_tables(&self) -> Result<()> {
        for table in ALL_TABLES {
            self.conn
                .execute(&generate_create_table(&self.schema, table), [])
                .with_context(|| format!("Failed to create table: {}", table.name))?;

            for index_sql in generate_indexes(&self.schema, table) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", table.name))?;
            }
        }

        Ok(())
    }

    /// Table access outside any explicit transaction (each statement commits)
    pub fn tables(&self) -> Tables<'_> {
        Tables::new(&self.conn, &self.schema)
    }

    /// Run `f` inside one transaction
    ///
    /// Commits when `f` returns `Ok`; any error rolls back everything `f` wrote.
    pub fn with_transaction<T, E>(
        &mut self,
        f: impl FnOnce(&Tables<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        let tx = self.conn.transaction()?;
        let value = f(&Tables::new(&tx, &self.schema))?;
        tx.commit()?;
        Ok(value)
    }
}

/// Parameterized statements over the registry tables
pub struct Tables<'c> {
    conn: &'c Connection,
    schema: &'c str,
}

impl<'c> Tables<'c> {
    pub fn new(conn: &'c Connection, schema: &'c str) -> Self {
        Self { conn, schema }
    }

    /// Whether a company with exactly this CNPJ is stored
    pub fn company_exists(&self, cnpj: &str) -> rusqlite::Result<bool> {
        let sql = format!(
            "SELECT \"IdEmpresa\" FROM {} WHERE \"CNPJ\" = ?1 LIMIT 1",
            EMPRESAS.qualified(self.schema)
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let found: Option<i64> = stmt.query_row([cnpj], |row| row.get(0)).optional()?;
        Ok(found.is_some())
    }

    /// Insert a company, returning its new `IdEmpresa`
    pub fn insert_company(&self, row: &CompanyRow) -> rusqlite::Result<i64> {
        let valor = decimal_text(row.valor_contribuicao);
        let params = company_params(row, &valor);

        let mut stmt = self.conn.prepare_cached(&generate_insert(self.schema, &EMPRESAS))?;
        stmt.execute(&params[..])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_company(&self, id: i64) -> rusqlite::Result<Option<Company>> {
        let sql = by_id(self.schema, &EMPRESAS);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.query_row([id], company_from_row).optional()
    }

    pub fn list_companies(&self) -> rusqlite::Result<Vec<Company>> {
        let sql = ordered(self.schema, &EMPRESAS);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], company_from_row)?;
        rows.collect()
    }

    /// Replace every column of a company; `false` when the id is unknown
    pub fn update_company(&self, id: i64, row: &CompanyRow) -> rusqlite::Result<bool> {
        let valor = decimal_text(row.valor_contribuicao);
        let mut params = company_params(row, &valor);
        params.push(param(":id", &id));

        let mut stmt = self.conn.prepare_cached(&generate_update(self.schema, &EMPRESAS))?;
        Ok(stmt.execute(&params[..])? > 0)
    }

    pub fn delete_company(&self, id: i64) -> rusqlite::Result<bool> {
        self.delete(&EMPRESAS, id)
    }

    /// Insert a member, returning its new `IdSocio`
    pub fn insert_member(&self, row: &MemberRow) -> rusqlite::Result<i64> {
        let valor = decimal_text(row.valor_mensalidade);
        let params = member_params(row, &valor);

        let mut stmt = self.conn.prepare_cached(&generate_insert(self.schema, &SOCIOS))?;
        stmt.execute(&params[..])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_member(&self, id: i64) -> rusqlite::Result<Option<Member>> {
        let sql = by_id(self.schema, &SOCIOS);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.query_row([id], member_from_row).optional()
    }

    pub fn list_members(&self) -> rusqlite::Result<Vec<Member>> {
        let sql = ordered(self.schema, &SOCIOS);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], member_from_row)?;
        rows.collect()
    }

    /// Replace every column of a member; `false` when the id is unknown
    pub fn update_member(&self, id: i64, row: &MemberRow) -> rusqlite::Result<bool> {
        let valor = decimal_text(row.valor_mensalidade);
        let mut params = member_params(row, &valor);
        params.push(param(":id", &id));

        let mut stmt = self.conn.prepare_cached(&generate_update(self.schema, &SOCIOS))?;
        Ok(stmt.execute(&params[..])? > 0)
    }

    pub fn delete_member(&self, id: i64) -> rusqlite::Result<bool> {
        self.delete(&SOCIOS, id)
    }

    /// Number of rows in a table
    pub fn count(&self, table: &TableSchema) -> rusqlite::Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.qualified(self.schema));
        self.conn.query_row(&sql, [], |row| row.get(0))
    }

    fn delete(&self, table: &TableSchema, id: i64) -> rusqlite::Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            table.qualified(self.schema),
            quote_ident(table.primary_key)
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.execute([id])? > 0)
    }
}

fn by_id(schema: &str, table: &TableSchema) -> String {
    format!(
        "{} WHERE {} = ?1",
        generate_select(schema, table),
        quote_ident(table.primary_key)
    )
}

fn ordered(schema: &str, table: &TableSchema) -> String {
    format!(
        "{} ORDER BY {}",
        generate_select(schema, table),
        quote_ident(table.primary_key)
    )
}

fn decimal_text(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Read a decimal column stored as text
fn get_decimal(row: &Row, column: &str) -> rusqlite::Result<Option<Decimal>> {
    let idx = row.as_ref().column_index(column)?;
    let text: Option<String> = row.get(idx)?;

    text.map(|t| {
        Decimal::from_str(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn param<'a>(name: &'static str, value: &'a dyn ToSql) -> (&'static str, &'a dyn ToSql) {
    (name, value)
}

fn company_params<'a>(
    row: &'a CompanyRow,
    valor: &'a Option<String>,
) -> Vec<(&'static str, &'a dyn ToSql)> {
    vec![
        param(":CodEmpresa", &row.cod_empresa),
        param(":CNPJ", &row.cnpj),
        param(":RazaoSocial", &row.razao_social),
        param(":NomeFantasia", &row.nome_fantasia),
        param(":Endereco", &row.endereco),
        param(":Numero", &row.numero),
        param(":Complemento", &row.complemento),
        param(":Bairro", &row.bairro),
        param(":CEP", &row.cep),
        param(":Cidade", &row.cidade),
        param(":UF", &row.uf),
        param(":Telefone01", &row.telefone01),
        param(":Telefone02", &row.telefone02),
        param(":Fax", &row.fax),
        param(":Celular", &row.celular),
        param(":WhatsApp", &row.whatsapp),
        param(":Instagram", &row.instagram),
        param(":Linkedin", &row.linkedin),
        param(":NFuncionarios", &row.n_funcionarios),
        param(":DataContribuicao", &row.data_contribuicao),
        param(":ValorContribuicao", valor),
        param(":DataCadastro", &row.data_cadastro),
        param(":Cadastrante", &row.cadastrante),
        param(":Observacao", &row.observacao),
    ]
}

fn member_params<'a>(
    row: &'a MemberRow,
    valor: &'a Option<String>,
) -> Vec<(&'static str, &'a dyn ToSql)> {
    vec![
        param(":Nome", &row.nome),
        param(":RG", &row.rg),
        param(":Emissor", &row.emissor),
        param(":CPF", &row.cpf),
        param(":Nascimento", &row.nascimento),
        param(":Naturalidade", &row.naturalidade),
        param(":NaturalidadeUF", &row.naturalidade_uf),
        param(":Nacionalidade", &row.nacionalidade),
        param(":Sexo", &row.sexo),
        param(":EstadoCivil", &row.estado_civil),
        param(":Endereco", &row.endereco),
        param(":Complemento", &row.complemento),
        param(":Bairro", &row.bairro),
        param(":CEP", &row.cep),
        param(":Celular", &row.celular),
        param(":RedeSocial", &row.rede_social),
        param(":Pai", &row.pai),
        param(":Mae", &row.mae),
        param(":DataCadastro", &row.data_cadastro),
        param(":Cadastrante", &row.cadastrante),
        param(":Status", &row.status),
        param(":Matricula", &row.matricula),
        param(":DataMensalidade", &row.data_mensalidade),
        param(":ValorMensalidade", valor),
        param(":DataAdmissao", &row.data_admissao),
        param(":CTPS", &row.ctps),
        param(":Funcao", &row.funcao),
        param(":CodEmpresa", &row.cod_empresa),
        param(":CNPJ", &row.cnpj),
        param(":RazaoSocial", &row.razao_social),
        param(":NomeFantasia", &row.nome_fantasia),
        param(":DataDemissao", &row.data_demissao),
        param(":MotivoDemissao", &row.motivo_demissao),
        param(":Carta", &row.carta),
        param(":Carteira", &row.carteira),
        param(":Ficha", &row.ficha),
        param(":Observacao", &row.observacao),
        param(":Telefone", &row.telefone),
    ]
}

fn company_from_row(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get("IdEmpresa")?,
        row: CompanyRow {
            cod_empresa: row.get("CodEmpresa")?,
            cnpj: row.get("CNPJ")?,
            razao_social: row.get("RazaoSocial")?,
            nome_fantasia: row.get("NomeFantasia")?,
            endereco: row.get("Endereco")?,
            numero: row.get("Numero")?,
            complemento: row.get("Complemento")?,
            bairro: row.get("Bairro")?,
            cep: row.get("CEP")?,
            cidade: row.get("Cidade")?,
            uf: row.get("UF")?,
            telefone01: row.get("Telefone01")?,
            telefone02: row.get("Telefone02")?,
            fax: row.get("Fax")?,
            celular: row.get("Celular")?,
            whatsapp: row.get("WhatsApp")?,
            instagram: row.get("Instagram")?,
            linkedin: row.get("Linkedin")?,
            n_funcionarios: row.get("NFuncionarios")?,
            data_contribuicao: row.get("DataContribuicao")?,
            valor_contribuicao: get_decimal(row, "ValorContribuicao")?,
            data_cadastro: row.get("DataCadastro")?,
            cadastrante: row.get("Cadastrante")?,
            observacao: row.get("Observacao")?,
        },
    })
}

fn member_from_row(row: &Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get("IdSocio")?,
        row: MemberRow {
            nome: row.get("Nome")?,
            rg: row.get("RG")?,
            emissor: row.get("Emissor")?,
            cpf: row.get("CPF")?,
            nascimento: row.get("Nascimento")?,
            naturalidade: row.get("Naturalidade")?,
            naturalidade_uf: row.get("NaturalidadeUF")?,
            nacionalidade: row.get("Nacionalidade")?,
            sexo: row.get("Sexo")?,
            estado_civil: row.get("EstadoCivil")?,
            endereco: row.get("Endereco")?,
            complemento: row.get("Complemento")?,
            bairro: row.get("Bairro")?,
            cep: row.get("CEP")?,
            celular: row.get("Celular")?,
            rede_social: row.get("Rede Social")?,
            pai: row.get("Pai")?,
            mae: row.get("Mae")?,
            data_cadastro: row.get("DataCadastro")?,
            cadastrante: row.get("Cadastrante")?,
            status: row.get("Status")?,
            matricula: row.get("Matricula")?,
            data_mensalidade: row.get("DataMensalidade")?,
            valor_mensalidade: get_decimal(row, "ValorMensalidade")?,
            data_admissao: row.get("DataAdmissao")?,
            ctps: row.get("CTPS")?,
            funcao: row.get("Funcao")?,
            cod_empresa: row.get("CodEmpresa")?,
            cnpj: row.get("CNPJ")?,
            razao_social: row.get("RazaoSocial")?,
            nome_fantasia: row.get("NomeFantasia")?,
            data_demissao: row.get("DataDemissao")?,
            motivo_demissao: row.get("MotivoDemissao")?,
            carta: row.get("Carta")?,
            carteira: row.get("Carteira")?,
            ficha: row.get("Ficha")?,
            observacao: row.get("Observacao")?,
            telefone: row.get("Telefone")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn store() -> RegistryStore {
        let store = RegistryStore::open_in_memory("Sindplast").unwrap();
        store.create_tables().unwrap();
        store
    }

    fn company(cnpj: &str) -> CompanyRow {
        CompanyRow {
            cod_empresa: Some("10".to_string()),
            cnpj: Some(cnpj.to_string()),
            razao_social: Some("ACME".to_string()),
            valor_contribuicao: Some(Decimal::new(15050, 2)),
            data_contribuicao: NaiveDate::from_ymd_opt(2024, 5, 10),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_tables_is_repeatable() {
        let store = store();
        store.create_tables().unwrap();
        assert_eq!(store.tables().count(&EMPRESAS).unwrap(), 0);
        assert_eq!(store.tables().count(&SOCIOS).unwrap(), 0);
    }

    #[test]
    fn test_company_round_trip() {
        let store = store();
        let tables = store.tables();

        let id = tables.insert_company(&company("12.345.678/0001-90")).unwrap();
        let stored = tables.get_company(id).unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.row, company("12.345.678/0001-90"));
        assert!(tables.company_exists("12.345.678/0001-90").unwrap());
        assert!(!tables.company_exists("12345678000190").unwrap());
    }

    #[test]
    fn test_update_and_delete_company() {
        let store = store();
        let tables = store.tables();
        let id = tables.insert_company(&company("1")).unwrap();

        let mut changed = company("2");
        changed.cidade = Some("MANAUS".to_string());
        assert!(tables.update_company(id, &changed).unwrap());
        assert!(!tables.update_company(id + 100, &changed).unwrap());
        assert_eq!(tables.get_company(id).unwrap().unwrap().row, changed);

        assert!(tables.delete_company(id).unwrap());
        assert!(!tables.delete_company(id).unwrap());
        assert!(tables.get_company(id).unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete_member() {
        let store = store();
        let tables = store.tables();
        let member = MemberRow {
            nome: Some("MARIA".to_string()),
            status: Some("ATIVO".to_string()),
            ..Default::default()
        };
        let id = tables.insert_member(&member).unwrap();

        let changed = MemberRow {
            status: Some("INATIVO".to_string()),
            rede_social: Some("@maria".to_string()),
            data_demissao: NaiveDate::from_ymd_opt(2023, 6, 30),
            valor_mensalidade: Some(Decimal::new(3000, 2)),
            ficha: Some(true),
            ..member.clone()
        };
        assert!(tables.update_member(id, &changed).unwrap());
        assert!(!tables.update_member(id + 100, &changed).unwrap());
        assert_eq!(tables.get_member(id).unwrap().unwrap().row, changed);

        assert!(tables.delete_member(id).unwrap());
        assert!(!tables.delete_member(id).unwrap());
        assert!(tables.get_member(id).unwrap().is_none());
    }

    #[test]
    fn test_member_round_trip_and_unique_cpf() {
        let store = store();
        let tables = store.tables();
        let member = MemberRow {
            nome: Some("JOAO".to_string()),
            cpf: Some("123.456.789-00".to_string()),
            rede_social: Some("@joao".to_string()),
            status: Some("ATIVO".to_string()),
            carta: Some(true),
            carteira: Some(false),
            valor_mensalidade: Some(Decimal::new(1250, 2)),
            ..Default::default()
        };

        let id = tables.insert_member(&member).unwrap();
        assert_eq!(tables.get_member(id).unwrap().unwrap().row, member);
        assert!(tables.insert_member(&member).is_err());
        assert_eq!(tables.list_members().unwrap().len(), 1);
    }

    #[test]
    fn test_with_transaction_rolls_back_on_error() {
        let mut store = store();

        let result: rusqlite::Result<()> = store.with_transaction(|tables| {
            tables.insert_company(&company("1"))?;
            Err(rusqlite::Error::QueryReturnedNoRows)
        });

        assert!(result.is_err());
        assert_eq!(store.tables().count(&EMPRESAS).unwrap(), 0);

        store
            .with_transaction(|tables| tables.insert_company(&company("1")))
            .unwrap();
        assert_eq!(store.tables().list_companies().unwrap().len(), 1);
    }
}
