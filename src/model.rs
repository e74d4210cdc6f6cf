//! Destination rows for the `Empresas` and `Socios` tables
//!
//! Serialized field names match the column names so the JSON printed by the
//! CLI reads the same as the database.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "ATIVO";
pub const STATUS_INACTIVE: &str = "INATIVO";

/// A company row without its surrogate key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyRow {
    pub cod_empresa: Option<String>,
    #[serde(rename = "CNPJ")]
    pub cnpj: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    #[serde(rename = "CEP")]
    pub cep: Option<String>,
    pub cidade: Option<String>,
    #[serde(rename = "UF")]
    pub uf: Option<String>,
    #[serde(rename = "Telefone01")]
    pub telefone01: Option<String>,
    #[serde(rename = "Telefone02")]
    pub telefone02: Option<String>,
    pub fax: Option<String>,
    pub celular: Option<String>,
    #[serde(rename = "WhatsApp")]
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    #[serde(rename = "NFuncionarios")]
    pub n_funcionarios: Option<i64>,
    pub data_contribuicao: Option<NaiveDate>,
    pub valor_contribuicao: Option<Decimal>,
    pub data_cadastro: Option<NaiveDateTime>,
    pub cadastrante: Option<String>,
    pub observacao: Option<String>,
}

/// A stored company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    #[serde(rename = "IdEmpresa")]
    pub id: i64,
    #[serde(flatten)]
    pub row: CompanyRow,
}

/// A member row without its surrogate key
///
/// `cod_empresa`, `cnpj`, `razao_social` and `nome_fantasia` are a snapshot of
/// the owning company, not a live reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberRow {
    pub nome: Option<String>,
    #[serde(rename = "RG")]
    pub rg: Option<String>,
    pub emissor: Option<String>,
    #[serde(rename = "CPF")]
    pub cpf: Option<String>,
    pub nascimento: Option<NaiveDate>,
    pub naturalidade: Option<String>,
    #[serde(rename = "NaturalidadeUF")]
    pub naturalidade_uf: Option<String>,
    pub nacionalidade: Option<String>,
    pub sexo: Option<String>,
    pub estado_civil: Option<String>,
    pub endereco: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    #[serde(rename = "CEP")]
    pub cep: Option<String>,
    pub celular: Option<String>,
    #[serde(rename = "Rede Social")]
    pub rede_social: Option<String>,
    pub pai: Option<String>,
    pub mae: Option<String>,
    pub data_cadastro: Option<NaiveDateTime>,
    pub cadastrante: Option<String>,
    pub status: Option<String>,
    pub matricula: Option<String>,
    pub data_mensalidade: Option<NaiveDate>,
    pub valor_mensalidade: Option<Decimal>,
    pub data_admissao: Option<NaiveDate>,
    #[serde(rename = "CTPS")]
    pub ctps: Option<String>,
    pub funcao: Option<String>,
    pub cod_empresa: Option<String>,
    #[serde(rename = "CNPJ")]
    pub cnpj: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub data_demissao: Option<NaiveDate>,
    pub motivo_demissao: Option<String>,
    pub carta: Option<bool>,
    pub carteira: Option<bool>,
    pub ficha: Option<bool>,
    pub observacao: Option<String>,
    pub telefone: Option<String>,
}

/// A stored member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    #[serde(rename = "IdSocio")]
    pub id: i64,
    #[serde(flatten)]
    pub row: MemberRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_serializes_with_column_names() {
        let company = Company {
            id: 3,
            row: CompanyRow {
                cnpj: Some("12.345.678/0001-90".to_string()),
                whatsapp: Some("(92) 98123-4567".to_string()),
                n_funcionarios: Some(10),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["IdEmpresa"], 3);
        assert_eq!(json["CNPJ"], "12.345.678/0001-90");
        assert_eq!(json["WhatsApp"], "(92) 98123-4567");
        assert_eq!(json["NFuncionarios"], 10);
        assert!(json["RazaoSocial"].is_null());
    }

    #[test]
    fn test_member_serializes_social_column_with_space() {
        let member = Member {
            id: 1,
            row: MemberRow {
                rede_social: Some("@socio".to_string()),
                status: Some(STATUS_ACTIVE.to_string()),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["IdSocio"], 1);
        assert_eq!(json["Rede Social"], "@socio");
        assert_eq!(json["Status"], "ATIVO");
    }
}
