//! Mapping from legacy export records to destination rows

use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;

use crate::model::{CompanyRow, MemberRow, STATUS_ACTIVE, STATUS_INACTIVE};
use crate::normalize::{
    format_phone, format_postal_code, format_tax_id, parse_date, parse_decimal, parse_integer,
    split_city_state,
};
use crate::parser::{text, truthy, RawEmpresaRecord, RawSocioRecord};

/// Registrant label stamped on every migrated row
pub const MIGRATION_REGISTRANT: &str = "Sistema de Migração";

/// Nationality recorded for every migrated member
pub const DEFAULT_NATIONALITY: &str = "BRASILEIRO";

/// Companies from the export keyed by their legacy code
pub type CompanyLookup = HashMap<String, RawEmpresaRecord>;

/// Build the code -> company lookup; a repeated code keeps the last record
pub fn company_lookup(records: &[RawEmpresaRecord]) -> CompanyLookup {
    records
        .iter()
        .map(|record| (record.code(), record.clone()))
        .collect()
}

/// Map a legacy company into an `Empresas` row registered now
pub fn map_company(raw: &RawEmpresaRecord, registrant: &str) -> CompanyRow {
    map_company_at(raw, registrant, Local::now().naive_local())
}

/// Map a legacy company with an explicit registration timestamp
pub fn map_company_at(
    raw: &RawEmpresaRecord,
    registrant: &str,
    registered_at: NaiveDateTime,
) -> CompanyRow {
    let (cidade, uf) = split_city_state(raw.city_state.as_ref());
    let name = text(raw.name.as_ref());

    CompanyRow {
        cod_empresa: Some(raw.code()),
        cnpj: format_tax_id(raw.tax_id.as_ref()),
        razao_social: name.clone(),
        // The export has no separate trade name
        nome_fantasia: name,
        endereco: text(raw.address.as_ref()),
        numero: None,
        complemento: None,
        bairro: text(raw.district.as_ref()),
        cep: format_postal_code(raw.postal_code.as_ref()),
        cidade,
        uf,
        telefone01: format_phone(raw.phone1.as_ref()),
        telefone02: format_phone(raw.phone2.as_ref()),
        fax: format_phone(raw.fax.as_ref()),
        celular: None,
        whatsapp: None,
        instagram: None,
        linkedin: None,
        n_funcionarios: parse_integer(raw.employee_count.as_ref()),
        data_contribuicao: parse_date(raw.contribution_date.as_ref()),
        valor_contribuicao: parse_decimal(raw.contribution_amount.as_ref()),
        data_cadastro: Some(registered_at),
        cadastrante: Some(registrant.to_string()),
        observacao: text(raw.notes.as_ref()),
    }
}

/// Member status from the `SATIV` flag
///
/// A missing key counts as active while an explicit `null` counts as
/// inactive. The legacy exporter never documented this default; it is kept
/// as-is.
pub fn member_status(raw: &RawSocioRecord) -> &'static str {
    let active = match &raw.active {
        None => true,
        Some(flag) => truthy(flag.as_ref()),
    };

    if active {
        STATUS_ACTIVE
    } else {
        STATUS_INACTIVE
    }
}

/// Map a legacy member into a `Socios` row
///
/// Company fields are copied from `companies`; an unknown code leaves them
/// empty but keeps the code itself.
pub fn map_member(raw: &RawSocioRecord, companies: &CompanyLookup, registrant: &str) -> MemberRow {
    let cod_empresa = raw.company_code();
    let company = companies.get(&cod_empresa);

    MemberRow {
        nome: text(raw.name.as_ref()),
        rg: text(raw.identity.as_ref()),
        emissor: None,
        cpf: None,
        nascimento: parse_date(raw.birth_date.as_ref()),
        naturalidade: text(raw.birthplace.as_ref()),
        naturalidade_uf: None,
        nacionalidade: Some(DEFAULT_NATIONALITY.to_string()),
        sexo: text(raw.sex.as_ref()),
        estado_civil: text(raw.marital_status.as_ref()),
        endereco: text(raw.address.as_ref()),
        complemento: None,
        bairro: text(raw.district.as_ref()),
        cep: format_postal_code(raw.postal_code.as_ref()),
        celular: None,
        rede_social: None,
        pai: text(raw.father.as_ref()),
        mae: text(raw.mother.as_ref()),
        data_cadastro: parse_date(raw.registered_on.as_ref())
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        cadastrante: Some(registrant.to_string()),
        status: Some(member_status(raw).to_string()),
        matricula: text(raw.enrollment.as_ref()),
        data_mensalidade: parse_date(raw.dues_date.as_ref()),
        valor_mensalidade: parse_decimal(raw.dues_amount.as_ref()),
        data_admissao: parse_date(raw.admission_date.as_ref()),
        ctps: text(raw.ctps.as_ref()),
        funcao: text(raw.function.as_ref()),
        cnpj: company.and_then(|c| format_tax_id(c.tax_id.as_ref())),
        razao_social: company.and_then(|c| text(c.name.as_ref())),
        nome_fantasia: company.and_then(|c| text(c.name.as_ref())),
        cod_empresa: Some(cod_empresa),
        data_demissao: parse_date(raw.dismissal_date.as_ref()),
        motivo_demissao: text(raw.dismissal_reason.as_ref()),
        carta: Some(truthy(raw.letter_issued.as_ref())),
        carteira: Some(truthy(raw.card_issued.as_ref())),
        ficha: Some(truthy(raw.file_issued.as_ref())),
        observacao: text(raw.notes.as_ref()),
        telefone: format_phone(raw.phone.as_ref()),
    }
}
