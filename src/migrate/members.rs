use log::{debug, info, warn};

use super::source::{load_companies, load_members};
use super::{display_name, MigrationSummary};
use crate::config::Config;
use crate::error::MigrationError;
use crate::mapper::{company_lookup, map_member, CompanyLookup};
use crate::parser::RawSocioRecord;
use crate::ui::{Outcome, Phase, Ui};
use crate::writer::RegistryStore;

/// Load both exports named in `config` and migrate the members
///
/// Only unreadable input fails the run; per-member failures are counted in
/// the returned summary.
pub fn run_member_migration(
    config: &Config,
    store: &mut RegistryStore,
    ui: &mut impl Ui,
) -> Result<MigrationSummary, MigrationError> {
    ui.set_phase(Phase::Loading);
    let companies = company_lookup(&load_companies(&config.companies_file)?);
    ui.log(format!("{} company codes loaded", companies.len()));

    let members = load_members(&config.members_file)?;
    ui.set_info(format!(
        "{} members in {}",
        members.len(),
        config.members_file.display()
    ));

    Ok(migrate_members(
        store,
        &members,
        &companies,
        &config.registrant,
        ui,
    ))
}

/// Insert members one transaction at a time
///
/// A failed insert is counted and the loop moves on; members committed
/// before it stay in the table. Running this twice inserts everything twice.
pub fn migrate_members(
    store: &mut RegistryStore,
    members: &[RawSocioRecord],
    companies: &CompanyLookup,
    registrant: &str,
    ui: &mut impl Ui,
) -> MigrationSummary {
    ui.set_phase(Phase::MigratingMembers);
    info!("Migrating {} members", members.len());

    let total = members.len() as u64;
    let mut summary = MigrationSummary::new(members.len());

    for (idx, raw) in members.iter().enumerate() {
        let record = idx + 1;
        let name = display_name(raw.name.as_ref());
        ui.set_progress(record as u64, total, name.as_str());

        let row = map_member(raw, companies, registrant);

        match store.with_transaction(|tables| tables.insert_member(&row)) {
            Ok(id) => {
                debug!("Member {} ({}) inserted as IdSocio {}", record, name, id);
                summary.migrated += 1;
                ui.outcome(Outcome::Migrated, format!("{} -> IdSocio {}", name, id));
            }
            Err(err) => {
                warn!("Member {} ({}) failed: {}", record, name, err);
                summary.errors += 1;
                ui.outcome(Outcome::Failed, format!("{}: {}", name, err));
            }
        }
    }

    ui.clear_progress();
    info!("Member migration finished: {}", summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RawEmpresaRecord;
    use crate::schema::SOCIOS;
    use crate::ui::SilentUi;

    fn store() -> RegistryStore {
        let store = RegistryStore::open_in_memory("Sindplast").unwrap();
        store.create_tables().unwrap();
        store
    }

    fn members(json: &str) -> Vec<RawSocioRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_failed_member_does_not_undo_others() {
        let mut store = store();
        store
            .connection()
            .execute_batch(
                "CREATE UNIQUE INDEX \"Sindplast\".\"uq_mat\" ON \"Socios\"(\"Matricula\")",
            )
            .unwrap();
        let members = members(
            r#"[
                {"SNOME": "ANA", "SMAT": "1"},
                {"SNOME": "BRUNO", "SMAT": "1"},
                {"SNOME": "CARLA", "SMAT": "3"}
            ]"#,
        );

        let summary = migrate_members(
            &mut store,
            &members,
            &CompanyLookup::new(),
            "test",
            &mut SilentUi,
        );

        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.errors, 1);

        let names: Vec<Option<String>> = store
            .tables()
            .list_members()
            .unwrap()
            .into_iter()
            .map(|m| m.row.nome)
            .collect();
        assert_eq!(
            names,
            vec![Some("ANA".to_string()), Some("CARLA".to_string())]
        );
    }

    #[test]
    fn test_members_carry_company_snapshot() {
        let mut store = store();
        let companies: Vec<RawEmpresaRecord> =
            serde_json::from_str(r#"[{"ECODIG": 5, "ECGC": "12345678000190", "ENOME": "ACME"}]"#)
                .unwrap();
        let members = members(r#"[{"SNOME": "ANA", "ECODIG": 5}, {"SNOME": "RUI", "ECODIG": 8}]"#);

        let summary = migrate_members(
            &mut store,
            &members,
            &company_lookup(&companies),
            "test",
            &mut SilentUi,
        );
        assert_eq!(summary.migrated, 2);

        let stored = store.tables().list_members().unwrap();
        assert_eq!(stored[0].row.cnpj.as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(stored[0].row.razao_social.as_deref(), Some("ACME"));
        assert_eq!(stored[1].row.cod_empresa.as_deref(), Some("8"));
        assert_eq!(stored[1].row.cnpj, None);
    }

    #[test]
    fn test_rerun_duplicates_members() {
        let mut store = store();
        let members = members(r#"[{"SNOME": "ANA"}]"#);
        let lookup = CompanyLookup::new();

        migrate_members(&mut store, &members, &lookup, "test", &mut SilentUi);
        migrate_members(&mut store, &members, &lookup, "test", &mut SilentUi);

        assert_eq!(store.tables().count(&SOCIOS).unwrap(), 2);
    }
}
