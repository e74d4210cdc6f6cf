use log::{debug, error, info, warn};

use super::source::load_companies;
use super::{display_name, MigrationSummary};
use crate::config::Config;
use crate::error::MigrationError;
use crate::mapper::map_company;
use crate::parser::RawEmpresaRecord;
use crate::ui::{Outcome, Phase, Ui};
use crate::writer::RegistryStore;

/// Load the company export named in `config` and migrate it
pub fn run_company_migration(
    config: &Config,
    store: &mut RegistryStore,
    ui: &mut impl Ui,
) -> Result<MigrationSummary, MigrationError> {
    ui.set_phase(Phase::Loading);
    let records = load_companies(&config.companies_file)?;
    ui.set_info(format!(
        "{} companies in {}",
        records.len(),
        config.companies_file.display()
    ));

    migrate_companies(store, &records, &config.registrant, ui)
}

/// Insert every company inside a single transaction
///
/// A company whose CNPJ is already stored (including one inserted earlier in
/// this batch) is skipped. The first failing statement rolls back the whole
/// batch and is returned as [`MigrationError::CompanyBatchAborted`].
pub fn migrate_companies(
    store: &mut RegistryStore,
    records: &[RawEmpresaRecord],
    registrant: &str,
    ui: &mut impl Ui,
) -> Result<MigrationSummary, MigrationError> {
    ui.set_phase(Phase::MigratingCompanies);
    info!("Migrating {} companies", records.len());

    let total = records.len() as u64;
    let mut summary = MigrationSummary::new(records.len());

    let result: Result<(), MigrationError> = store.with_transaction(|tables| {
        for (idx, raw) in records.iter().enumerate() {
            let record = idx + 1;
            let name = display_name(raw.name.as_ref());
            ui.set_progress(record as u64, total, name.as_str());

            let row = map_company(raw, registrant);

            if let Some(cnpj) = row.cnpj.as_deref() {
                let exists = tables
                    .company_exists(cnpj)
                    .map_err(|source| MigrationError::CompanyBatchAborted { record, source })?;

                if exists {
                    warn!("Company {} ({}): CNPJ {} already exists, skipping", record, name, cnpj);
                    summary.skipped += 1;
                    ui.outcome(
                        Outcome::Skipped,
                        format!("{}: CNPJ {} already registered", name, cnpj),
                    );
                    continue;
                }
            }

            let id = tables
                .insert_company(&row)
                .map_err(|source| MigrationError::CompanyBatchAborted { record, source })?;

            debug!("Company {} ({}) inserted as IdEmpresa {}", record, name, id);
            summary.migrated += 1;
            ui.outcome(Outcome::Migrated, format!("{} -> IdEmpresa {}", name, id));
        }

        Ok(())
    });

    ui.clear_progress();

    match result {
        Ok(()) => {
            info!("Company migration finished: {}", summary);
            Ok(summary)
        }
        Err(err) => {
            error!("Company migration rolled back: {}", err);
            ui.outcome(Outcome::Failed, err.to_string());
            Err(err)
        }
    }
}
