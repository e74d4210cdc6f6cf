use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::MigrationError;
use crate::parser::{EmpresaExport, RawEmpresaRecord, RawSocioRecord, SocioExport};

/// Read and decode a whole export document
fn read_export<T: DeserializeOwned>(path: &Path) -> Result<T, MigrationError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => MigrationError::InputNotFound(path.to_path_buf()),
        _ => MigrationError::ReadInput {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&text).map_err(|source| MigrationError::MalformedInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the `Empresa` collection (missing key = no companies)
pub fn load_companies(path: &Path) -> Result<Vec<RawEmpresaRecord>, MigrationError> {
    let export: EmpresaExport = read_export(path)?;
    debug!("Loaded {} companies from {:?}", export.records.len(), path);
    Ok(export.records)
}

/// Load the `Socio` collection (missing key = no members)
pub fn load_members(path: &Path) -> Result<Vec<RawSocioRecord>, MigrationError> {
    let export: SocioExport = read_export(path)?;
    debug!("Loaded {} members from {:?}", export.records.len(), path);
    Ok(export.records)
}
