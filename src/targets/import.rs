use std::io;

use super::target_form::TargetForm;
use super::Target;
use crate::gem_errors::GemError;

/// Import targets from a CSV document
///
/// The header row names [`TargetForm`] fields (`identifier`, `name`, `type`, `ra`, `dec`, ...);
/// unknown columns are ignored and missing columns stay unset.
///
/// Arguments
/// ---------
/// * `reader`: the CSV source
/// * `first_id`: id given to the first imported target, the following rows count up from it
///
/// Return
/// ------
/// * The imported targets, or [`GemError::TargetImport`] naming the first bad line
pub fn import_targets<R: io::Read>(reader: R, first_id: u64) -> Result<Vec<Target>, GemError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut targets = Vec::new();
    for (id, record) in (first_id..).zip(csv_reader.records()) {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let form: TargetForm = record
            .deserialize(Some(&headers))
            .map_err(|e| GemError::TargetImport {
                line,
                reason: e.to_string(),
            })?;
        let target = form.create(id).map_err(|e| GemError::TargetImport {
            line,
            reason: e.to_string(),
        })?;
        targets.push(target);
    }

    tracing::debug!(count = targets.len(), "imported targets");
    Ok(targets)
}
