//! Schedule CSV layout: a short header block, a blank line, then one row per
//! installment.

use csv::WriterBuilder;
use echeancier_core_rs::export::ScheduleExport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_schedule(path: &Path, export: &ScheduleExport) -> csv::Result<()> {
    let mut header = WriterBuilder::new().flexible(true).from_path(path)?;
    header.write_record(["Client", export.client_name.as_str()])?;
    header.write_record(["Montant total", export.total_amount.to_string().as_str()])?;
    header.write_record(["Date de départ", export.start_date.to_string().as_str()])?;

    // Bare separator line (csv writes an empty record as `""`)
    let mut file: File = header.into_inner().map_err(|err| err.into_error())?;
    file.write_all(b"\n")?;

    let mut rows = WriterBuilder::new().from_writer(file);
    rows.write_record(["#", "Échéance", "Montant", "Payé", "Reste", "Clos?"])?;
    for row in &export.rows {
        rows.write_record([
            row.number.to_string(),
            row.due_date.to_string(),
            row.amount.to_string(),
            row.paid.to_string(),
            row.remaining.to_string(),
            if row.closed { "Oui" } else { "Non" }.to_string(),
        ])?;
    }

    rows.flush()?;
    Ok(())
}
