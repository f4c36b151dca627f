//! CSV export for sizing reports.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::SizingReport;

/// Column header for sizing CSV export.
const HEADER: &str = "label,location,sun_hours,backup_hours,total_wattage_w,\
                       daily_energy_kwh,inverter_kva,inverter_kw,battery_ah,\
                       battery_voltage_v,battery_wh,panel_count,panel_wattage_w";

/// Exports one row per report to a CSV file at `path`.
///
/// # Arguments
///
/// * `reports` - Sized profiles, one CSV row each
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(reports: &[SizingReport], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(reports, buf)
}

/// Writes sizing reports as CSV to any writer.
///
/// Unset label, location, or sun-hours become empty cells.
///
/// # Arguments
///
/// * `reports` - Sized profiles, one CSV row each
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(reports: &[SizingReport], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in reports {
        let s = &r.result;
        wtr.write_record(&[
            r.label.clone().unwrap_or_default(),
            r.location.clone().unwrap_or_default(),
            r.sun_hours.map(|h| h.to_string()).unwrap_or_default(),
            r.backup_hours.to_string(),
            s.total_wattage.to_string(),
            format!("{:.3}", s.daily_energy_kwh),
            s.inverter_size_kva.to_string(),
            format!("{:.2}", s.inverter_size_kw),
            s.battery_capacity_ah.to_string(),
            s.battery_voltage.to_string(),
            s.battery_capacity_wh.to_string(),
            s.panel_count.to_string(),
            s.single_panel_wattage.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::profile::LoadProfile;
    use crate::report::size_profile;

    fn reports(n: usize) -> Vec<SizingReport> {
        let catalog = RuleCatalog::from_preset("standard").expect("standard loads");
        (0..n)
            .map(|i| {
                let mut profile = LoadProfile::new();
                profile.label = Some(format!("home {i}"));
                profile.set_quantity("fan", u32::try_from(i).unwrap_or(0) + 1);
                profile.set_location("Abuja");
                size_profile(&profile, &catalog)
            })
            .collect()
    }

    fn render(reports: &[SizingReport]) -> String {
        let mut buf = Vec::new();
        write_csv(reports, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_is_stable() {
        let output = render(&reports(1));
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "label,location,sun_hours,backup_hours,total_wattage_w,\
             daily_energy_kwh,inverter_kva,inverter_kw,battery_ah,\
             battery_voltage_v,battery_wh,panel_count,panel_wattage_w"
        );
    }

    #[test]
    fn one_row_per_report() {
        let output = render(&reports(4));
        // 1 header + 4 data rows
        assert_eq!(output.lines().count(), 5);
        assert_eq!(render(&reports(4)), output);
    }

    #[test]
    fn rows_parse_back() {
        let output = render(&reports(2));
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "home 1");
        assert_eq!(&rows[1][1], "Abuja");
        assert_eq!(&rows[1][2], "6");
        assert_eq!(&rows[1][4], "150");
        assert_eq!(&rows[1][11], "2");
    }

    #[test]
    fn unset_context_is_left_blank() {
        let catalog = RuleCatalog::from_preset("standard").expect("standard loads");
        let report = size_profile(&LoadProfile::new(), &catalog);
        let output = render(&[report]);
        let row = output.lines().nth(1).unwrap_or("");
        assert!(row.starts_with(",,,0,0,"), "{row}");
    }
}
