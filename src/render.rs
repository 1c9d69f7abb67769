//! Plain-text occupancy report.
//!
//! Layout is deliberately minimal: one block per slot that carries
//! data, one row per PON port, and a footer with the device-wide
//! count of idle (provisionable) ports. Anything fancier - colors,
//! merged cells, spreadsheet styling - belongs to downstream tooling.

use std::io::{self, Write};

use crate::occupancy::{pon_ports, slots, OccupancyTable};

/// Write the occupancy report for one document.
///
/// Slots with no data at all are left out of the body; the idle
/// footer still spans the whole grid, so ports on unrendered slots
/// count as available.
pub fn write_report<W: Write>(table: &OccupancyTable, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>8} {:>6}",
        "port", "online", "offline", "silent", "idle"
    )?;

    for slot in slots() {
        if !table.has_any_data(slot) {
            continue;
        }
        writeln!(out, "slot {slot}")?;
        for port in pon_ports() {
            let counts = table.get(slot, port).unwrap_or_default();
            writeln!(
                out,
                "  pon {:<5} {:>8} {:>8} {:>8} {:>6}",
                port,
                counts.online,
                counts.offline,
                counts.silent,
                if counts.is_idle() { "yes" } else { "no" }
            )?;
        }
    }

    writeln!(out, "idle PON ports: {}", table.total_idle_count())?;
    Ok(())
}

/// Render the report into a `String`.
pub fn report_to_string(table: &OccupancyTable) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    write_report(table, &mut buf).expect("in-memory write");
    String::from_utf8_lossy(&buf).into_owned()
}
