//! Line classifier for `dis onu slot` console captures.
//!
//! OLT console output is not a clean grammar: delimiters vary,
//! pagination repeats table headers, and summary rows sit between
//! data rows. The scanner makes a single forward pass, carrying the
//! active slot and PON port as mutable state, and classifies every
//! line into exactly one of four branches tried in priority order:
//! slot marker, PON header, noise, data. No line ever fails the scan;
//! anything unrecognized is skipped.

use log::trace;
use regex::Regex;

use crate::occupancy::{slots, OccupancyTable, OnuState};

/// Slot-display command echo, in either the abbreviated form the
/// operators type (`dis onu slot N`) or the full form (`display onu
/// slot N`). The slot number group is optional so that a truncated
/// echo still consumes the line without touching scanner state.
const SLOT_MARKER_PATTERN: &str = r"dis(?:play)?\s+onu\s+slot(?:\s+(\d+))?";

/// Column-header keywords repeated by the paginated console. A line
/// containing any of them is a header row, not an ONU row.
const NOISE_KEYWORDS: [&str; 5] = ["State", "MAC", "LOID", "LLID", "Port"];

/// Stateful single-pass scanner producing an [`OccupancyTable`].
///
/// Feed lines in document order, then call [`finish`](Self::finish).
/// One scanner handles one document; state never leaks across parses.
pub struct LineScanner {
    slot_re: Regex,
    port_re: Regex,
    current_slot: Option<u8>,
    current_port: Option<u32>,
    table: OccupancyTable,
}

impl LineScanner {
    /// Create a scanner with a fresh all-zero table.
    pub fn new() -> Self {
        Self {
            slot_re: Regex::new(SLOT_MARKER_PATTERN).expect("hard-coded pattern compiles"),
            port_re: Regex::new(r"Olt\d+/0/(\d+)").expect("hard-coded pattern compiles"),
            current_slot: None,
            current_port: None,
            table: OccupancyTable::new(),
        }
    }

    /// Classify one line and update counters.
    pub fn feed(&mut self, line: &str) {
        let line = line.trim();

        // 1. Slot marker. Out-of-range slot numbers clear the active
        //    slot instead of being stored, so later data lines cannot
        //    land outside the grid. The active PON port is NOT reset
        //    here - observed console behavior, kept as-is.
        if let Some(cap) = self.slot_re.captures(line) {
            if let Some(number) = cap.get(1) {
                self.current_slot = number
                    .as_str()
                    .parse::<u8>()
                    .ok()
                    .filter(|n| slots().contains(n));
                trace!("slot marker: active slot now {:?}", self.current_slot);
            }
            return;
        }

        // 2. PON header. No range check at this point; an out-of-range
        //    port is carried and every increment against it discarded.
        if self.current_slot.is_some() && line.contains("Olt") && line.contains("/0/") {
            if let Some(cap) = self.port_re.captures(line) {
                if let Ok(n) = cap[1].parse::<u32>() {
                    self.current_port = Some(n);
                }
            }
            return;
        }

        // 3. Repeated table headers from the paginated source.
        if NOISE_KEYWORDS.iter().any(|k| line.contains(k)) {
            return;
        }

        // 4. Data line: both state fields set, non-empty, not a
        //    separator row. The second-to-last whitespace token is the
        //    state column.
        if let (Some(slot), Some(port)) = (self.current_slot, self.current_port) {
            if line.is_empty() || line.starts_with('-') {
                return;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return;
            }
            if let Some(state) = OnuState::from_token(parts[parts.len() - 2]) {
                let kept = u8::try_from(port)
                    .is_ok_and(|p| self.table.increment(slot, p, state));
                if !kept {
                    trace!("discarding {state:?} on out-of-range port {port} (slot {slot})");
                }
            }
        }
    }

    /// Consume the scanner and hand out the populated table.
    pub fn finish(self) -> OccupancyTable {
        self.table
    }
}

impl Default for LineScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan an ordered sequence of lines into a table.
pub fn parse_lines<I, S>(lines: I) -> OccupancyTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = LineScanner::new();
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

/// Scan a whole capture document into a table.
pub fn parse_text(text: &str) -> OccupancyTable {
    parse_lines(text.lines())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::{pon_ports, slots, StateCounts};

    #[test]
    fn test_end_to_end_scenario() {
        let table = parse_lines([
            "display onu slot 3",
            "-- Olt3/0/5 --",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
            "aaaa-bbbb-cccd Onu3/5/2 Offline 102",
        ]);

        assert_eq!(
            table.get(3, 5).unwrap(),
            StateCounts {
                online: 1,
                offline: 1,
                silent: 0
            }
        );
        assert!(!table.is_idle(3, 5));
        assert!(table.has_any_data(3));

        for slot in slots() {
            for port in pon_ports() {
                if (slot, port) != (3, 5) {
                    assert_eq!(table.get(slot, port).unwrap(), StateCounts::default());
                    assert!(table.is_idle(slot, port));
                }
            }
        }
        assert_eq!(table.total_idle_count(), 143);
    }

    #[test]
    fn test_silent_state_counted() {
        let table = parse_lines([
            "dis onu slot 4",
            "-- Olt4/0/1 --",
            "aaaa-bbbb-cccc Onu4/1/1 Silent 7",
        ]);
        assert_eq!(table.get(4, 1).unwrap().silent, 1);
    }

    #[test]
    fn test_unknown_state_token_ignored() {
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/5 --",
            "aaaa-bbbb-cccc Onu3/5/1 Disabled 101",
        ]);
        assert_eq!(table.get(3, 5).unwrap(), StateCounts::default());
        assert_eq!(table.total_idle_count(), 144);
    }

    #[test]
    fn test_header_noise_rejected() {
        // Superficially a data row (>= 2 tokens), but any header
        // keyword disqualifies it.
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/5 --",
            "MAC LLID State Port",
            "State Up extra",
        ]);
        assert_eq!(table.get(3, 5).unwrap(), StateCounts::default());
    }

    #[test]
    fn test_out_of_range_slot_clears_active_slot() {
        let table = parse_lines([
            "dis onu slot 9",
            "-- Olt9/0/5 --",
            "aaaa-bbbb-cccc Onu9/5/1 Up 101",
        ]);
        for slot in slots() {
            assert!(!table.has_any_data(slot));
        }
        assert_eq!(table.total_idle_count(), 144);
    }

    #[test]
    fn test_out_of_range_slot_after_valid_one() {
        // Slot 9 clears the active slot; data under it is inert even
        // though slot 3 was valid earlier in the document.
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/5 --",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
            "dis onu slot 9",
            "aaaa-bbbb-cccc Onu9/5/1 Up 102",
        ]);
        assert_eq!(table.get(3, 5).unwrap().online, 1);
        assert_eq!(table.total_idle_count(), 143);
    }

    #[test]
    fn test_out_of_range_port_discarded() {
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/25 --",
            "aaaa-bbbb-cccc Onu3/25/1 Up 101",
        ]);
        assert!(!table.has_any_data(3));
        assert_eq!(table.total_idle_count(), 144);
    }

    #[test]
    fn test_lines_before_any_marker_inert() {
        let table = parse_lines([
            "Welcome to OLT-7606",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
            "-- Olt3/0/5 --",
        ]);
        assert_eq!(table.total_idle_count(), 144);
    }

    #[test]
    fn test_separator_and_short_lines_skipped() {
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/5 --",
            "----------------",
            "Up",
            "",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
        ]);
        assert_eq!(table.get(3, 5).unwrap().online, 1);
    }

    #[test]
    fn test_scanner_keeps_port_across_slot_marker() {
        // Known quirk kept from the field tool: a new slot marker does
        // not reset the active PON port, so a data line arriving
        // before the new slot's first PON header lands on the stale
        // port index under the new slot.
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/5 --",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
            "dis onu slot 4",
            "aaaa-bbbb-cccd Onu4/?/? Up 102",
        ]);
        assert_eq!(table.get(3, 5).unwrap().online, 1);
        assert_eq!(table.get(4, 5).unwrap().online, 1);
    }

    #[test]
    fn test_idempotent_across_parses() {
        let lines = [
            "dis onu slot 5",
            "-- Olt5/0/7 --",
            "aaaa-bbbb-cccc Onu5/7/1 Up 101",
            "aaaa-bbbb-cccd Onu5/7/2 Silent 102",
        ];
        let first = parse_lines(lines);
        let second = parse_lines(lines);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pon_header_ignored_without_active_slot() {
        let table = parse_lines([
            "-- Olt3/0/5 --",
            "dis onu slot 3",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
        ]);
        // The header came before any slot marker, so no port is
        // active and the data line is inert.
        assert_eq!(table.total_idle_count(), 144);
    }

    #[test]
    fn test_marker_without_number_keeps_state() {
        let table = parse_lines([
            "dis onu slot 3",
            "-- Olt3/0/5 --",
            "dis onu slot",
            "aaaa-bbbb-cccc Onu3/5/1 Up 101",
        ]);
        assert_eq!(table.get(3, 5).unwrap().online, 1);
    }

    #[test]
    fn test_realistic_capture() {
        let text = "\
OLT-7606>dis onu slot 2
  ---------------------------------- Olt2/0/1 ----------------------------------
  MAC            LOID           State     LLID
  aaaa-bbbb-0001 Onu2/1/1       Up        1
  aaaa-bbbb-0002 Onu2/1/2       Offline   2
  aaaa-bbbb-0003 Onu2/1/3       Up        3
  ---------------------------------- Olt2/0/2 ----------------------------------
  aaaa-bbbb-0004 Onu2/2/1       Silent    1
  ONUs found: 4
OLT-7606>dis onu slot 3
  ---------------------------------- Olt3/0/24 ---------------------------------
  aaaa-bbbb-0005 Onu3/24/1      Up        1
  ONUs found: 1
";
        let table = parse_text(text);
        assert_eq!(
            table.get(2, 1).unwrap(),
            StateCounts {
                online: 2,
                offline: 1,
                silent: 0
            }
        );
        assert_eq!(table.get(2, 2).unwrap().silent, 1);
        assert!(table.is_idle(2, 2));
        assert_eq!(table.get(3, 24).unwrap().online, 1);
        assert!(table.has_any_data(2));
        assert!(table.has_any_data(3));
        assert!(!table.has_any_data(7));
    }
}
