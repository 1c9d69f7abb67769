//! Per-port ONU occupancy model.
//!
//! The table is a dense slot x PON-port grid of state counters. Every
//! cell exists from the moment the table is created, so a renderer can
//! walk the full grid without distinguishing "never observed" from
//! "zero ONUs" - both read as all-zero counts.

use std::ops::RangeInclusive;

/// First physical card slot that can host PON ports.
pub const SLOT_FIRST: u8 = 2;
/// Last physical card slot that can host PON ports.
pub const SLOT_LAST: u8 = 7;
/// First PON interface index on a slot.
pub const PON_FIRST: u8 = 1;
/// Last PON interface index on a slot.
pub const PON_LAST: u8 = 24;

const SLOT_COUNT: usize = (SLOT_LAST - SLOT_FIRST + 1) as usize;
const PON_COUNT: usize = (PON_LAST - PON_FIRST + 1) as usize;

/// All valid slot ids, low to high.
pub fn slots() -> RangeInclusive<u8> {
    SLOT_FIRST..=SLOT_LAST
}

/// All valid PON port ids, low to high.
pub fn pon_ports() -> RangeInclusive<u8> {
    PON_FIRST..=PON_LAST
}

/// Registration state of a single ONU as reported by the OLT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnuState {
    /// ONU is up and carrying service.
    Online,
    /// ONU is known but currently unreachable.
    Offline,
    /// ONU registered but no service configured on it.
    Silent,
}

impl OnuState {
    /// Map a console state token to a state.
    ///
    /// Returns `None` for any token outside the three known ones;
    /// such lines are not ONU rows and contribute nothing.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Up" => Some(Self::Online),
            "Offline" => Some(Self::Offline),
            "Silent" => Some(Self::Silent),
            _ => None,
        }
    }
}

/// ONU counts for one (slot, PON port) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub online: u32,
    pub offline: u32,
    pub silent: u32,
}

impl StateCounts {
    /// Total ONUs observed on this port in any state.
    pub fn total(&self) -> u32 {
        self.online + self.offline + self.silent
    }

    /// True if no ONU was observed in any state.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// A port is idle (available for provisioning) iff it has no
    /// online ONU, regardless of offline/silent counts.
    pub fn is_idle(&self) -> bool {
        self.online == 0
    }

    fn bump(&mut self, state: OnuState) {
        match state {
            OnuState::Online => self.online += 1,
            OnuState::Offline => self.offline += 1,
            OnuState::Silent => self.silent += 1,
        }
    }
}

/// Dense occupancy table covering every (slot, PON port) pair.
///
/// Populated once by the line scanner, read-only afterwards. One
/// source document produces exactly one table; tables are never
/// merged across documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyTable {
    cells: [[StateCounts; PON_COUNT]; SLOT_COUNT],
}

impl OccupancyTable {
    /// Create a table with every cell zeroed.
    pub fn new() -> Self {
        Self {
            cells: [[StateCounts::default(); PON_COUNT]; SLOT_COUNT],
        }
    }

    fn index(slot: u8, port: u8) -> Option<(usize, usize)> {
        if slots().contains(&slot) && pon_ports().contains(&port) {
            Some((
                (slot - SLOT_FIRST) as usize,
                (port - PON_FIRST) as usize,
            ))
        } else {
            None
        }
    }

    /// Add one ONU in `state` to the given cell.
    ///
    /// Returns `false` when the pair falls outside the grid; the
    /// observation is discarded in that case.
    pub(crate) fn increment(&mut self, slot: u8, port: u8, state: OnuState) -> bool {
        match Self::index(slot, port) {
            Some((s, p)) => {
                self.cells[s][p].bump(state);
                true
            }
            None => false,
        }
    }

    /// Counts for a cell. `Some` for the whole valid grid, `None`
    /// outside it.
    pub fn get(&self, slot: u8, port: u8) -> Option<StateCounts> {
        Self::index(slot, port).map(|(s, p)| self.cells[s][p])
    }

    /// True iff the cell is in range and has no online ONU.
    pub fn is_idle(&self, slot: u8, port: u8) -> bool {
        self.get(slot, port).is_some_and(|c| c.is_idle())
    }

    /// True iff any port on the slot carries a non-zero count in any
    /// state. Rendering policy (whether to draw the slot block) keys
    /// off this query.
    pub fn has_any_data(&self, slot: u8) -> bool {
        pon_ports().any(|port| self.get(slot, port).is_some_and(|c| !c.is_empty()))
    }

    /// Number of idle cells across the whole grid.
    ///
    /// Cells that never received data count as idle too - their
    /// online count is 0. That conflates "confirmed empty" with
    /// "never observed" and is kept deliberately: the availability
    /// report treats both as provisionable.
    pub fn total_idle_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_idle())
            .count()
    }
}

impl Default for OccupancyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_grid_defined_when_empty() {
        let table = OccupancyTable::new();
        let mut cells = 0;
        for slot in slots() {
            for port in pon_ports() {
                let counts = table.get(slot, port).unwrap();
                assert_eq!(counts, StateCounts::default());
                assert!(table.is_idle(slot, port));
                cells += 1;
            }
        }
        assert_eq!(cells, 144);
        assert_eq!(table.total_idle_count(), 144);
    }

    #[test]
    fn test_out_of_range_cells_absent() {
        let table = OccupancyTable::new();
        assert!(table.get(1, 1).is_none());
        assert!(table.get(8, 1).is_none());
        assert!(table.get(2, 0).is_none());
        assert!(table.get(2, 25).is_none());
        assert!(!table.is_idle(8, 1));
    }

    #[test]
    fn test_increment_discards_out_of_range() {
        let mut table = OccupancyTable::new();
        assert!(!table.increment(9, 1, OnuState::Online));
        assert!(!table.increment(3, 25, OnuState::Online));
        assert!(table.increment(3, 5, OnuState::Online));
        assert_eq!(table.get(3, 5).unwrap().online, 1);
        assert_eq!(table.total_idle_count(), 143);
    }

    #[test]
    fn test_state_token_mapping() {
        assert_eq!(OnuState::from_token("Up"), Some(OnuState::Online));
        assert_eq!(OnuState::from_token("Offline"), Some(OnuState::Offline));
        assert_eq!(OnuState::from_token("Silent"), Some(OnuState::Silent));
        assert_eq!(OnuState::from_token("Disabled"), None);
        assert_eq!(OnuState::from_token("up"), None);
        assert_eq!(OnuState::from_token(""), None);
    }

    #[test]
    fn test_idle_ignores_offline_and_silent() {
        let counts = StateCounts {
            online: 0,
            offline: 5,
            silent: 2,
        };
        assert!(counts.is_idle());
        assert!(!counts.is_empty());

        let counts = StateCounts {
            online: 1,
            offline: 0,
            silent: 0,
        };
        assert!(!counts.is_idle());
    }

    #[test]
    fn test_has_any_data() {
        let mut table = OccupancyTable::new();
        assert!(!table.has_any_data(3));
        table.increment(3, 12, OnuState::Silent);
        assert!(table.has_any_data(3));
        assert!(!table.has_any_data(4));
    }
}
