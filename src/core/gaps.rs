use crate::domain::model::OccupiedPortSet;

/// The port right after each run of consecutive occupied ports.
///
/// Holes between runs are not reported; the answer is what to use next after
/// each block. A run ending at `i64::MAX` has no successor.
pub fn next_available_ports(occupied: &OccupiedPortSet) -> Vec<i64> {
    occupied
        .runs()
        .filter_map(|(_, end)| end.checked_add(1))
        .collect()
}
