//! External trigger signals.
//!
//! Two onboard buttons drive the scheduler: RM advances the selection,
//! PWR executes the selected task. Shutdown comes from the host.

use crate::config::{BUTTON_ADVANCE_SCAN_CODE, BUTTON_EXECUTE_SCAN_CODE};

/// Signals consumed by [`crate::scheduler::TaskScheduler::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Release the selected task and select the next one.
    Advance,
    /// Run the selected task.
    Execute,
    /// Release the selected task and stop the worker.
    Shutdown,
}

impl Trigger {
    /// Map a key-down scan code to a trigger.
    pub fn from_scan_code(code: u16) -> Option<Self> {
        match code {
            BUTTON_ADVANCE_SCAN_CODE => Some(Trigger::Advance),
            BUTTON_EXECUTE_SCAN_CODE => Some(Trigger::Execute),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edison_buttons_map() {
        assert_eq!(Trigger::from_scan_code(148), Some(Trigger::Advance));
        assert_eq!(Trigger::from_scan_code(116), Some(Trigger::Execute));
    }

    #[test]
    fn other_codes_ignored() {
        assert_eq!(Trigger::from_scan_code(0), None);
        assert_eq!(Trigger::from_scan_code(117), None);
    }
}
