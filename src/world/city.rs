//! City sites and the control state machine (world mode)
//!
//! Cities are never destroyed, only re-stated. Every transition passes
//! through its intermediate state: an enemy must neutralize a controlled
//! city before it can claim it, and a peace window always reverts to
//! neutral on expiry.

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, Side};

/// Control state of a city site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityControl {
    Neutral,
    /// A side is working the site toward control
    Stabilizing { owner: Side, progress: u32 },
    /// Captured; `hold` is worn down by pacification
    Controlled { owner: Side, hold: u32 },
    /// Joint-pacified truce; both sides draw peace income until expiry
    PeaceWindow { remaining: u32 },
}

impl CityControl {
    pub fn controller(&self) -> Option<Side> {
        match self {
            CityControl::Controlled { owner, .. } => Some(*owner),
            _ => None,
        }
    }

    pub fn in_peace_window(&self) -> bool {
        matches!(self, CityControl::PeaceWindow { .. })
    }
}

/// State-machine transition worth reporting as a match event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityTransition {
    Captured { by: Side },
    Neutralized { former: Side },
    PeaceBrokered,
    PeaceEnded,
}

/// A capturable/pacifiable map feature yielding periodic income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySite {
    pub position: Position,
    pub control: CityControl,
    /// Most recent side to hold the city, kept for reporting
    pub last_controller: Option<Side>,
    /// Accumulated pacify effort while neutral; once both sides have
    /// contributed, the peace window opens. Stabilization work resets it.
    pacified_by: [bool; 2],
}

impl CitySite {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            control: CityControl::Neutral,
            last_controller: None,
            pacified_by: [false; 2],
        }
    }

    /// May `side` perform stabilization work here right now?
    ///
    /// Not against an enemy-held city (it must be neutralized first) and
    /// not during a peace window.
    pub fn permits_stabilize(&self, side: Side) -> bool {
        match self.control {
            CityControl::Neutral | CityControl::Stabilizing { .. } => true,
            CityControl::Controlled { owner, .. } => owner == side,
            CityControl::PeaceWindow { .. } => false,
        }
    }

    /// May `side` perform pacification work here right now?
    pub fn permits_pacify(&self, _side: Side) -> bool {
        !self.control.in_peace_window()
    }

    /// One turn of stabilization work by `side`.
    ///
    /// Same-side work accumulates toward `threshold`; rival work on a
    /// contested site erodes the current worker's progress instead.
    pub(crate) fn apply_stabilize(&mut self, side: Side, threshold: u32) -> Option<CityTransition> {
        match self.control {
            CityControl::Neutral => {
                // A claim attempt scraps any ongoing peace effort
                self.pacified_by = [false; 2];
                self.control = CityControl::Stabilizing {
                    owner: side,
                    progress: 1,
                };
                self.check_capture(threshold)
            }
            CityControl::Stabilizing { owner, progress } if owner == side => {
                self.control = CityControl::Stabilizing {
                    owner,
                    progress: progress + 1,
                };
                self.check_capture(threshold)
            }
            CityControl::Stabilizing { owner, progress } => {
                // Contested: erode the rival's progress back toward neutral
                if progress <= 1 {
                    self.control = CityControl::Neutral;
                } else {
                    self.control = CityControl::Stabilizing {
                        owner,
                        progress: progress - 1,
                    };
                }
                None
            }
            CityControl::Controlled { owner, .. } if owner == side => {
                // Fortify: restore the hold to full
                self.control = CityControl::Controlled {
                    owner,
                    hold: threshold,
                };
                None
            }
            // Enemy-controlled or peace window: the validator downgrades
            // these to Idle, so nothing to do
            CityControl::Controlled { .. } | CityControl::PeaceWindow { .. } => None,
        }
    }

    fn check_capture(&mut self, threshold: u32) -> Option<CityTransition> {
        if let CityControl::Stabilizing { owner, progress } = self.control {
            if progress >= threshold {
                self.control = CityControl::Controlled {
                    owner,
                    hold: threshold,
                };
                self.last_controller = Some(owner);
                return Some(CityTransition::Captured { by: owner });
            }
        }
        None
    }

    /// One turn of pacification work by `side`.
    ///
    /// Wears down a controlled city's hold (control is lost at zero, the
    /// city turning neutral before anyone can re-claim it); on a neutral
    /// city it marks this side's half of a joint peace effort.
    pub(crate) fn apply_pacify(&mut self, side: Side) -> Option<CityTransition> {
        match self.control {
            CityControl::Controlled { owner, hold } => {
                if hold <= 1 {
                    self.control = CityControl::Neutral;
                    self.last_controller = Some(owner);
                    self.pacified_by = [false; 2];
                    Some(CityTransition::Neutralized { former: owner })
                } else {
                    self.control = CityControl::Controlled {
                        owner,
                        hold: hold - 1,
                    };
                    None
                }
            }
            CityControl::Stabilizing { owner, progress } => {
                if progress <= 1 {
                    self.control = CityControl::Neutral;
                } else {
                    self.control = CityControl::Stabilizing {
                        owner,
                        progress: progress - 1,
                    };
                }
                None
            }
            CityControl::Neutral => {
                self.pacified_by[side.index()] = true;
                None
            }
            CityControl::PeaceWindow { .. } => None,
        }
    }

    /// End-of-economy check: once both sides have put pacify work into a
    /// neutral city (a cell holds one unit, so the effort spans turns), its
    /// peace window opens.
    pub(crate) fn close_economy_phase(&mut self, peace_duration: u32) -> Option<CityTransition> {
        if self.pacified_by == [true, true] && self.control == CityControl::Neutral {
            self.pacified_by = [false; 2];
            self.control = CityControl::PeaceWindow {
                remaining: peace_duration,
            };
            return Some(CityTransition::PeaceBrokered);
        }
        None
    }

    /// Income-phase countdown of an open peace window
    pub(crate) fn tick_peace_window(&mut self) -> Option<CityTransition> {
        if let CityControl::PeaceWindow { remaining } = self.control {
            if remaining <= 1 {
                self.control = CityControl::Neutral;
                return Some(CityTransition::PeaceEnded);
            }
            self.control = CityControl::PeaceWindow {
                remaining: remaining - 1,
            };
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> CitySite {
        CitySite::new(Position::new(3, 3))
    }

    #[test]
    fn test_stabilize_to_capture() {
        let mut c = city();
        assert_eq!(c.apply_stabilize(Side::Blue, 2), None);
        assert_eq!(
            c.control,
            CityControl::Stabilizing {
                owner: Side::Blue,
                progress: 1
            }
        );
        assert_eq!(
            c.apply_stabilize(Side::Blue, 2),
            Some(CityTransition::Captured { by: Side::Blue })
        );
        assert_eq!(c.control.controller(), Some(Side::Blue));
        assert_eq!(c.last_controller, Some(Side::Blue));
    }

    #[test]
    fn test_contested_stabilize_erodes_progress() {
        let mut c = city();
        c.apply_stabilize(Side::Blue, 3);
        c.apply_stabilize(Side::Blue, 3);
        // Red contests, eroding Blue's progress
        assert_eq!(c.apply_stabilize(Side::Red, 3), None);
        assert_eq!(
            c.control,
            CityControl::Stabilizing {
                owner: Side::Blue,
                progress: 1
            }
        );
        c.apply_stabilize(Side::Red, 3);
        assert_eq!(c.control, CityControl::Neutral);
    }

    #[test]
    fn test_no_direct_flip_between_controllers() {
        let mut c = city();
        c.apply_stabilize(Side::Blue, 1);
        assert_eq!(c.control.controller(), Some(Side::Blue));

        // Red cannot stabilize an enemy-held city at all
        assert!(!c.permits_stabilize(Side::Red));

        // Red must pacify down to neutral first
        assert_eq!(
            c.apply_pacify(Side::Red),
            Some(CityTransition::Neutralized { former: Side::Blue })
        );
        assert_eq!(c.control, CityControl::Neutral);

        // Only now can Red begin its own claim
        assert!(c.permits_stabilize(Side::Red));
        assert_eq!(
            c.apply_stabilize(Side::Red, 1),
            Some(CityTransition::Captured { by: Side::Red })
        );
    }

    #[test]
    fn test_fortify_restores_hold() {
        let mut c = city();
        c.apply_stabilize(Side::Blue, 2);
        c.apply_stabilize(Side::Blue, 2);
        c.apply_pacify(Side::Red);
        assert_eq!(
            c.control,
            CityControl::Controlled {
                owner: Side::Blue,
                hold: 1
            }
        );
        c.apply_stabilize(Side::Blue, 2);
        assert_eq!(
            c.control,
            CityControl::Controlled {
                owner: Side::Blue,
                hold: 2
            }
        );
    }

    #[test]
    fn test_joint_pacify_opens_peace_window() {
        let mut c = city();
        c.apply_pacify(Side::Blue);
        assert_eq!(c.close_economy_phase(4), None); // one side is not enough

        // Red's contribution on a later turn completes the effort
        c.apply_pacify(Side::Red);
        assert_eq!(c.close_economy_phase(4), Some(CityTransition::PeaceBrokered));
        assert_eq!(c.control, CityControl::PeaceWindow { remaining: 4 });

        // No work permitted during the window
        assert!(!c.permits_stabilize(Side::Blue));
        assert!(!c.permits_pacify(Side::Red));
    }

    #[test]
    fn test_stabilize_scraps_peace_effort() {
        let mut c = city();
        c.apply_pacify(Side::Blue);
        c.close_economy_phase(4);
        // Red claims instead of cooperating, then backs off
        c.apply_stabilize(Side::Red, 3);
        c.apply_pacify(Side::Red); // erodes Red's own progress to neutral
        assert_eq!(c.control, CityControl::Neutral);
        // Blue's old mark is gone; Red alone cannot open the window
        c.apply_pacify(Side::Red);
        assert_eq!(c.close_economy_phase(4), None);
    }

    #[test]
    fn test_peace_window_expires_to_neutral() {
        let mut c = city();
        c.control = CityControl::PeaceWindow { remaining: 2 };
        assert_eq!(c.tick_peace_window(), None);
        assert_eq!(c.control, CityControl::PeaceWindow { remaining: 1 });
        assert_eq!(c.tick_peace_window(), Some(CityTransition::PeaceEnded));
        assert_eq!(c.control, CityControl::Neutral);
    }
}
