use vita_types::{ScanStatus, VitalsReading};

use super::delta::{DeltaSource, round_to};

/// Allowed range and per-tick step of one simulated vital
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub decimals: u32,
}

impl VitalBounds {
    pub const SYSTOLIC: VitalBounds = VitalBounds::new(90.0, 180.0, 2.0, 0);
    pub const DIASTOLIC: VitalBounds = VitalBounds::new(60.0, 120.0, 1.0, 0);
    pub const HEART_RATE: VitalBounds = VitalBounds::new(50.0, 160.0, 3.0, 0);
    pub const SUGAR_LEVEL: VitalBounds = VitalBounds::new(70.0, 180.0, 1.5, 1);

    const fn new(min: f64, max: f64, step: f64, decimals: u32) -> Self {
        Self {
            min,
            max,
            step,
            decimals,
        }
    }

    /// Min then max, so NaN lands on `min`
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Apply one random step and bring the result back in range
    pub fn perturb(&self, value: f64, source: &dyn DeltaSource) -> f64 {
        let delta = source.next_delta(-self.step, self.step, self.decimals);
        round_to(self.clamp(value + delta), self.decimals)
    }
}

/// Scan/detect/update cycle for one AR view.
///
/// Pure state transitions; the timers that drive `scan_elapsed` and `tick`
/// live in [`super::VitalsMonitor`].
#[derive(Debug, Clone)]
pub struct VitalsMachine {
    status: ScanStatus,
    readings: VitalsReading,
    error_message: Option<String>,
    camera_on: bool,
}

impl VitalsMachine {
    pub fn new() -> Self {
        Self {
            status: ScanStatus::Scanning,
            readings: VitalsReading::INITIAL,
            error_message: None,
            camera_on: false,
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn readings(&self) -> VitalsReading {
        self.readings
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_camera_on(&self) -> bool {
        self.camera_on
    }

    /// New camera session: back to scanning with fresh readings
    pub fn camera_on(&mut self) {
        self.camera_on = true;
        self.status = ScanStatus::Scanning;
        self.error_message = None;
        self.readings = VitalsReading::INITIAL;
    }

    pub fn camera_off(&mut self) {
        self.camera_on = false;
    }

    /// Acquisition failed; stays in `Error` until the next `camera_on`
    pub fn camera_failed(&mut self, message: impl Into<String>) {
        self.status = ScanStatus::Error;
        self.error_message = Some(message.into());
    }

    /// Dwell time is over. Returns true if a subject is now detected.
    pub fn scan_elapsed(&mut self) -> bool {
        if self.camera_on && self.status == ScanStatus::Scanning {
            self.status = ScanStatus::Detected;
            true
        } else {
            false
        }
    }

    /// One update tick. `None` when not detecting, nothing changes then.
    pub fn tick(&mut self, source: &dyn DeltaSource) -> Option<VitalsReading> {
        if !self.camera_on || self.status != ScanStatus::Detected {
            return None;
        }

        let r = &mut self.readings;
        r.systolic = VitalBounds::SYSTOLIC.perturb(r.systolic, source);
        r.diastolic = VitalBounds::DIASTOLIC.perturb(r.diastolic, source);
        r.heart_rate = VitalBounds::HEART_RATE.perturb(r.heart_rate, source);
        r.sugar_level = VitalBounds::SUGAR_LEVEL.perturb(r.sugar_level, source);

        Some(self.readings)
    }
}

impl Default for VitalsMachine {
    fn default() -> Self {
        Self::new()
    }
}
