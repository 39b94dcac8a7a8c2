//! Button input sampling and press classification.
//!
//! The appliance has a single push button wired between a pulled-up GPIO
//! input and ground. There is no interrupt-driven edge detection: the control
//! loop samples the level on every tick and [`PressClassifier`] compares each
//! sample against the last known level. A press is classified on its release
//! edge by how long the input was held low.

use std::time::Instant;

/// Logic level of the button input.
///
/// The input is pulled up, so `High` means released and `Low` means pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLevel {
    /// Button released (input pulled up).
    #[default]
    High,
    /// Button pressed (input switched to ground).
    Low,
}

/// Classification of a button press, produced on the release edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressEvent {
    /// No complete press this tick.
    None,
    /// Press shorter than the debounce threshold; treated as switch bounce.
    Ignored,
    /// Press between the debounce and short-press thresholds.
    Short,
    /// Press at or above the short-press threshold.
    Long,
}

/// Source of button level samples.
///
/// The hardware implementation is [`GpioButton`]; when no GPIO capability is
/// available the appliance degrades to [`NoButton`].
pub trait ButtonInput: Send {
    /// Read the current logic level of the button input.
    fn read_level(&mut self) -> InputLevel;
}

impl ButtonInput for Box<dyn ButtonInput> {
    fn read_level(&mut self) -> InputLevel {
        (**self).read_level()
    }
}

/// Edge-triggered press classifier for a polled input.
///
/// Duration is measured between the two poll samples that observe the press
/// and release edges, so its resolution is the poll period. Exactly one event
/// is emitted per release edge.
#[derive(Debug)]
pub struct PressClassifier {
    debounce_ms: u64,
    shortpress_ms: u64,
    last_level: InputLevel,
    last_change: Instant,
}

impl PressClassifier {
    /// Create a classifier with the given duration thresholds.
    ///
    /// The baseline level is `High` (released); a button already held down at
    /// startup produces its event on the following release edge.
    pub fn new(debounce_ms: u64, shortpress_ms: u64, now: Instant) -> Self {
        Self {
            debounce_ms,
            shortpress_ms,
            last_level: InputLevel::High,
            last_change: now,
        }
    }

    /// Feed one sample to the classifier.
    ///
    /// Returns `PressEvent::None` unless this sample is a release edge, in
    /// which case the completed press is bucketed by duration:
    /// below `debounce_ms` it is `Ignored`, below `shortpress_ms` it is
    /// `Short`, and anything at or above `shortpress_ms` is `Long`.
    pub fn sample(&mut self, level: InputLevel, now: Instant) -> PressEvent {
        if level == self.last_level {
            return PressEvent::None;
        }

        let event = match level {
            // Falling edge: press begins, nothing to classify yet.
            InputLevel::Low => PressEvent::None,
            // Rising edge: press complete, bucket it by duration.
            InputLevel::High => {
                let held_ms = now.saturating_duration_since(self.last_change).as_millis() as u64;
                if held_ms < self.debounce_ms {
                    PressEvent::Ignored
                } else if held_ms < self.shortpress_ms {
                    PressEvent::Short
                } else {
                    PressEvent::Long
                }
            }
        };

        self.last_level = level;
        self.last_change = now;
        event
    }
}

/// Degraded input used when no GPIO capability is available.
///
/// Always reads `High`, so the classifier never sees an edge and the button
/// path permanently reports no events.
#[derive(Debug, Default)]
pub struct NoButton;

impl ButtonInput for NoButton {
    fn read_level(&mut self) -> InputLevel {
        InputLevel::High
    }
}

/// Raspberry Pi GPIO button input.
#[cfg(feature = "gpio")]
pub mod gpio {
    use rppal::gpio::{Gpio, InputPin};
    use tracing::debug;

    use super::{ButtonInput, InputLevel};
    use crate::error::Result;

    /// A button on a BCM-numbered GPIO pin with the internal pull-up enabled.
    #[derive(Debug)]
    pub struct GpioButton {
        pin: InputPin,
    }

    impl GpioButton {
        /// Claim the given BCM pin as a pulled-up input.
        ///
        /// # Errors
        ///
        /// Returns an error if the GPIO peripheral is unavailable or the pin
        /// cannot be claimed; callers treat that as missing input capability
        /// and fall back to [`super::NoButton`].
        pub fn new(bcm_pin: u8) -> Result<Self> {
            let pin = Gpio::new()?.get(bcm_pin)?.into_input_pullup();
            debug!(bcm_pin, "claimed button GPIO");
            Ok(Self { pin })
        }
    }

    impl ButtonInput for GpioButton {
        fn read_level(&mut self) -> InputLevel {
            if self.pin.is_low() {
                InputLevel::Low
            } else {
                InputLevel::High
            }
        }
    }
}

#[cfg(feature = "gpio")]
pub use gpio::GpioButton;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    const DEBOUNCE_MS: u64 = 50;
    const SHORTPRESS_MS: u64 = 1000;

    fn classifier(start: Instant) -> PressClassifier {
        PressClassifier::new(DEBOUNCE_MS, SHORTPRESS_MS, start)
    }

    fn press_for(duration_ms: u64) -> PressEvent {
        let t0 = Instant::now();
        let mut c = classifier(t0);
        assert_eq!(c.sample(InputLevel::Low, t0 + Duration::from_millis(10)), PressEvent::None);
        c.sample(
            InputLevel::High,
            t0 + Duration::from_millis(10 + duration_ms),
        )
    }

    #[test]
    fn steady_level_produces_no_event() {
        let t0 = Instant::now();
        let mut c = classifier(t0);
        for i in 0..10 {
            let now = t0 + Duration::from_millis(200 * i);
            assert_eq!(c.sample(InputLevel::High, now), PressEvent::None);
        }
    }

    #[test]
    fn press_edge_produces_no_event() {
        let t0 = Instant::now();
        let mut c = classifier(t0);
        assert_eq!(c.sample(InputLevel::Low, t0), PressEvent::None);
        // Held down: still nothing.
        assert_eq!(
            c.sample(InputLevel::Low, t0 + Duration::from_secs(5)),
            PressEvent::None
        );
    }

    #[test]
    fn bounce_is_ignored() {
        assert_eq!(press_for(30), PressEvent::Ignored);
    }

    #[test]
    fn short_press_classifies_short() {
        assert_eq!(press_for(500), PressEvent::Short);
    }

    #[test]
    fn long_press_classifies_long() {
        assert_eq!(press_for(1500), PressEvent::Long);
    }

    #[test]
    fn debounce_boundary_is_short() {
        assert_eq!(press_for(DEBOUNCE_MS), PressEvent::Short);
    }

    #[test]
    fn shortpress_boundary_is_long() {
        assert_eq!(press_for(SHORTPRESS_MS), PressEvent::Long);
    }

    #[test]
    fn one_event_per_release_edge() {
        let t0 = Instant::now();
        let mut c = classifier(t0);
        c.sample(InputLevel::Low, t0 + Duration::from_millis(100));
        let release = t0 + Duration::from_millis(600);
        assert_eq!(c.sample(InputLevel::High, release), PressEvent::Short);
        // The level stays high; the same press must not fire again.
        for i in 1..5 {
            let now = release + Duration::from_millis(200 * i);
            assert_eq!(c.sample(InputLevel::High, now), PressEvent::None);
        }
    }

    #[test]
    fn duration_measured_from_press_edge_not_construction() {
        let t0 = Instant::now();
        let mut c = classifier(t0);
        // Long idle period before the press must not inflate the duration.
        let press = t0 + Duration::from_secs(60);
        c.sample(InputLevel::Low, press);
        assert_eq!(
            c.sample(InputLevel::High, press + Duration::from_millis(200)),
            PressEvent::Short
        );
    }

    #[test]
    fn consecutive_presses_classify_independently() {
        let t0 = Instant::now();
        let mut c = classifier(t0);

        c.sample(InputLevel::Low, t0);
        assert_eq!(
            c.sample(InputLevel::High, t0 + Duration::from_millis(1500)),
            PressEvent::Long
        );

        let t1 = t0 + Duration::from_secs(10);
        c.sample(InputLevel::Low, t1);
        assert_eq!(
            c.sample(InputLevel::High, t1 + Duration::from_millis(30)),
            PressEvent::Ignored
        );
    }

    #[test]
    fn no_button_always_reads_high() {
        let mut input = NoButton;
        for _ in 0..3 {
            assert_eq!(input.read_level(), InputLevel::High);
        }
    }

    proptest! {
        #[test]
        fn duration_buckets_are_exhaustive_and_exclusive(duration_ms in 0u64..10_000) {
            let expected = if duration_ms < DEBOUNCE_MS {
                PressEvent::Ignored
            } else if duration_ms < SHORTPRESS_MS {
                PressEvent::Short
            } else {
                PressEvent::Long
            };
            prop_assert_eq!(press_for(duration_ms), expected);
        }

        #[test]
        fn release_edge_always_emits_exactly_one_event(duration_ms in 0u64..10_000) {
            prop_assert_ne!(press_for(duration_ms), PressEvent::None);
        }
    }
}
