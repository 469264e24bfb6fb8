//! Fan relay and lamp driven from two digital output pins.
//!
//! Generic over `embedded_hal::digital::OutputPin`, so the same adapter
//! works on any HAL.  Relay boards differ in polarity; each output has its
//! own `active_low` flag.
//!
//! Pin errors are logged and the cached state left unchanged: the
//! controller keeps cycling and will drive the pin again next cycle.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::ActuatorPort;

/// One digital output with polarity.
pub struct SwitchedOutput<P: OutputPin> {
    pin: P,
    active_low: bool,
    on: bool,
}

impl<P: OutputPin> SwitchedOutput<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            on: false,
        }
    }

    /// Drive the pin; returns `false` if the HAL reported an error.
    pub fn set(&mut self, on: bool) -> bool {
        let high = on != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => {
                self.on = on;
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Give the pin back (e.g. to reconfigure it).
    pub fn release(self) -> P {
        self.pin
    }
}

/// [`ActuatorPort`] over a fan pin and a light pin.
pub struct PinActuators<F: OutputPin, L: OutputPin> {
    fan: SwitchedOutput<F>,
    light: SwitchedOutput<L>,
}

impl<F: OutputPin, L: OutputPin> PinActuators<F, L> {
    pub fn new(fan: SwitchedOutput<F>, light: SwitchedOutput<L>) -> Self {
        Self { fan, light }
    }

    pub fn fan_on(&self) -> bool {
        self.fan.is_on()
    }

    pub fn light_on(&self) -> bool {
        self.light.is_on()
    }
}

impl<F: OutputPin, L: OutputPin> ActuatorPort for PinActuators<F, L> {
    fn set_fan(&mut self, on: bool) {
        if !self.fan.set(on) {
            warn!("fan pin write failed (wanted {})", if on { "ON" } else { "OFF" });
        }
    }

    fn set_light(&mut self, on: bool) {
        if !self.light.set(on) {
            warn!("light pin write failed (wanted {})", if on { "ON" } else { "OFF" });
        }
    }
}
