//! Reset and supply sequencing
//!
//! The NT36532E wants `vddio` up before its reset line is released, and a
//! double reset pulse with fixed hold times after that. Hold times are
//! minima; the sequence is never shortened or reordered.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use platform::{GpioError, GpioLine, Regulator, RegulatorError};

use crate::config::RESET_SEQUENCE;

/// Owns the `vddio` rail and the reset line of one panel.
pub struct PowerSequencer<VDD, RST> {
    vddio: VDD,
    reset: GpioLine<RST>,
}

impl<VDD, RST> PowerSequencer<VDD, RST>
where
    VDD: Regulator,
    RST: OutputPin,
{
    /// Take ownership of the rail and an already-requested reset line.
    pub fn new(vddio: VDD, reset: GpioLine<RST>) -> Self {
        Self { vddio, reset }
    }

    /// Enable `vddio`.
    pub fn power_on(&mut self) -> Result<(), RegulatorError> {
        if let Err(e) = self.vddio.enable() {
            error!("failed to enable vddio regulator: {}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Drive the reset pulse train, waiting out each hold time.
    ///
    /// Ends with reset deasserted and the controller ready for commands.
    pub async fn reset_pulse<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), GpioError> {
        for (asserted, hold_ms) in RESET_SEQUENCE {
            self.reset.set(asserted)?;
            delay.delay_ms(hold_ms).await;
        }
        Ok(())
    }

    /// Hold the controller in reset and drop `vddio`.
    ///
    /// Best effort: failures are logged and the remaining steps still run.
    pub fn power_off(&mut self) {
        if let Err(e) = self.reset.assert() {
            error!("failed to assert reset: {}", e);
        }
        if let Err(e) = self.vddio.disable() {
            error!("failed to disable vddio regulator: {}", e);
        }
    }

    /// Whether this panel currently holds `vddio` enabled.
    pub fn is_powered(&self) -> bool {
        self.vddio.is_enabled()
    }

    /// Whether the reset line was last driven asserted.
    pub fn in_reset(&self) -> bool {
        self.reset.is_asserted()
    }

    /// Give back the rail and the raw reset pin.
    pub fn release(self) -> (VDD, RST) {
        (self.vddio, self.reset.release())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use platform::mocks::{Event, MockBoard};
    use platform::Polarity;

    #[tokio::test]
    async fn test_reset_pulse_levels_active_low() {
        // request(asserted) + 4 pulse edges; active-low means asserted = Low.
        let expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let pin = PinMock::new(&expectations);
        let line = GpioLine::request(pin, Polarity::ActiveLow, true).unwrap();
        let board = MockBoard::new();
        let mut power = PowerSequencer::new(board.regulator(), line);

        power.reset_pulse(&mut NoopDelay::new()).await.unwrap();
        assert!(!power.in_reset());

        let (_, mut pin) = power.release();
        pin.done();
    }

    #[tokio::test]
    async fn test_reset_pulse_hold_times() {
        let board = MockBoard::new();
        let line = GpioLine::request(board.pin(), Polarity::ActiveHigh, true).unwrap();
        let mut power = PowerSequencer::new(board.regulator(), line);
        board.journal().clear();

        power.reset_pulse(&mut board.delay()).await.unwrap();

        let delays: Vec<u64> = board
            .journal()
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Delay { ns } => Some(*ns),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![10_000_000, 3_000_000, 3_000_000, 15_000_000]);
    }

    #[test]
    fn test_power_on_failure_leaves_rail_off() {
        let board = MockBoard::new();
        board.faults().fail_regulator_enable(-16);
        let line = GpioLine::request(board.pin(), Polarity::ActiveHigh, true).unwrap();
        let mut power = PowerSequencer::new(board.regulator(), line);

        assert_eq!(power.power_on(), Err(RegulatorError::Failed(-16)));
        assert!(!power.is_powered());
    }

    #[test]
    fn test_power_off_continues_past_gpio_failure() {
        let board = MockBoard::new();
        let line = GpioLine::request(board.pin(), Polarity::ActiveHigh, false).unwrap();
        let mut power = PowerSequencer::new(board.regulator(), line);
        power.power_on().unwrap();

        board.faults().fail_pin();
        power.power_off();
        assert!(!power.is_powered());
    }
}
