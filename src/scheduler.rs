//! Cooperative main loop.
//!
//! One iteration, in order:
//!
//! 1. service the watchdog
//! 2. poll the USB engine
//! 3. sample the tick
//! 4. sample the buttons
//! 5. read link health, drive the red LED
//! 6. handle switch edges (start/stop sensor, menu reset)
//! 7. advance the sensor poll
//! 8. in menu mode, step the menu
//! 9. if the endpoint is ready, send at most one report
//!
//! Nothing in an iteration blocks. Every collaborator that waits on
//! hardware is a state machine resumed on the next call.

use crate::board::{Board, Indicator};
use crate::buttons::ButtonSet;
use crate::hid::ReportKind;
use crate::menu::MenuEngine;
use crate::mode::{self, Mode};
use crate::mouse::MouseEngine;
use crate::report;
use crate::sensor::{ReadStatus, SensorEngine, SensorPoll};
use crate::usb::UsbEngine;

/// State owned by the loop itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopState {
    pub buttons: ButtonSet,
    pub sensor_poll: SensorPoll,
    /// Did the last sensor bus transaction succeed?
    pub link_ok: bool,
}

/// What happened during one iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Iteration {
    pub tick: bool,
    pub mode: Mode,
    pub read: Option<ReadStatus>,
    pub sent: Option<ReportKind>,
}

pub struct Scheduler<B, U, S, K, M> {
    board: B,
    usb: U,
    sensor: S,
    menu: K,
    mouse: M,
    state: LoopState,
}

impl<B, U, S, K, M> Scheduler<B, U, S, K, M>
where
    B: Board,
    U: UsbEngine,
    S: SensorEngine,
    K: MenuEngine,
    M: MouseEngine,
{
    /// Take ownership of the collaborators and latch the power-up button
    /// levels. A switch already held at power-up does not start reading.
    pub fn new(mut board: B, usb: U, sensor: S, menu: K, mouse: M) -> Self {
        let buttons = ButtonSet::new(board.read_levels());
        let link_ok = sensor.last_transaction_ok();
        board.set_indicator(Indicator::LinkError, !link_ok);
        board.set_indicator(Indicator::Ready, true);
        info!("scheduler: ready");

        Self {
            board,
            usb,
            sensor,
            menu,
            mouse,
            state: LoopState {
                buttons,
                sensor_poll: SensorPoll::new(),
                link_ok,
            },
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Run one loop iteration.
    pub fn run_once(&mut self) -> Iteration {
        self.board.service();
        self.usb.poll();

        let tick = self.board.poll_tick();
        let state = &mut self.state;
        state.buttons.update(self.board.read_levels());

        let link_ok = self.sensor.last_transaction_ok();
        if link_ok != state.link_ok {
            self.board.set_indicator(Indicator::LinkError, !link_ok);
            state.link_ok = link_ok;
        }

        mode::handle_switch_edges(
            &state.buttons,
            &mut state.sensor_poll,
            &mut self.sensor,
            &mut self.menu,
        );
        let read = state.sensor_poll.step(tick, &mut self.sensor);

        let mode = Mode::of(&state.buttons);
        if mode == Mode::KeyboardMenu {
            let input = mode::menu_input(&state.buttons, &self.sensor, state.link_ok);
            self.menu.step(&input);
        }

        let sent = if self.usb.transmit_ready() {
            report::send_next_report(
                &mut self.usb,
                mode,
                &mut self.menu,
                &mut self.mouse,
                &mut self.sensor,
                state.buttons.action_bits(),
            )
        } else {
            None
        };

        Iteration {
            tick,
            mode,
            read,
            sent,
        }
    }

    /// Loop forever. Only a watchdog reset ends this.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }
}
