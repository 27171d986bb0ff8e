//! Frame loop: paces the interpreter against wall-clock time, latches
//! input ports once per frame, and drives the renderer. Ported from the
//! reference `run_game`'s outer `for (;;)` tick loop.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use crate::cpu::{CpuState, Interpreter, Ports, ROM_SIZE};
use crate::display::Renderer;
use crate::error::FatalError;
use crate::input::gamepad::JoystickDevice;
use crate::input::InputController;

pub struct HostConfig {
    /// Instructions executed between each render/input/pacing boundary.
    pub sleep_ticks: u32,
    /// Target microseconds between successive frame boundaries.
    pub sleep_delay_us: u64,
    /// 16.16 fixed-point timer increment applied per instruction.
    pub timer_inc: u32,
    /// Key debounce window, milliseconds.
    pub hold_time_ms: u32,
}

/// Runs the emulator to completion (quit key or fatal error), returning the
/// final CPU state for the caller to persist.
pub fn run<W: Write, R: Read>(
    rom: [u8; ROM_SIZE],
    mut state: CpuState,
    mut renderer: Renderer<W>,
    mut stdin: R,
    mut joystick: JoystickDevice,
    config: HostConfig,
) -> Result<CpuState, FatalError> {
    let mut interp = Interpreter::new(rom);
    let mut input = InputController::new(config.hold_time_ms);
    let mut ports = Ports::default();

    let clock = Instant::now();
    let mut last_time = clock.elapsed();
    let mut tickcount: u64 = 0;
    let mut prev_tick: u64 = 0;

    loop {
        interp.step(&mut state, &ports, config.timer_inc)?;
        tickcount += 1;

        if tickcount - prev_tick >= config.sleep_ticks as u64 {
            prev_tick = tickcount;

            renderer
                .render(&state.mem)
                .map_err(FatalError::TerminalIo)?;

            let new_time = clock.elapsed();
            let delay = new_time.saturating_sub(last_time);
            let target = Duration::from_micros(config.sleep_delay_us);
            if delay > target {
                last_time = new_time;
            } else {
                last_time += target;
                std::thread::sleep(target - delay);
            }

            let mut bytes = Vec::new();
            stdin
                .read_to_end(&mut bytes)
                .map_err(FatalError::TerminalIo)?;
            let now_us = clock.elapsed().as_micros() as u64;
            input.poll(&bytes, now_us);
            joystick.poll(&mut input, now_us);

            if input.quit() {
                break;
            }
            ports.pp = input.pp();
            ports.ps = input.ps();
        }
    }

    Ok(state)
}
