mod cpu;
mod display;
mod error;
mod host;
mod input;
mod rom;

use std::io::{stdout, Write};

use error::FatalError;
use host::HostConfig;

struct Args {
    rom: String,
    save: String,
    js: String,
    hold_time_ms: u32,
    sleep_ticks: u32,
    sleep_delay_us: u64,
    timer_div: u32,
}

const HELP: &str = "\
Usage: brickcore [options]
Options:
  -h, --help        Display help text and exit
  --rom file        To specify the ROM file name (default is \"brickrom.bin\")
  --save file       To specify the file for cpu state
  --js file         To specify the joystick device (default is \"/dev/input/js0\",
                      empty disables it)
  -k n              Holds a key for N ms after pressing (default is 50)
  -t n              Stops at every N tick to redraw, sleep and check keys
                      (default is 1000)
  -d n              Max sleep time in microseconds (default is 1000)
  -i n              Increment timer every N ticks (default is 32)
";

fn parse_args() -> Result<Args, FatalError> {
    use lexopt::prelude::*;

    let mut rom = "brickrom.bin".to_string();
    let mut save = String::new();
    let mut js = "/dev/input/js0".to_string();
    let mut hold_time_ms = 50u32;
    let mut sleep_ticks = 1000u32;
    let mut sleep_delay_us = 1000u64;
    let mut timer_div = 32u32;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Long("rom") => rom = parser.value()?.string()?,
            Long("save") => save = parser.value()?.string()?,
            Long("js") => js = parser.value()?.string()?,
            Short('k') => hold_time_ms = parser.value()?.parse()?,
            Short('t') => sleep_ticks = parser.value()?.parse()?,
            Short('d') => sleep_delay_us = parser.value()?.parse()?,
            Short('i') => timer_div = parser.value()?.parse()?,
            Short('h') | Long("help") => {
                print!("{HELP}");
                std::process::exit(1);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(Args {
        rom,
        save,
        js,
        hold_time_ms,
        sleep_ticks,
        sleep_delay_us,
        timer_div,
    })
}

fn timer_inc(n: u32) -> u32 {
    if n == 0 {
        0x1_0000
    } else {
        std::cmp::min(0x1_0000, 0x1_0000 / n)
    }
}

fn run() -> Result<(), FatalError> {
    let args = parse_args()?;

    let rom_image = rom::load_rom(&args.rom)?;
    let state = rom::load_save(&args.save)?;
    let joystick = input::gamepad::JoystickDevice::open(&args.js)?;

    use termion::raw::IntoRawMode;
    use termion::screen::IntoAlternateScreen;

    let screen = stdout()
        .into_raw_mode()
        .map_err(FatalError::TerminalIo)?
        .into_alternate_screen()
        .map_err(FatalError::TerminalIo)?;
    let renderer = display::Renderer::new(screen).map_err(FatalError::TerminalIo)?;
    let stdin = termion::async_stdin();

    let config = HostConfig {
        sleep_ticks: args.sleep_ticks,
        sleep_delay_us: args.sleep_delay_us,
        timer_inc: timer_inc(args.timer_div),
        hold_time_ms: args.hold_time_ms,
    };

    let final_state = host::run(rom_image, state, renderer, stdin, joystick, config)?;
    rom::write_save(&args.save, &final_state).map_err(FatalError::SaveWrite)?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
