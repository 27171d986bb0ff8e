//! Optional Linux joystick support. Absent from the reference, which only
//! ever reads `stdin`; this reads raw `js_event` records off `/dev/input/jsN`
//! and folds them into the same logical key bitmap the ANSI decoder feeds.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::os::unix::io::AsRawFd;

use crate::error::FatalError;
use crate::input::InputController;

const JS_EVENT_BUTTON: u8 = 0x01;
const JS_EVENT_AXIS: u8 = 0x02;
const JS_EVENT_INIT: u8 = 0x80;

const JSIOCGAXES: libc::c_ulong = 0x8001_6a11;
const JSIOCGBUTTONS: libc::c_ulong = 0x8001_6a12;

const AXIS_DEADZONE: i16 = i16::MAX / 2;

/// One raw `struct js_event` record, as read off the device node:
/// `{ time: u32, value: i16, kind: u8, number: u8 }`, 8 bytes, native
/// endianness.
#[repr(C)]
#[derive(Clone, Copy)]
struct RawEvent {
    bytes: [u8; 8],
}

impl RawEvent {
    fn value(&self) -> i16 {
        i16::from_ne_bytes([self.bytes[4], self.bytes[5]])
    }

    fn kind(&self) -> u8 {
        self.bytes[6] & !JS_EVENT_INIT
    }

    fn number(&self) -> u8 {
        self.bytes[7]
    }
}

pub struct JoystickDevice {
    file: Option<File>,
}

impl JoystickDevice {
    /// Opens `path` and queries its axis/button counts. An empty path or a
    /// missing device node yields a disabled (no-op) device rather than an
    /// error, matching the CLI's "empty disables" convention for `--js`.
    pub fn open(path: &str) -> Result<Self, FatalError> {
        if path.is_empty() {
            return Ok(JoystickDevice { file: None });
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(JoystickDevice { file: None }),
            Err(e) => return Err(FatalError::JoystickInit(e)),
        };

        let fd = file.as_raw_fd();
        let mut num_axes: u8 = 0;
        let mut num_buttons: u8 = 0;
        unsafe {
            if libc::ioctl(fd, JSIOCGAXES, &mut num_axes as *mut u8) < 0 {
                return Err(FatalError::JoystickInit(std::io::Error::last_os_error()));
            }
            if libc::ioctl(fd, JSIOCGBUTTONS, &mut num_buttons as *mut u8) < 0 {
                return Err(FatalError::JoystickInit(std::io::Error::last_os_error()));
            }
            let flags = libc::fcntl(fd, libc::F_GETFL);
            if flags < 0 || libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
                return Err(FatalError::JoystickInit(std::io::Error::last_os_error()));
            }
        }

        Ok(JoystickDevice { file: Some(file) })
    }

    /// Drains pending events and applies them to `keys`. Closes the device
    /// on any read error other than "would block" — subsequent polls then
    /// become no-ops.
    pub fn poll(&mut self, keys: &mut InputController, now_us: u64) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        loop {
            let mut raw = RawEvent { bytes: [0; 8] };
            match file.read(&mut raw.bytes) {
                Ok(8) => apply_event(&raw, keys, now_us),
                Ok(_) => {
                    self.file = None;
                    return;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return,
                Err(_) => {
                    self.file = None;
                    return;
                }
            }
        }
    }
}

fn apply_event(raw: &RawEvent, keys: &mut InputController, now_us: u64) {
    match raw.kind() {
        k if k == JS_EVENT_AXIS => {
            let value = raw.value();
            let (neg_bit, pos_bit) = if raw.number() % 2 == 0 {
                (3u32, 2u32) // horizontal: left, right
            } else {
                (0u32, 1u32) // vertical: up, down
            };
            keys.set_key(neg_bit, value <= -AXIS_DEADZONE, now_us);
            keys.set_key(pos_bit, value >= AXIS_DEADZONE, now_us);
        }
        k if k == JS_EVENT_BUTTON => {
            let pressed = raw.value() != 0;
            match raw.number() {
                0 => keys.set_key(0, pressed, now_us),  // face button: rotate
                4 | 5 => {
                    if pressed {
                        keys.toggle_bit(17); // shoulder: UI toggle, edge-triggered
                    }
                }
                6 => keys.set_key(5, pressed, now_us), // select: mute
                7 => keys.set_key(4, pressed, now_us), // start: start/pause
                8 => keys.set_key(6, pressed, now_us), // mode: on/off
                _ => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: u8, number: u8, value: i16) -> RawEvent {
        let v = value.to_ne_bytes();
        RawEvent {
            bytes: [0, 0, 0, 0, v[0], v[1], kind, number],
        }
    }

    #[test]
    fn axis_beyond_deadzone_sets_directional_bit() {
        let mut ctl = InputController::new(50);
        apply_event(&event(JS_EVENT_AXIS, 0, i16::MAX), &mut ctl, 0);
        assert_eq!(ctl.pp(), !0b0100 & 0xF); // right
    }

    #[test]
    fn axis_returning_to_center_clears_the_bit() {
        let mut ctl = InputController::new(50);
        apply_event(&event(JS_EVENT_AXIS, 1, i16::MIN), &mut ctl, 0);
        assert_ne!(ctl.pp(), 0xF);
        apply_event(&event(JS_EVENT_AXIS, 1, 0), &mut ctl, 0);
        assert_eq!(ctl.pp(), 0xF);
    }

    #[test]
    fn shoulder_button_toggles_ui_bit_on_press_only() {
        let mut ctl = InputController::new(50);
        apply_event(&event(JS_EVENT_BUTTON, 4, 1), &mut ctl, 0);
        assert!(ctl.ui_toggle());
        apply_event(&event(JS_EVENT_BUTTON, 4, 1), &mut ctl, 0);
        assert!(!ctl.ui_toggle());
    }

    #[test]
    fn start_button_maps_to_ps_bit() {
        let mut ctl = InputController::new(50);
        apply_event(&event(JS_EVENT_BUTTON, 7, 1), &mut ctl, 0);
        assert_eq!(ctl.ps(), !0b0001 & 0xF);
    }
}
