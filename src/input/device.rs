//! [`InputSource`] backed by the kernel evdev interface.
//!
//! Every `/dev/input/event*` device that has letter and Enter keys is
//! opened read-only (not grabbed, so other clients still see the keys).
//! One `poll(2)` covers all of them; every ready device is drained before
//! returning.

use crate::keys::{KeyCode, KeyEvent, Transition};
use crate::traits::InputSource;
use evdev::{Device, EventType};
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::io::ErrorKind;
use std::os::fd::AsFd;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Errors produced by the evdev source.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no keyboard devices found (does this user have read access to /dev/input?)")]
    NoKeyboards,
    #[error("poll failed: {0}")]
    Poll(#[source] Errno),
}

/// Reads key transitions from all attached keyboards.
pub struct EvdevSource {
    devices: Vec<(PathBuf, Device)>,
}

impl EvdevSource {
    /// Open every readable keyboard device.
    pub fn open() -> Result<Self, InputError> {
        let devices: Vec<(PathBuf, Device)> = evdev::enumerate()
            .filter(|(_, device)| is_keyboard(device))
            .collect();
        if devices.is_empty() {
            return Err(InputError::NoKeyboards);
        }
        for (path, device) in &devices {
            info!(
                "using keyboard {} ({})",
                path.display(),
                device.name().unwrap_or("unnamed")
            );
        }
        Ok(Self { devices })
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

fn is_keyboard(device: &Device) -> bool {
    device.supported_keys().is_some_and(|keys| {
        keys.contains(evdev::KeyCode::KEY_A) && keys.contains(evdev::KeyCode::KEY_ENTER)
    })
}

/// Convert a raw `EV_KEY` record.  Autorepeat (value 2) is discarded.
fn key_event(code: u16, value: i32, timestamp: SystemTime) -> Option<KeyEvent> {
    let transition = match value {
        1 => Transition::Pressed,
        0 => Transition::Released,
        _ => return None,
    };
    Some(KeyEvent {
        code: KeyCode::from_evdev(code),
        transition,
        timestamp,
    })
}

impl InputSource for EvdevSource {
    type Error = InputError;

    fn poll_events(&mut self, timeout: Duration, out: &mut Vec<KeyEvent>) -> Result<(), InputError> {
        let ready: Vec<usize> = {
            let mut fds: Vec<PollFd> = self
                .devices
                .iter()
                .map(|(_, device)| PollFd::new(device.as_fd(), PollFlags::POLLIN))
                .collect();
            let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
            match poll(&mut fds, PollTimeout::from(millis)) {
                Ok(0) | Err(Errno::EINTR) => return Ok(()),
                Ok(_) => {}
                Err(e) => return Err(InputError::Poll(e)),
            }
            fds.iter()
                .enumerate()
                .filter(|(_, fd)| fd.revents().is_some_and(|r| !r.is_empty()))
                .map(|(idx, _)| idx)
                .collect()
        };

        let mut lost = Vec::new();
        for idx in ready {
            let (path, device) = &mut self.devices[idx];
            match device.fetch_events() {
                Ok(events) => {
                    for ev in events {
                        if ev.event_type() != EventType::KEY {
                            continue;
                        }
                        if let Some(event) = key_event(ev.code(), ev.value(), ev.timestamp()) {
                            debug!("{}: {:?} {:?}", path.display(), event.code, event.transition);
                            out.push(event);
                        }
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => {
                    warn!("dropping {}: {}", path.display(), e);
                    lost.push(idx);
                }
            }
        }

        for idx in lost.into_iter().rev() {
            self.devices.remove(idx);
        }
        if self.devices.is_empty() {
            return Err(InputError::NoKeyboards);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_values_map_to_transitions() {
        let now = SystemTime::now();
        let pressed = key_event(30, 1, now).unwrap();
        assert_eq!(pressed.code, KeyCode(38));
        assert_eq!(pressed.transition, Transition::Pressed);
        assert_eq!(pressed.timestamp, now);

        let released = key_event(30, 0, now).unwrap();
        assert_eq!(released.transition, Transition::Released);
    }

    #[test]
    fn autorepeat_is_discarded() {
        assert!(key_event(30, 2, SystemTime::now()).is_none());
    }
}
