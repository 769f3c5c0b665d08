//! System clipboard access.

use std::time::Duration;

use arboard::Clipboard;

use crate::drafting::{ClipboardWriter, Collaborator, ExternalFailure};

/// Writes to the OS clipboard through `arboard`.
///
/// On X11 and Wayland the owning process has to serve the selection itself,
/// so the write blocks until another program takes the clipboard over (a
/// clipboard manager does so at once) or `hold` runs out. Headless sessions
/// fail here and the failure is reported without touching the draft session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard {
    hold: Duration,
}

impl SystemClipboard {
    pub const fn new(hold: Duration) -> Self {
        Self { hold }
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ExternalFailure> {
        let mut clipboard = Clipboard::new().map_err(clipboard_failure)?;
        set_text(&mut clipboard, text, self.hold).map_err(clipboard_failure)
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_text(clipboard: &mut Clipboard, text: &str, hold: Duration) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    if hold.is_zero() {
        return clipboard.set_text(text.to_owned());
    }
    tracing::debug!(hold_secs = hold.as_secs(), "serving clipboard until taken over");
    clipboard
        .set()
        .wait_until(std::time::Instant::now() + hold)
        .text(text.to_owned())
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_text(clipboard: &mut Clipboard, text: &str, _hold: Duration) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_owned())
}

#[allow(clippy::needless_pass_by_value)]
fn clipboard_failure(err: arboard::Error) -> ExternalFailure {
    ExternalFailure::new(Collaborator::Clipboard, err.to_string())
}

/// Clipboard that discards writes, for `--no-clipboard` runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardWriter for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ExternalFailure> {
        tracing::debug!("clipboard disabled; skipping write");
        Ok(())
    }
}
