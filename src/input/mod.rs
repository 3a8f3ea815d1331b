mod keyboard;
mod router;
#[cfg(all(target_os = "linux", feature = "hardware-input"))]
mod buttons;
#[cfg(test)]
mod tests;

pub use keyboard::KeyboardInputHandler;
pub use router::route;

#[cfg(all(target_os = "linux", feature = "hardware-input"))]
pub use buttons::ButtonInputHandler;

use serde::{Deserialize, Serialize};

/// A decoded input signal, still carrying its source identity.
///
/// Hardware-specific decoding (key codes, evdev events, wheel notches)
/// stops here; everything downstream works in terms of these variants and
/// the semantic actions [`route`] derives from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawInput {
    VolumeUp,
    VolumeDown,
    CaptureKey,
    Space,
    Enter,
    CancelKey,
    AgainKey,
    ScanKey,
    EmailKey,
    QuitKey,
    WheelUp,
    WheelDown,
    VideoTap,
    FocusLost,
}

/// Semantic action requested of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    TriggerCapture,
    ZoomDelta(i32),
    Reset,
    RequestScan,
    EmailResults,
    Shutdown,
}
