use super::RawInput;
use crate::error::Result;
use crate::events::{EventBus, ReceiptcamEvent};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::runtime::Handle;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Keyboard input handler decoding terminal events into [`RawInput`].
///
/// Key presses, scroll wheel, clicks on the preview area, and terminal
/// focus loss all surface as `InputReceived` events on the bus; no state
/// filtering happens here.
pub struct KeyboardInputHandler {
    event_bus: Arc<EventBus>,
    cancellation_token: CancellationToken,
}

impl KeyboardInputHandler {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            event_bus,
            cancellation_token: CancellationToken::new(),
        }
    }

    fn decode(terminal_event: Event) -> Option<RawInput> {
        match terminal_event {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                match key_event.code {
                    KeyCode::Char('c') => Some(RawInput::CaptureKey),
                    KeyCode::Char(' ') => Some(RawInput::Space),
                    KeyCode::Enter => Some(RawInput::Enter),
                    KeyCode::Esc => Some(RawInput::CancelKey),
                    KeyCode::Char('a') => Some(RawInput::AgainKey),
                    KeyCode::Char('s') => Some(RawInput::ScanKey),
                    KeyCode::Char('e') => Some(RawInput::EmailKey),
                    KeyCode::Char('q') => Some(RawInput::QuitKey),
                    // Arrow keys stand in for the wheel on plain keyboards
                    KeyCode::Up => Some(RawInput::WheelUp),
                    KeyCode::Down => Some(RawInput::WheelDown),
                    other => {
                        debug!("Key ignored: {:?}", other);
                        None
                    }
                }
            }
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollUp => Some(RawInput::WheelUp),
                MouseEventKind::ScrollDown => Some(RawInput::WheelDown),
                MouseEventKind::Down(_) => Some(RawInput::VideoTap),
                _ => None,
            },
            Event::FocusLost => Some(RawInput::FocusLost),
            _ => None,
        }
    }

    /// Start listening for terminal input
    pub async fn start(&self) -> Result<()> {
        info!("Starting keyboard input handler");

        let event_bus = Arc::clone(&self.event_bus);
        let cancellation_token = self.cancellation_token.clone();
        let runtime_handle = Handle::current();

        // Spawn a blocking task to handle terminal input
        task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }
            if let Err(e) = execute!(std::io::stdout(), EnableFocusChange, EnableMouseCapture) {
                warn!("Failed to enable focus/mouse reporting: {}", e);
            }

            info!("Raw mode enabled - keyboard handler active");

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        let Ok(terminal_event) = event::read() else {
                            continue;
                        };
                        if let Some(input) = Self::decode(terminal_event) {
                            let event = ReceiptcamEvent::InputReceived {
                                input,
                                timestamp: SystemTime::now(),
                            };
                            let event_bus_clone = Arc::clone(&event_bus);
                            runtime_handle.spawn(async move {
                                if let Err(e) = event_bus_clone.publish(event).await {
                                    warn!("Failed to publish input event: {}", e);
                                }
                            });
                        }
                    }
                    Ok(false) => {
                        // No event available, continue polling
                    }
                    Err(e) => {
                        warn!("Error polling for terminal events: {}", e);
                    }
                }
            }

            if let Err(e) = execute!(std::io::stdout(), DisableFocusChange, DisableMouseCapture) {
                warn!("Failed to disable focus/mouse reporting: {}", e);
            }
            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            } else {
                debug!("Raw mode disabled");
            }

            debug!("Keyboard input handler task exited");
        });

        Ok(())
    }

    /// Stop the keyboard input handler
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        // Give the task a moment to clean up and disable raw mode
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Ensure raw mode is disabled even if the task didn't clean up properly
        let _ = disable_raw_mode();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_decode_capture_keys() {
        assert_eq!(
            KeyboardInputHandler::decode(press(KeyCode::Char('c'))),
            Some(RawInput::CaptureKey)
        );
        assert_eq!(
            KeyboardInputHandler::decode(press(KeyCode::Char(' '))),
            Some(RawInput::Space)
        );
        assert_eq!(
            KeyboardInputHandler::decode(press(KeyCode::Enter)),
            Some(RawInput::Enter)
        );
    }

    #[test]
    fn test_decode_control_keys() {
        assert_eq!(
            KeyboardInputHandler::decode(press(KeyCode::Esc)),
            Some(RawInput::CancelKey)
        );
        assert_eq!(
            KeyboardInputHandler::decode(press(KeyCode::Char('a'))),
            Some(RawInput::AgainKey)
        );
        assert_eq!(
            KeyboardInputHandler::decode(press(KeyCode::Char('q'))),
            Some(RawInput::QuitKey)
        );
    }

    #[test]
    fn test_decode_focus_lost() {
        assert_eq!(
            KeyboardInputHandler::decode(Event::FocusLost),
            Some(RawInput::FocusLost)
        );
    }

    #[test]
    fn test_decode_ignores_unbound_keys() {
        assert_eq!(KeyboardInputHandler::decode(press(KeyCode::Char('z'))), None);
        assert_eq!(KeyboardInputHandler::decode(press(KeyCode::Tab)), None);
    }

    #[tokio::test]
    async fn test_keyboard_handler_stop() {
        let event_bus = Arc::new(EventBus::new(100));
        let handler = KeyboardInputHandler::new(event_bus);

        handler.stop().await.unwrap();
        assert!(handler.cancellation_token.is_cancelled());
    }
}
