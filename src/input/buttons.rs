use super::RawInput;
use crate::config::InputConfig;
use crate::error::Result;
use crate::events::{EventBus, ReceiptcamEvent};
use evdev::{Device, InputEventKind, Key, RelativeAxisType};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Hardware button and scroll-wheel handler using evdev.
///
/// Volume keys act as capture triggers and the wheel drives zoom; decoding
/// stops at [`RawInput`], state filtering happens in the router.
pub struct ButtonInputHandler {
    device_path: String,
    event_bus: Arc<EventBus>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ButtonInputHandler {
    pub fn new(config: &InputConfig, event_bus: Arc<EventBus>) -> Self {
        Self {
            device_path: config.button_device.clone(),
            event_bus,
            max_retries: 10,
            retry_delay: Duration::from_secs(5),
        }
    }

    /// Start monitoring the hardware input device
    pub async fn start(&self) -> Result<()> {
        info!(
            "Starting button input handler for device: {}",
            self.device_path
        );

        let device_path = self.device_path.clone();
        let event_bus = Arc::clone(&self.event_bus);
        let max_retries = self.max_retries;
        let retry_delay = self.retry_delay;

        tokio::spawn(async move {
            let mut retry_count = 0;

            loop {
                match Self::monitor_device(&device_path, &event_bus).await {
                    Ok(_) => {
                        info!("Button device monitoring ended normally");
                        break;
                    }
                    Err(e) => {
                        error!("Button device error: {}", e);
                        retry_count += 1;

                        let _ = event_bus
                            .publish(ReceiptcamEvent::SystemError {
                                component: "button_input".to_string(),
                                error: format!("Attempt {}/{}: {}", retry_count, max_retries, e),
                            })
                            .await;

                        if retry_count >= max_retries {
                            error!(
                                "Button input handler failed after {} attempts, giving up",
                                max_retries
                            );
                            break;
                        }

                        let delay = retry_delay * 2_u32.pow(retry_count.min(5));
                        warn!(
                            "Retrying button device connection in {:?} (attempt {}/{})",
                            delay, retry_count, max_retries
                        );
                        sleep(delay).await;
                    }
                }
            }
        });

        Ok(())
    }

    async fn monitor_device(device_path: &str, event_bus: &Arc<EventBus>) -> std::io::Result<()> {
        let path = device_path.to_string();
        let bus = Arc::clone(event_bus);
        let handle = tokio::runtime::Handle::current();

        tokio::task::spawn_blocking(move || {
            let mut device = Device::open(&path)?;
            info!("Button device opened: {}", path);

            loop {
                for event in device.fetch_events()? {
                    let input = match event.kind() {
                        InputEventKind::Key(Key::KEY_VOLUMEUP) if event.value() == 1 => {
                            Some(RawInput::VolumeUp)
                        }
                        InputEventKind::Key(Key::KEY_VOLUMEDOWN) if event.value() == 1 => {
                            Some(RawInput::VolumeDown)
                        }
                        InputEventKind::Key(Key::KEY_CAMERA) if event.value() == 1 => {
                            Some(RawInput::CaptureKey)
                        }
                        InputEventKind::RelAxis(RelativeAxisType::REL_WHEEL) => {
                            if event.value() > 0 {
                                Some(RawInput::WheelUp)
                            } else if event.value() < 0 {
                                Some(RawInput::WheelDown)
                            } else {
                                None
                            }
                        }
                        _ => None,
                    };

                    if let Some(input) = input {
                        debug!("Button input: {:?}", input);
                        let bus_clone = Arc::clone(&bus);
                        let event = ReceiptcamEvent::InputReceived {
                            input,
                            timestamp: SystemTime::now(),
                        };
                        handle.spawn(async move {
                            if let Err(e) = bus_clone.publish(event).await {
                                warn!("Failed to publish button event: {}", e);
                            }
                        });
                    }
                }
            }
        })
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
    }
}
