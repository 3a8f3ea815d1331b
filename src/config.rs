use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReceiptcamConfig {
    pub camera: CameraConfig,
    pub ocr: OcrConfig,
    pub bridge: BridgeConfig,
    pub input: InputConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Camera device index (e.g., 0 for /dev/video0)
    #[serde(default = "default_camera_index")]
    pub index: u32,

    /// Preview resolution (width, height)
    #[serde(default = "default_camera_resolution")]
    pub resolution: (u32, u32),

    /// Preview frames per second
    #[serde(default = "default_camera_fps")]
    pub fps: u32,

    /// Target resolution for the native still-capture path (width, height)
    #[serde(default = "default_still_resolution")]
    pub still_resolution: (u32, u32),

    /// Zoom applied per wheel notch, in capability units
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OcrConfig {
    /// Combined language-set identifier passed to the recognition engine
    #[serde(default = "default_ocr_languages")]
    pub languages: String,

    /// Directory holding the engine's trained data (None = engine default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BridgeConfig {
    /// Unix socket path of the host messaging bridge
    #[serde(default = "default_bridge_socket")]
    pub socket_path: String,

    /// Instruction sent with every interpretation request
    #[serde(default = "default_bridge_instruction")]
    pub instruction: String,

    /// Subject line for email-send dispatches
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InputConfig {
    /// Enable terminal keyboard input
    #[serde(default = "default_keyboard_enabled")]
    pub keyboard: bool,

    /// Hardware input device path (volume keys, scroll wheel)
    #[serde(default = "default_button_device")]
    pub button_device: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

impl ReceiptcamConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("receiptcam.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Start with default values
            .set_default("camera.index", default_camera_index())?
            .set_default(
                "camera.resolution",
                vec![default_camera_resolution().0, default_camera_resolution().1],
            )?
            .set_default("camera.fps", default_camera_fps())?
            .set_default(
                "camera.still_resolution",
                vec![default_still_resolution().0, default_still_resolution().1],
            )?
            .set_default("camera.zoom_step", default_zoom_step())?
            .set_default("ocr.languages", default_ocr_languages())?
            .set_default("bridge.socket_path", default_bridge_socket())?
            .set_default("bridge.instruction", default_bridge_instruction())?
            .set_default("bridge.email_subject", default_email_subject())?
            .set_default("input.keyboard", default_keyboard_enabled())?
            .set_default("input.button_device", default_button_device())?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with RECEIPTCAM_ prefix
            .add_source(Environment::with_prefix("RECEIPTCAM").separator("_"))
            .build()?;

        let config: ReceiptcamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.resolution.0 == 0 || self.camera.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.fps == 0 {
            return Err(ConfigError::Message(
                "Camera fps must be greater than 0".to_string(),
            ));
        }

        if self.camera.still_resolution.0 == 0 || self.camera.still_resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Still resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.zoom_step <= 0.0 {
            return Err(ConfigError::Message(
                "Camera zoom_step must be greater than 0".to_string(),
            ));
        }

        if self.ocr.languages.trim().is_empty() {
            return Err(ConfigError::Message(
                "OCR languages must not be empty".to_string(),
            ));
        }

        if self.bridge.socket_path.trim().is_empty() {
            return Err(ConfigError::Message(
                "Bridge socket_path must not be empty".to_string(),
            ));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ReceiptcamConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                index: default_camera_index(),
                resolution: default_camera_resolution(),
                fps: default_camera_fps(),
                still_resolution: default_still_resolution(),
                zoom_step: default_zoom_step(),
            },
            ocr: OcrConfig {
                languages: default_ocr_languages(),
                data_path: None,
            },
            bridge: BridgeConfig {
                socket_path: default_bridge_socket(),
                instruction: default_bridge_instruction(),
                email_subject: default_email_subject(),
            },
            input: InputConfig {
                keyboard: default_keyboard_enabled(),
                button_device: default_button_device(),
            },
            system: SystemConfig {
                event_bus_capacity: default_event_bus_capacity(),
            },
        }
    }
}

// Default value functions
fn default_camera_index() -> u32 {
    0
}
fn default_camera_resolution() -> (u32, u32) {
    (640, 480)
}
fn default_camera_fps() -> u32 {
    30
}
fn default_still_resolution() -> (u32, u32) {
    (1280, 720)
}
fn default_zoom_step() -> f64 {
    0.1
}

fn default_ocr_languages() -> String {
    "eng+deu".to_string()
}

fn default_bridge_socket() -> String {
    "/run/receiptcam/bridge.sock".to_string()
}
fn default_bridge_instruction() -> String {
    "Interpret this receipt image and its extracted text. Summarize the merchant, \
     date, line items, and total."
        .to_string()
}
fn default_email_subject() -> String {
    "Scanned receipt".to_string()
}

fn default_keyboard_enabled() -> bool {
    true
}
fn default_button_device() -> String {
    "/dev/input/event0".to_string()
}

fn default_event_bus_capacity() -> usize {
    100
}
