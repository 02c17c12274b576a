use serde_json::{Value, json};

use crate::Params;

/// Operations the CLI knows how to issue to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCommand {
    /// Switches the on-board LED on.
    LedOn,
    /// Switches the on-board LED off.
    LedOff,
}

impl DeviceCommand {
    pub const ALL: [DeviceCommand; 2] = [DeviceCommand::LedOn, DeviceCommand::LedOff];

    /// User-facing command name.
    pub fn name(self) -> &'static str {
        match self {
            DeviceCommand::LedOn => "led_on",
            DeviceCommand::LedOff => "led_off",
        }
    }

    /// JSON-RPC method invoked on the device.
    pub fn method(self) -> &'static str {
        match self {
            DeviceCommand::LedOn | DeviceCommand::LedOff => "set_builtin_led",
        }
    }

    pub fn params(self) -> Params {
        let params = match self {
            DeviceCommand::LedOn => json!({ "status": 1 }),
            DeviceCommand::LedOff => json!({ "status": 0 }),
        };

        match params {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    /// Looks a command up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name))
    }
}
