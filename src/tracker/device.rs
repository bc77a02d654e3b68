use serde::{Deserialize, Serialize};

/// Physical device a raw tracker belongs to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: u32,
    pub name: String,
    pub manufacturer: String,
    pub firmware_version: String,
}

impl Device {
    pub fn new(id: u32, name: &str) -> Self {
        Device {
            id,
            name: name.to_string(),
            manufacturer: String::new(),
            firmware_version: String::new(),
        }
    }
}
