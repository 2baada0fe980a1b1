use std::fmt;

/// A memory space: host memory, or the memory of one accelerator.
///
/// The `Device` variant is always present. Builds without the `cuda` feature
/// still accept it as a value and reject it at allocation or copy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Place {
    #[default]
    Host,
    Device(usize),
}

impl Place {
    pub fn is_host(&self) -> bool {
        matches!(self, Place::Host)
    }

    pub fn is_device(&self) -> bool {
        matches!(self, Place::Device(_))
    }

    pub fn device_id(&self) -> Option<usize> {
        match self {
            Place::Host => None,
            Place::Device(id) => Some(*id),
        }
    }

    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Host => write!(f, "Host"),
            Place::Device(id) => write!(f, "Device({})", id),
        }
    }
}
