//! Capacities fixed when a VM is created.

use crate::cell::CELL_SIZE;
use thiserror::Error;

/// Default data space size in bytes.
pub const DEFAULT_DATA_SPACE: usize = 65_536;

/// Default data stack capacity in cells.
pub const DEFAULT_DATA_STACK: usize = 256;

/// Default return stack capacity in cells.
pub const DEFAULT_RETURN_STACK: usize = 256;

/// Default dictionary capacity in entries.
pub const DEFAULT_DICTIONARY: usize = 1_024;

/// Default input buffer size in bytes.
pub const DEFAULT_INPUT_BUFFER: usize = 256;

/// Largest accepted data space, in bytes.
pub const MAX_DATA_SPACE: usize = 1 << 30;

/// Largest accepted stack capacity, in cells.
pub const MAX_STACK: usize = 1 << 20;

/// Largest accepted dictionary capacity, in entries.
pub const MAX_DICTIONARY: usize = 1 << 20;

/// Cells at the bottom of data space reserved for `>IN` and `STATE`.
pub const SYSTEM_CELLS: usize = 2;

/// Rejected configurations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A capacity was zero.
    #[error("{what} capacity must be greater than zero")]
    ZeroCapacity { what: &'static str },

    /// A capacity exceeded its maximum.
    #[error("{what} capacity {value} exceeds the maximum of {max}")]
    CapacityTooLarge {
        what: &'static str,
        value: usize,
        max: usize,
    },

    /// Data space has no byte left after the system cells and the input buffer.
    #[error("data space of {data_space} bytes leaves no room after the {required}-byte system area")]
    DataSpaceTooSmall { data_space: usize, required: usize },
}

/// Arena and table capacities for one VM instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Data space size in bytes.
    pub data_space: usize,
    /// Data stack capacity in cells.
    pub data_stack: usize,
    /// Return stack capacity in cells.
    pub return_stack: usize,
    /// Maximum number of dictionary entries, primitives included.
    pub dictionary: usize,
    /// Bytes reserved for the current input line.
    pub input_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_space: DEFAULT_DATA_SPACE,
            data_stack: DEFAULT_DATA_STACK,
            return_stack: DEFAULT_RETURN_STACK,
            dictionary: DEFAULT_DICTIONARY,
            input_buffer: DEFAULT_INPUT_BUFFER,
        }
    }
}

impl Config {
    /// Bytes taken by the system cells and input buffer, before any arguments.
    pub fn system_area(&self) -> usize {
        SYSTEM_CELLS * CELL_SIZE + self.input_buffer
    }

    /// Check that every capacity is usable.
    ///
    /// Data space must be strictly larger than the system area so HERE
    /// starts below the end of data space.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (what, value, max) in [
            ("data space", self.data_space, MAX_DATA_SPACE),
            ("data stack", self.data_stack, MAX_STACK),
            ("return stack", self.return_stack, MAX_STACK),
            ("dictionary", self.dictionary, MAX_DICTIONARY),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCapacity { what });
            }
            if value > max {
                return Err(ConfigError::CapacityTooLarge { what, value, max });
            }
        }
        if self.input_buffer > MAX_DATA_SPACE {
            return Err(ConfigError::CapacityTooLarge {
                what: "input buffer",
                value: self.input_buffer,
                max: MAX_DATA_SPACE,
            });
        }

        let required = self.system_area();
        if self.data_space <= required {
            return Err(ConfigError::DataSpaceTooSmall {
                data_space: self.data_space,
                required,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn zero_stack_rejected() {
        let config = Config {
            data_stack: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { what: "data stack" })
        );
    }

    #[test]
    fn tiny_data_space_rejected() {
        let config = Config {
            data_space: 64,
            input_buffer: 128,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DataSpaceTooSmall {
                data_space: 64,
                required: 144,
            })
        );
    }

    #[test]
    fn data_space_must_exceed_system_area() {
        let exact = Config {
            data_space: 26,
            input_buffer: 10,
            ..Config::default()
        };
        assert_eq!(
            exact.validate(),
            Err(ConfigError::DataSpaceTooSmall {
                data_space: 26,
                required: 26,
            })
        );
        let one_more = Config {
            data_space: 27,
            ..exact
        };
        assert_eq!(one_more.validate(), Ok(()));
    }

    #[test]
    fn oversized_capacities_rejected() {
        let config = Config {
            data_space: usize::MAX,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CapacityTooLarge {
                what: "data space",
                value: usize::MAX,
                max: MAX_DATA_SPACE,
            })
        );

        let config = Config {
            return_stack: MAX_STACK + 1,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityTooLarge { what: "return stack", .. })
        ));

        let config = Config {
            input_buffer: usize::MAX,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityTooLarge { what: "input buffer", .. })
        ));
    }

    #[test]
    fn largest_capacities_accepted() {
        let config = Config {
            data_space: MAX_DATA_SPACE,
            data_stack: MAX_STACK,
            return_stack: MAX_STACK,
            dictionary: MAX_DICTIONARY,
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn system_area_counts_cells_and_buffer() {
        let config = Config {
            input_buffer: 10,
            ..Config::default()
        };
        assert_eq!(config.system_area(), 26);
    }
}
