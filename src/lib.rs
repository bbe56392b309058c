#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod asynch;
mod command;
mod diagnostics;
mod driver;
mod error;
mod register;
mod utils;

pub use command::{CellSelection, Command, TemperatureSelection};
pub use driver::{CONVERSION_PENDING, Ltc6802};
pub use error::Error;
pub use register::{
    CELL_VOLTAGE_GROUP_LEN, CONFIG_GROUP_LEN, CellVoltageRegisterGroup, CellVoltages,
    ComparatorDutyCycle, Configuration, ConfigurationRegisterGroup, EXTERNAL_TEMPERATURES,
    FLAG_GROUP_LEN, FlagRegisterGroup, Flags, MAX_CELLS, TEMPERATURE_GROUP_LEN,
    TemperatureRegisterGroup, Temperatures,
};
pub use utils::{adc_to_volts, internal_celsius, threshold_from_raw, threshold_to_raw};
