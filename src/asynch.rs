//! Asynchronous driver for the LTC6802-2 battery stack monitor
//!
//! Same protocol and register images as the blocking [`crate::Ltc6802`],
//! over [`embedded_hal_async::spi::SpiDevice`].

use embedded_hal_async::spi::{Operation, SpiDevice};

use crate::{
    command::{self, CellSelection, Command, TemperatureSelection},
    driver::{cell_conversion, checked_prefix, conversion_pending, frame_header},
    error::Error,
    register::{
        CELL_VOLTAGE_GROUP_LEN, CONFIG_GROUP_LEN, CellVoltages, Configuration, FLAG_GROUP_LEN,
        Flags, TEMPERATURE_GROUP_LEN, Temperatures,
    },
};

/// LTC6802-2 driver instance (asynchronous)
#[derive(Debug)]
pub struct Ltc6802<SPI> {
    spi: SPI,
    address: u8,
    config: Configuration,
    temperatures: Temperatures,
    cell_voltages: CellVoltages,
    flags: Flags,
}

impl<SPI, E> Ltc6802<SPI>
where
    SPI: SpiDevice<u8, Error = E>,
{
    /// Create a new LTC6802 driver instance for the chip at `address`
    pub fn new(spi: SPI, address: u8) -> Self {
        Self {
            spi,
            address,
            config: Configuration::default(),
            temperatures: Temperatures::default(),
            cell_voltages: CellVoltages::default(),
            flags: Flags::default(),
        }
    }

    /// Release the SPI device, consuming the driver
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Bus address of this chip
    #[must_use]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Send a command without reading anything back
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn measure(&mut self, command: u8, broadcast: bool) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Sending command 0x{:02X}, broadcast: {}", command, broadcast);

        let header = [self.address, command];
        self.spi
            .write(frame_header(&header, broadcast))
            .await
            .map_err(Error::BusUnavailable)
    }

    /// Read `register_count` bytes of a register group into `destination`
    ///
    /// Returns the trailing packet error code unvalidated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `destination` is shorter than
    /// `register_count`, or [`Error::BusUnavailable`] if the SPI transaction
    /// fails
    pub async fn read_raw(
        &mut self,
        command: u8,
        register_count: usize,
        destination: &mut [u8],
    ) -> Result<u8, Error<E>> {
        let data = checked_prefix(destination, register_count)?;
        data.fill(command);
        let mut pec = [command];

        self.spi
            .transaction(&mut [
                Operation::Write(&[self.address, command]),
                Operation::TransferInPlace(data),
                Operation::TransferInPlace(&mut pec),
            ])
            .await
            .map_err(Error::BusUnavailable)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Read 0x{:02X}: {=[u8]:02X}, PEC 0x{:02X}",
            command,
            &destination[..register_count],
            pec[0]
        );

        Ok(pec[0])
    }

    /// Read a register group, repeating until the conversion has finished
    ///
    /// Unbounded, and the only suspension points are the SPI transfers
    /// themselves. Wrap in a timeout future or use
    /// [`Self::read_with_poll_bounded`] to give up early.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_raw`]
    pub async fn read_with_poll(
        &mut self,
        command: u8,
        register_count: usize,
        destination: &mut [u8],
    ) -> Result<u8, Error<E>> {
        loop {
            let pec = self.read_raw(command, register_count, destination).await?;
            if !conversion_pending(&destination[..register_count]) {
                return Ok(pec);
            }
        }
    }

    /// Like [`Self::read_with_poll`], giving up after `max_attempts` reads
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if every attempt saw a pending conversion,
    /// otherwise the same as [`Self::read_raw`]
    pub async fn read_with_poll_bounded(
        &mut self,
        command: u8,
        register_count: usize,
        destination: &mut [u8],
        max_attempts: usize,
    ) -> Result<u8, Error<E>> {
        for _ in 0..max_attempts {
            let pec = self.read_raw(command, register_count, destination).await?;
            if !conversion_pending(&destination[..register_count]) {
                return Ok(pec);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Conversion still pending after {} reads of 0x{:02X}",
            max_attempts,
            command
        );

        Err(Error::Timeout)
    }

    /// Write the local configuration image to the chip
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn write_config(&mut self, broadcast: bool) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing configuration {=[u8]:02X}", &self.config.0[..]);

        let header = [self.address, Command::WriteConfig.into()];
        self.spi
            .transaction(&mut [
                Operation::Write(frame_header(&header, broadcast)),
                Operation::Write(&self.config.0),
            ])
            .await
            .map_err(Error::BusUnavailable)
    }

    /// Read the configuration register group into the local image
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn read_config(&mut self) -> Result<&Configuration, Error<E>> {
        let mut buffer = [0; CONFIG_GROUP_LEN];
        self.read_raw(Command::ReadConfig.into(), CONFIG_GROUP_LEN, &mut buffer)
            .await?;
        self.config.0 = buffer;
        Ok(&self.config)
    }

    /// Read the flag register group
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn read_flags(&mut self) -> Result<&Flags, Error<E>> {
        let mut buffer = [0; FLAG_GROUP_LEN];
        self.read_raw(Command::ReadFlags.into(), FLAG_GROUP_LEN, &mut buffer)
            .await?;
        self.flags.0 = buffer;
        Ok(&self.flags)
    }

    /// Read the temperature register group, waiting for a running conversion
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn read_temperatures(&mut self) -> Result<&Temperatures, Error<E>> {
        let mut buffer = [0; TEMPERATURE_GROUP_LEN];
        self.read_with_poll(
            Command::ReadTemperatures.into(),
            TEMPERATURE_GROUP_LEN,
            &mut buffer,
        )
        .await?;
        self.temperatures.0 = buffer;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Internal temperature {} C, THSD {}",
            self.temperatures.internal_celsius(),
            self.temperatures.thsd()
        );

        Ok(&self.temperatures)
    }

    /// Read the cell voltage register group, waiting for a running conversion
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn read_cell_voltages(&mut self) -> Result<&CellVoltages, Error<E>> {
        let mut buffer = [0; CELL_VOLTAGE_GROUP_LEN];
        self.read_with_poll(
            Command::ReadCellVoltages.into(),
            CELL_VOLTAGE_GROUP_LEN,
            &mut buffer,
        )
        .await?;
        self.cell_voltages.0 = buffer;

        #[cfg(feature = "defmt")]
        defmt::debug!("Cell voltages {}", self.cell_voltages.raw_all());

        Ok(&self.cell_voltages)
    }

    /// Start a temperature conversion on all inputs
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn measure_temperatures(&mut self) -> Result<(), Error<E>> {
        self.start_temperature_conversion(TemperatureSelection::All, false)
            .await
    }

    /// Start a cell voltage conversion on all cells
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn measure_cell_voltages(&mut self) -> Result<(), Error<E>> {
        self.start_cell_conversion(CellSelection::All, false, false)
            .await
    }

    /// Start a cell voltage conversion (STCVAD, or STCDC with `discharge`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCell`] for a cell outside `1..=12`, or
    /// [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn start_cell_conversion(
        &mut self,
        selection: CellSelection,
        discharge: bool,
        broadcast: bool,
    ) -> Result<(), Error<E>> {
        let command = if discharge {
            Command::StartCellConversionDischarge
        } else {
            Command::StartCellConversion
        };
        self.measure(cell_conversion(command, selection)?, broadcast)
            .await
    }

    /// Start an open-wire conversion (STOWAD, or STOWDC with `discharge`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCell`] for a cell outside `1..=12`, or
    /// [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn start_open_wire_conversion(
        &mut self,
        selection: CellSelection,
        discharge: bool,
        broadcast: bool,
    ) -> Result<(), Error<E>> {
        let command = if discharge {
            Command::StartOpenWireConversionDischarge
        } else {
            Command::StartOpenWireConversion
        };
        self.measure(cell_conversion(command, selection)?, broadcast)
            .await
    }

    /// Start a temperature conversion (STTMPAD)
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusUnavailable`] if the SPI transaction fails
    pub async fn start_temperature_conversion(
        &mut self,
        selection: TemperatureSelection,
        broadcast: bool,
    ) -> Result<(), Error<E>> {
        let command =
            command::with_selection(Command::StartTemperatureConversion, selection.into());
        self.measure(command, broadcast).await
    }

    /// Local configuration image
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Mutable local configuration image
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Temperature image from the last read
    #[must_use]
    pub fn temperatures(&self) -> &Temperatures {
        &self.temperatures
    }

    /// Cell voltage image from the last read
    #[must_use]
    pub fn cell_voltages(&self) -> &CellVoltages {
        &self.cell_voltages
    }

    /// Flag image from the last read
    #[must_use]
    pub fn flags(&self) -> &Flags {
        &self.flags
    }
}
