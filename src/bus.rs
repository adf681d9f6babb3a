//! Shared SPI bus fan-out.
//!
//! Radio and flash sit on one serial unit. Every byte the host shifts out is
//! handed to every attached device, in attach order, within the same call.
//! The bus does not look at chip-select: each device decides for itself
//! whether a byte is addressed to it.

use crate::app::ports::{Peripheral, UsartId};
use crate::error::{Error, Result};

/// Devices one bus can carry.
pub const MAX_BUS_DEVICES: usize = 2;

/// Position of a device on the node's bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusSlot {
    Radio,
    Flash,
}

/// Resolves a slot to the device that occupies it.
pub trait BusDevices {
    fn device(&mut self, slot: BusSlot) -> &mut dyn Peripheral;
}

#[derive(Debug)]
pub struct SerialBus {
    usart: UsartId,
    slots: heapless::Vec<BusSlot, MAX_BUS_DEVICES>,
    delivered: u64,
}

impl SerialBus {
    pub fn new(usart: UsartId) -> Self {
        Self {
            usart,
            slots: heapless::Vec::new(),
            delivered: 0,
        }
    }

    /// Attach a device. Delivery order is attach order.
    pub fn attach(&mut self, slot: BusSlot) -> Result<()> {
        self.slots.push(slot).map_err(|_| Error::BusFull)
    }

    /// Serial unit this bus listens on.
    pub fn usart(&self) -> UsartId {
        self.usart
    }

    /// Attached slots, in delivery order.
    pub fn slots(&self) -> &[BusSlot] {
        &self.slots
    }

    /// Bytes fanned out so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Hand `byte` to every attached device, unfiltered.
    pub fn fan_out(&mut self, byte: u8, devices: &mut impl BusDevices) {
        for &slot in &self.slots {
            devices.device(slot).data_received(byte);
        }
        self.delivered += 1;
    }
}
