use anyhow::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::Duration;

pub fn open_port(dev: &str, baud: u32) -> Result<Box<dyn SerialPort>> {
    let builder = serialport::new(dev, baud)
        .timeout(Duration::from_millis(100))
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None);

    builder
        .open()
        .map_err(|e| anyhow::anyhow!("open {}: {}", dev, e))
}
