//! Linux host support for the Grid-EYE driver
//!
//! Glues a Linux `i2c-dev` character device to the driver stack and exposes
//! the small surface a serving layer needs:
//!
//! - [`initialize`] / [`initialize_with`]: open `/dev/i2c-N`, run the init
//!   sequence and wrap the driver in a read-through cache
//! - [`Sensor::read_frame`], [`Sensor::read_ambient`]: cached readings,
//!   refreshed at most once per frame period
//! - [`Sensor::last_refresh_timestamp`]: when the hardware was last read
//! - [`Sensor::close`]: release the bus
//!
//! # Usage
//!
//! ```no_run
//! let sensor = grideye_hal_linux::initialize(0x69, 1)?;
//! let (faulted, pixels) = sensor.read_frame()?;
//! if !faulted {
//!     println!("hottest pixel: {:?}", pixels.iter().cloned().fold(f32::MIN, f32::max));
//! }
//! sensor.close();
//! # Ok::<(), grideye_hal_linux::Error>(())
//! ```
//!
//! The returned [`Sensor`] is `Sync` and locks per instance; share it
//! between request handlers behind an `Arc`.

#![deny(unsafe_code)]

pub mod clock;
pub mod error;
pub mod sensor;

pub use clock::SystemClock;
pub use error::Error;
pub use sensor::{device_path, initialize, initialize_with, LinuxBus, Sensor};
