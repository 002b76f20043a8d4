pub mod solenoid;

use crate::message::{self, Receive, Send};
use std::{
    marker,
    thread::{self, JoinHandle},
    time::Duration,
};

pub fn launch_device<T, U>(device: impl Device<T, U>) -> JoinHandle<()> {
    thread::spawn(move || {
        device.run();
    })
}

pub struct Shutdown(pub bool);

/// A piece of hardware owned by a single thread: requests come in over a channel,
/// and `step` runs once per cycle.
pub trait Device<T, U>: Receive<T> + Send<U> + Sized + marker::Send + 'static {
    fn handle_command(&mut self, request: T) -> Shutdown;
    fn get_sleep_duration(&self) -> Option<Duration>;
    fn step(&mut self);
    fn run(mut self) {
        loop {
            match Self::receive(&mut self) {
                Ok(msg) => {
                    let shutdown = self.handle_command(msg);
                    if shutdown.0 {
                        break;
                    };
                }
                Err(message::Error::Disconnected) => {
                    log::info!("Device channel closed, stopping");
                    break;
                }
                Err(message::Error::NotReady) => (),
            }
            self.step();
            match self.get_sleep_duration() {
                Some(duration) => std::thread::sleep(duration),
                _ => (),
            }
        }
    }
}
