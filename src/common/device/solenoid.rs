use super::{Device, Shutdown};
use crate::dispatch::Dispatcher;
use crate::message;
use crate::message::{Receive, Send, TcpSender, ThreadReceiver};
use crate::request::{Error, Get, GetRequest, Set, SetRequest};
use crate::requests_and_responses::{Requests, Responses, ThreadRequest};
use crate::solenoid::{DoubleSolenoid, SolenoidState, Toggle};
use std::time::Duration;

pub struct SolenoidDevice {
    sender: TcpSender<Responses>,
    receiver: ThreadReceiver<ThreadRequest, Dispatcher>,
    solenoid: DoubleSolenoid,
    cycle: Duration,
}

impl Send<Responses> for SolenoidDevice {
    fn send(&mut self, target: Responses) {
        self.sender.send(target);
    }
}

impl Receive<ThreadRequest> for SolenoidDevice {
    fn receive(&mut self) -> Result<ThreadRequest, message::Error> {
        self.receiver.receive()
    }
}

impl Device<ThreadRequest, Responses> for SolenoidDevice {
    fn handle_command(&mut self, request: ThreadRequest) -> Shutdown {
        let ThreadRequest(request, stream) = request;
        match stream {
            Some(stream) => self.sender.set_stream(stream),
            None => self.sender.clear_stream(),
        }
        match request {
            Requests::SolenoidGetState(x) => self
                .sender
                .send(Responses::SolenoidGetState(x.get_response(&self.solenoid))),
            Requests::SolenoidSetState(x) => self
                .sender
                .send(Responses::SolenoidSetState(x.get_response(&mut self.solenoid))),
            Requests::SolenoidFlip(x) => self
                .sender
                .send(Responses::SolenoidFlip(x.get_response(&mut self.solenoid))),
        }
        Shutdown(false)
    }
    fn get_sleep_duration(&self) -> Option<Duration> {
        Some(self.cycle)
    }
    fn step(&mut self) {
        if let Err(error) = self.solenoid.update() {
            log::error!("Solenoid relay write failed: {}", error);
            panic!("Unable to drive solenoid relays: {}", error);
        }
    }
}

impl SolenoidDevice {
    pub const DEFAULT_CYCLE: Duration = Duration::from_millis(20);

    pub fn new(
        sender: TcpSender<Responses>,
        receiver: ThreadReceiver<ThreadRequest, Dispatcher>,
        solenoid: DoubleSolenoid,
        cycle: Duration,
    ) -> SolenoidDevice {
        return SolenoidDevice {
            sender,
            receiver,
            solenoid,
            cycle,
        };
    }

    pub fn solenoid(&self) -> &DoubleSolenoid {
        &self.solenoid
    }
}

impl Set<DoubleSolenoid, SolenoidState> for DoubleSolenoid {
    fn set(&mut self, target: &SolenoidState) -> Result<(), Error> {
        DoubleSolenoid::set(self, *target);
        Ok(())
    }
}

impl Set<DoubleSolenoid, Toggle> for DoubleSolenoid {
    fn set(&mut self, _target: &Toggle) -> Result<(), Error> {
        self.flip();
        Ok(())
    }
}

impl Get<DoubleSolenoid, SolenoidState> for DoubleSolenoid {
    fn get(&self) -> Result<SolenoidState, Error> {
        Ok(self.state())
    }
}
