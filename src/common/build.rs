use crate::clock::SystemClock;
use crate::config::Config;
use crate::device::solenoid::SolenoidDevice;
use crate::dispatch;
use crate::error::Result;
use crate::message;
use crate::message::ThreadSender;
use crate::relay::SpikeRelay;
use crate::requests_and_responses::ThreadRequest;
use crate::solenoid::DoubleSolenoid;
use std::marker::PhantomData;
use std::sync::mpsc;
use std::time::Duration;

pub trait Build {
    type Result;
    type Input;
    fn build(input: Self::Input) -> Self::Result;
}

impl Build for dispatch::Dispatcher {
    type Result = dispatch::Dispatcher;
    type Input = ThreadSender<ThreadRequest, DoubleSolenoid>;
    fn build(input: Self::Input) -> Self::Result {
        dispatch::Dispatcher::new(input)
    }
}

impl Build for DoubleSolenoid {
    type Input = Config;
    type Result = Result<DoubleSolenoid>;
    fn build(config: Config) -> Self::Result {
        let open_spike = SpikeRelay::new(config.open_spike.forward, config.open_spike.reverse)?;
        let close_spike = SpikeRelay::new(config.close_spike.forward, config.close_spike.reverse)?;
        DoubleSolenoid::new(
            Box::new(open_spike),
            Box::new(close_spike),
            Box::new(SystemClock::new()),
            config.solenoid,
        )
    }
}

impl Build for SolenoidDevice {
    type Input = (DoubleSolenoid, Duration);
    type Result = (ThreadSender<ThreadRequest, DoubleSolenoid>, SolenoidDevice);
    fn build((solenoid, cycle): Self::Input) -> Self::Result {
        let (sender, receiver) = mpsc::channel();
        let thread_receiver = message::ThreadReceiver(receiver, PhantomData);
        let tcp_sender = message::TcpSender(None, PhantomData);
        let solenoid_device = SolenoidDevice::new(tcp_sender, thread_receiver, solenoid, cycle);
        let solenoid_channel = message::ThreadSender(sender, PhantomData);
        (solenoid_channel, solenoid_device)
    }
}
