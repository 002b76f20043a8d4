use crate::error::Result;
use crate::message;
use crate::message::*;
use crate::requests_and_responses::{Requests, Responses, ThreadRequest};
use crate::solenoid::DoubleSolenoid;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

#[derive(Clone)]
pub struct Dispatcher {
    solenoid_channel: ThreadSender<ThreadRequest, DoubleSolenoid>,
}

impl Dispatcher {
    pub fn dispatch(&mut self, request: Requests, stream: TcpStream) {
        self.solenoid_channel.send(ThreadRequest(request, Some(stream)));
    }
    pub fn new(solenoid_channel: ThreadSender<ThreadRequest, DoubleSolenoid>) -> Dispatcher {
        Dispatcher { solenoid_channel }
    }
}

pub fn start_server(dispatcher: Dispatcher, listener: TcpListener) {
    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(stream) => stream,
            Err(error) => {
                log::warn!("Failed to accept connection: {}", error);
                continue;
            }
        };
        {
            let mut dispatcher = dispatcher.clone();
            thread::spawn(move || match message::read_from_stream::<Requests>(&mut stream) {
                Ok(request) => dispatcher.dispatch(request, stream),
                Err(error) => log::warn!("Dropping malformed request: {}", error),
            });
        }
    }
}

/// Sends one request to a running daemon and waits for its response.
pub fn send_request(address: SocketAddr, request: &Requests) -> Result<Responses> {
    let mut stream = TcpStream::connect(address)?;
    message::write_to_stream(&mut stream, request)?;
    message::read_from_stream(&mut stream)
}
