/// Defines most of the traits and structures to communicate over threads/network.
use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::io::{self, Read, Write};
use std::marker::PhantomData;
use std::net::TcpStream;
use std::sync::mpsc;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    NotReady,
    Disconnected,
}

pub trait Send<Type> {
    fn send(&mut self, target: Type);
}

pub trait Receive<Type> {
    fn receive(&mut self) -> std::result::Result<Type, Error>;
}

pub struct ThreadSender<Type, To>(pub mpsc::Sender<Type>, pub PhantomData<To>);

impl<Type, To> Clone for ThreadSender<Type, To> {
    fn clone(&self) -> ThreadSender<Type, To> {
        ThreadSender(self.0.clone(), PhantomData)
    }
}

impl<Type, To> Send<Type> for ThreadSender<Type, To> {
    fn send(&mut self, target: Type) {
        if self.0.send(target).is_err() {
            log::warn!("Dropping message, receiving device has shut down");
        }
    }
}

pub struct ThreadReceiver<Type, From>(pub mpsc::Receiver<Type>, pub PhantomData<From>);

impl<Type, From> Receive<Type> for ThreadReceiver<Type, From> {
    fn receive(&mut self) -> std::result::Result<Type, Error> {
        match self.0.try_recv() {
            Ok(x) => Ok(x),
            Err(mpsc::TryRecvError::Empty) => Err(Error::NotReady),
            Err(mpsc::TryRecvError::Disconnected) => Err(Error::Disconnected),
        }
    }
}

pub struct TcpSender<Type>(pub Option<TcpStream>, pub PhantomData<Type>);

impl<Type> Send<Type> for TcpSender<Type>
where
    Type: Serialize,
{
    fn send(&mut self, target: Type) {
        if let Some(ref mut stream) = self.0 {
            if let Err(error) = write_to_stream(stream, &target) {
                log::warn!("Could not send response: {}", error);
            }
        }
    }
}

impl<Type> TcpSender<Type> {
    pub fn set_stream(&mut self, stream: TcpStream) {
        self.0 = Some(stream);
    }
    pub fn clear_stream(&mut self) {
        self.0 = None;
    }
}

pub struct TcpReceiver<Type>(pub TcpStream, pub PhantomData<Type>);

impl<Type> Receive<Type> for TcpReceiver<Type>
where
    Type: DeserializeOwned,
{
    fn receive(&mut self) -> std::result::Result<Type, Error> {
        read_from_stream(&mut self.0).map_err(|error| {
            log::warn!("Could not read message: {}", error);
            Error::Disconnected
        })
    }
}

/// Largest frame body accepted from a peer.
pub const MAX_FRAME_LEN: u64 = 4096;

/// Reads one frame: a little-endian u64 length followed by that many bytes of JSON.
pub fn read_from_stream<T>(stream: &mut impl Read) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 8];
    stream.read_exact(&mut len_buf)?;
    let len: u64 = u64::from_le_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Frame of {} bytes exceeds {} byte limit", len, MAX_FRAME_LEN),
        )
        .into());
    }
    let len = len as usize;
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf[..])?;
    let return_value: T = serde_json::from_slice(&buf)?;
    Ok(return_value)
}

pub fn write_to_stream(stream: &mut impl Write, target: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string(&target)?;
    let bytes = json.as_bytes();
    let length = bytes.len() as u64;
    stream.write_all(&length.to_le_bytes())?;
    stream.write_all(bytes)?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;
    use crate::solenoid::SolenoidState;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
    struct Command(String, SolenoidState);

    #[test]
    fn test_thread_io() {
        let (tx, rx) = mpsc::channel();
        let mut sender = ThreadSender::<SolenoidState, ()>(tx, PhantomData);
        let mut receiver = ThreadReceiver::<SolenoidState, ()>(rx, PhantomData);
        assert_eq!(receiver.receive(), Err(Error::NotReady));
        sender.send(SolenoidState::Open);
        assert_eq!(receiver.receive(), Ok(SolenoidState::Open));
        drop(sender);
        assert_eq!(receiver.receive(), Err(Error::Disconnected));
    }

    #[test]
    fn test_tcp_io() {
        let listener = match TcpListener::bind("127.0.0.1:0") {
            Ok(x) => x,
            _ => return,
        };
        let send_stream = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let receive_stream = listener.accept().unwrap();
        let mut sender = TcpSender::<Command>(Some(send_stream), PhantomData);
        let mut receiver = TcpReceiver::<Command>(receive_stream.0, PhantomData);
        let data = Command("intake".to_string(), SolenoidState::Open);
        sender.send(data.clone());
        let result = receiver.receive().unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_stream_frame() {
        let mut buf = Vec::new();
        let data = Command("catapult".to_string(), SolenoidState::Closed);
        write_to_stream(&mut buf, &data).unwrap();
        assert_eq!(u64::from_le_bytes(buf[..8].try_into().unwrap()) as usize, buf.len() - 8);
        let result: Command = read_from_stream(&mut buf.as_slice()).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_truncated_frame_is_error() {
        let mut buf = Vec::new();
        write_to_stream(&mut buf, &SolenoidState::Open).unwrap();
        buf.truncate(buf.len() - 2);
        let result: Result<SolenoidState> = read_from_stream(&mut buf.as_slice());
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_frame_is_rejected() {
        let mut buf = (1u64 << 62).to_le_bytes().to_vec();
        buf.extend_from_slice(b"\"Open\"");
        let result: Result<SolenoidState> = read_from_stream(&mut buf.as_slice());
        match result {
            Err(crate::error::Error::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::InvalidData),
            _ => panic!("Oversized frame was not rejected"),
        }

        let mut buf = (MAX_FRAME_LEN + 1).to_le_bytes().to_vec();
        buf.resize(buf.len() + MAX_FRAME_LEN as usize + 1, b' ');
        let result: Result<SolenoidState> = read_from_stream(&mut buf.as_slice());
        assert!(result.is_err());
    }
}
