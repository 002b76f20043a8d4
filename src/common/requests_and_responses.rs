/// All requests and response types used to communicate with the solenoid daemon.
use crate::request::*;
use crate::solenoid::{DoubleSolenoid, SolenoidState, Toggle};
use serde::{Deserialize, Serialize};
use std::net::TcpStream;

/// A request plus the stream its response goes back on. Requests raised inside
/// the daemon carry no stream.
pub struct ThreadRequest(pub Requests, pub Option<TcpStream>);

#[derive(Serialize, Deserialize)]
pub enum Requests {
    SolenoidGetState(BasicGetRequest<DoubleSolenoid, SolenoidState>),
    SolenoidSetState(BasicSetRequest<DoubleSolenoid, SolenoidState>),
    SolenoidFlip(BasicSetRequest<DoubleSolenoid, Toggle>),
}

#[derive(Serialize, Deserialize)]
pub enum Responses {
    SolenoidGetState(BasicGetResponse<DoubleSolenoid, SolenoidState>),
    SolenoidSetState(BasicSetResponse<DoubleSolenoid, SolenoidState>),
    SolenoidFlip(BasicSetResponse<DoubleSolenoid, Toggle>),
}
