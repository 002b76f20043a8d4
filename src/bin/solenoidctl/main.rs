//! Sends a single request to a running solenoid daemon.
//!
//! Example:
//!   solenoidctl --addr 127.0.0.1:2000 open

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use common::dispatch::send_request;
use common::request::{BasicGetRequest, BasicSetRequest, GetResponse, SetResponse, ID};
use common::requests_and_responses::{Requests, Responses};
use common::solenoid::{SolenoidState, Toggle};
use std::net::SocketAddr;
use std::process;

#[derive(Parser)]
#[command(name = "solenoidctl")]
#[command(version, about = "Control a double solenoid through the solenoid daemon")]
struct Cli {
    /// Address of the solenoid daemon
    #[arg(short, long, default_value = common::config::DEFAULT_LISTEN_ADDR)]
    addr: SocketAddr,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the commanded state
    Get,
    /// Request the valve open
    Open,
    /// Request the valve closed
    Close,
    /// Invert the commanded state
    Flip,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let id = ID(process::id() as u128);

    let request = match cli.command {
        Command::Get => Requests::SolenoidGetState(BasicGetRequest::new(id)),
        Command::Open => Requests::SolenoidSetState(BasicSetRequest::new(id, SolenoidState::Open)),
        Command::Close => Requests::SolenoidSetState(BasicSetRequest::new(id, SolenoidState::Closed)),
        Command::Flip => Requests::SolenoidFlip(BasicSetRequest::new(id, Toggle)),
    };
    log::debug!("Sending request {:?} to {}", id, cli.addr);

    match send_request(cli.addr, &request)? {
        Responses::SolenoidGetState(response) => match response.get_result() {
            Ok(state) => println!("{:?}", state),
            Err(error) => bail!("{}", error.0),
        },
        Responses::SolenoidSetState(response) => {
            let candidate = *response.get_candidate();
            match response.get_result() {
                Ok(()) => println!("Requested {:?}", candidate),
                Err(error) => bail!("{}", error.0),
            }
        }
        Responses::SolenoidFlip(response) => match response.get_result() {
            Ok(()) => println!("Requested flip"),
            Err(error) => bail!("{}", error.0),
        },
    }
    Ok(())
}
