use anyhow::{Context, Result};
use common::build::Build;
use common::config::Config;
use common::device;
use common::device::solenoid::SolenoidDevice;
use common::dispatch;
use common::solenoid::DoubleSolenoid;
use std::net::TcpListener;
use std::thread;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Create
    let config = Config::from_env().context("Invalid solenoid configuration")?;
    let listen_addr = config.listen_addr;
    let cycle = config.cycle;
    let solenoid = DoubleSolenoid::build(config).context("Unable to set up spike relays")?;
    let (solenoid_channel, solenoid_device) = SolenoidDevice::build((solenoid, cycle));
    let dispatcher = dispatch::Dispatcher::build(solenoid_channel);
    let solenoid_handle = device::launch_device(solenoid_device);

    // Start server
    let listener = TcpListener::bind(listen_addr).with_context(|| format!("Unable to bind {}", listen_addr))?;
    log::info!("Listening on {}", listen_addr);
    let dispatch_handle = thread::spawn(|| {
        dispatch::start_server(dispatcher, listener);
    });

    // Clean up
    if solenoid_handle.join().is_err() {
        anyhow::bail!("Solenoid device stopped unexpectedly");
    }
    if dispatch_handle.join().is_err() {
        anyhow::bail!("Request server stopped unexpectedly");
    }
    Ok(())
}
