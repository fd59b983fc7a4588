//! envault launcher - runs `<package-root>/bin/envault` with this process's arguments

use envault_shim_core::Envault;
use std::ffi::OsString;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Everything after the program name belongs to envault
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    let code = envault_shim_core::launch::run(Envault, args).await;
    std::process::exit(code);
}
