//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = transit_cli::run() {
        eprintln!("transit: {err}");
        std::process::exit(1);
    }
}
