use log::info;

fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", Default::default()).expect("Failed to initialise logging");
    info!("Initialised logging");

    let args = electoral_platform::cli::cli().get_matches();
    let exit_code = electoral_platform::cli::run(&args);
    std::process::exit(exit_code.into())
}
