//!
//! # organization gateway process
//!

use {ruc::*, traceapp::config::gateway_cfg::CFG};

fn main() {
    globutils::logging::init_logging(None);
    log::info!(concat!("Build: trace-gateway ", env!("CARGO_PKG_VERSION")));

    pnk!(actix_rt::System::new().block_on(traceapp::run_gateway(&CFG)));
}
